mod codec;
mod config;
mod errors;
mod store;

pub use codec::{decode_envelope, encode_envelope};
pub use config::MIRROR_ENVELOPE_KEY;
pub use errors::MirrorError;
pub use store::DurableMirror;
