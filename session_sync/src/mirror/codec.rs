//! Wire format of the session envelope.
//!
//! The envelope is a JSON object whose fields are themselves JSON documents
//! encoded as strings, the layout a generic persistence layer produces when it
//! stores heterogeneous values side by side:
//!
//! ```text
//! {"access":"\"tok1\"","userData":"{\"id\":\"u-1\",...}","_persist":"{\"version\":-1,\"rehydrated\":true}"}
//! ```
//!
//! `"null"` is a valid encoding of either field. An unreadable `userData`
//! field degrades to "no profile" instead of failing the whole decode.

use serde::{Deserialize, Serialize};

use crate::mirror::errors::MirrorError;
use crate::session::{UserData, UserProfile};

const PERSIST_METADATA: &str = r#"{"version":-1,"rehydrated":true}"#;

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    #[serde(default)]
    access: Option<String>,
    #[serde(rename = "userData", default)]
    user_data: Option<String>,
    #[serde(rename = "_persist", default, skip_serializing_if = "Option::is_none")]
    persist: Option<String>,
}

/// Encode `user_data` into the envelope stored in the shared area.
pub fn encode_envelope(user_data: &UserData) -> Result<String, MirrorError> {
    let envelope = Envelope {
        access: Some(
            serde_json::to_string(&user_data.access_credential)
                .map_err(|e| MirrorError::Encode(e.to_string()))?,
        ),
        user_data: Some(
            serde_json::to_string(&user_data.profile)
                .map_err(|e| MirrorError::Encode(e.to_string()))?,
        ),
        persist: Some(PERSIST_METADATA.to_string()),
    };
    serde_json::to_string(&envelope).map_err(|e| MirrorError::Encode(e.to_string()))
}

/// Decode an envelope.
///
/// Fails only when the outer object or the `access` field cannot be read.
pub fn decode_envelope(raw: &str) -> Result<UserData, MirrorError> {
    let envelope: Envelope = serde_json::from_str(raw)
        .map_err(|e| MirrorError::MalformedEnvelope(format!("envelope: {e}")))?;

    let access_credential = match envelope.access.as_deref() {
        Some(encoded) => serde_json::from_str::<Option<String>>(encoded)
            .map_err(|e| MirrorError::MalformedEnvelope(format!("access: {e}")))?
            .filter(|credential| !credential.is_empty()),
        None => None,
    };

    let profile = envelope.user_data.as_deref().and_then(decode_profile);

    Ok(UserData {
        access_credential,
        profile,
    })
}

fn decode_profile(encoded: &str) -> Option<UserProfile> {
    match serde_json::from_str::<Option<UserProfile>>(encoded) {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!("Discarding unreadable profile in session envelope: {}", e);
            None
        }
    }
}
