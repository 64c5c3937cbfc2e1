mod cookie;
mod store;

pub use cookie::{CookieJar, auth_token_from_headers, header_set_cookie};
pub use store::SessionStore;
