mod config;
mod errors;
mod main;
mod types;

pub use config::{AUTH_COOKIE_MAX_AGE, AUTH_COOKIE_NAME};
pub use errors::SessionError;
pub use main::{CookieJar, SessionStore, auth_token_from_headers, header_set_cookie};
pub use types::{Role, Session, UserData, UserProfile};
