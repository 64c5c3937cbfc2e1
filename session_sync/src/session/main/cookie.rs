use chrono::{DateTime, Duration, Utc};
use http::header::{COOKIE, HeaderMap, HeaderValue, SET_COOKIE};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::session::config::AUTH_COOKIE_NAME;
use crate::session::errors::SessionError;

#[derive(Debug, Clone)]
struct StoredCookie {
    value: String,
    path: String,
    expires_at: DateTime<Utc>,
}

/// Cookie jar shared by every context of one origin.
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    cookies: Arc<Mutex<HashMap<String, StoredCookie>>>,
}

/// Append a `Set-Cookie` header for a script-visible cookie.
///
/// A `max_age` of zero or less expires the cookie. Values that could not be
/// carried verbatim in a cookie (separators, whitespace, quotes, controls)
/// are rejected.
pub fn header_set_cookie(
    headers: &mut HeaderMap,
    name: &str,
    value: &str,
    max_age: i64,
) -> Result<(), SessionError> {
    if let Some(invalid) = value.chars().find(|c| !is_cookie_value_char(*c)) {
        tracing::error!("Refusing to set cookie {} with character {:?}", name, invalid);
        return Err(SessionError::Cookie(format!(
            "Invalid character {invalid:?} in cookie value"
        )));
    }
    let cookie = format!("{name}={value}; SameSite=Lax; Path=/; Max-Age={max_age}");
    headers.append(
        SET_COOKIE,
        cookie
            .parse()
            .map_err(|_| SessionError::Cookie("Failed to parse cookie".to_string()))?,
    );
    Ok(())
}

/// RFC 6265 `cookie-octet`
fn is_cookie_value_char(c: char) -> bool {
    matches!(c, '\x21' | '\x23'..='\x2B' | '\x2D'..='\x3A' | '\x3C'..='\x5B' | '\x5D'..='\x7E')
}

/// Find the access credential in the `Cookie` header of a request.
pub fn auth_token_from_headers(headers: &HeaderMap) -> Result<Option<&str>, SessionError> {
    let Some(cookie_header) = headers.get(COOKIE) else {
        tracing::debug!("No cookie header found");
        return Ok(None);
    };

    let cookie_str = cookie_header.to_str().map_err(|e| {
        tracing::error!("Invalid cookie header: {}", e);
        SessionError::HeaderError("Invalid cookie header".to_string())
    })?;

    let cookie_name = AUTH_COOKIE_NAME.as_str();
    let token = cookie_str.split(';').map(|s| s.trim()).find_map(|s| {
        let mut parts = s.splitn(2, '=');
        match (parts.next(), parts.next()) {
            (Some(k), Some(v)) if k == cookie_name && !v.is_empty() => Some(v),
            _ => None,
        }
    });

    if token.is_none() {
        tracing::debug!("No auth cookie '{}' found in cookies", cookie_name);
    }

    Ok(token)
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply every `Set-Cookie` header in `headers` to the jar.
    pub async fn apply_set_cookie(&self, headers: &HeaderMap) -> Result<(), SessionError> {
        for header in headers.get_all(SET_COOKIE) {
            self.apply_one(header).await?;
        }
        Ok(())
    }

    async fn apply_one(&self, header: &HeaderValue) -> Result<(), SessionError> {
        let raw = header
            .to_str()
            .map_err(|e| SessionError::Cookie(format!("Non-ASCII Set-Cookie header: {e}")))?;

        let mut parts = raw.split(';').map(str::trim);
        let (name, value) = parts
            .next()
            .and_then(|pair| pair.split_once('='))
            .ok_or_else(|| SessionError::Cookie(format!("Missing name=value in '{raw}'")))?;
        if name.is_empty() {
            return Err(SessionError::Cookie("Empty cookie name".to_string()));
        }

        let mut path = "/".to_string();
        let mut max_age: Option<i64> = None;
        for attribute in parts {
            let (key, attr_value) = attribute.split_once('=').unwrap_or((attribute, ""));
            match key.to_ascii_lowercase().as_str() {
                "path" => path = attr_value.to_string(),
                "max-age" => {
                    max_age = Some(attr_value.parse().map_err(|_| {
                        SessionError::Cookie(format!("Invalid Max-Age '{attr_value}'"))
                    })?)
                }
                _ => {}
            }
        }

        let mut cookies = self.cookies.lock().await;
        match max_age {
            Some(age) if age <= 0 => {
                tracing::debug!("Expiring cookie {}", name);
                cookies.remove(name);
            }
            age => {
                // Session cookies without Max-Age live as long as the jar
                let expires_at = age
                    .and_then(Duration::try_seconds)
                    .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
                    .unwrap_or(DateTime::<Utc>::MAX_UTC);
                tracing::debug!("Storing cookie {} until {}", name, expires_at);
                cookies.insert(
                    name.to_string(),
                    StoredCookie {
                        value: value.to_string(),
                        path,
                        expires_at,
                    },
                );
            }
        }
        Ok(())
    }

    /// Value of a live cookie. Expired cookies are dropped on access.
    pub async fn get(&self, name: &str) -> Option<String> {
        let mut cookies = self.cookies.lock().await;
        match cookies.get(name) {
            Some(cookie) if cookie.expires_at > Utc::now() => Some(cookie.value.clone()),
            Some(_) => {
                cookies.remove(name);
                None
            }
            None => None,
        }
    }

    /// Expiry of a live cookie
    pub async fn expires_at(&self, name: &str) -> Option<DateTime<Utc>> {
        let cookies = self.cookies.lock().await;
        cookies
            .get(name)
            .filter(|cookie| cookie.expires_at > Utc::now())
            .map(|cookie| cookie.expires_at)
    }

    /// Build the `Cookie` request header a navigation to `request_path` would carry.
    pub async fn request_headers(&self, request_path: &str) -> Result<HeaderMap, SessionError> {
        let now = Utc::now();
        let cookies = self.cookies.lock().await;
        let mut pairs: Vec<String> = cookies
            .iter()
            .filter(|(_, cookie)| cookie.expires_at > now && request_path.starts_with(&cookie.path))
            .map(|(name, cookie)| format!("{}={}", name, cookie.value))
            .collect();
        pairs.sort();

        let mut headers = HeaderMap::new();
        if !pairs.is_empty() {
            headers.insert(
                COOKIE,
                pairs
                    .join("; ")
                    .parse()
                    .map_err(|_| SessionError::HeaderError("Invalid cookie header".to_string()))?,
            );
        }
        Ok(headers)
    }
}
