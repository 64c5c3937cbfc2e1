use std::sync::LazyLock;

/// Name of the cookie that carries the access credential to non-JS request paths.
pub static AUTH_COOKIE_NAME: LazyLock<String> = LazyLock::new(auth_cookie_name_from_env);

/// Lifetime of the auth cookie in seconds
pub static AUTH_COOKIE_MAX_AGE: LazyLock<i64> = LazyLock::new(auth_cookie_max_age_from_env);

const DEFAULT_AUTH_COOKIE_MAX_AGE: i64 = 7 * 24 * 60 * 60;

fn auth_cookie_name_from_env() -> String {
    std::env::var("AUTH_COOKIE_NAME")
        .ok()
        .filter(|name| !name.is_empty())
        .unwrap_or("auth-token".to_string())
}

fn auth_cookie_max_age_from_env() -> i64 {
    std::env::var("AUTH_COOKIE_MAX_AGE")
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .filter(|max_age| *max_age > 0)
        .unwrap_or(DEFAULT_AUTH_COOKIE_MAX_AGE) // 7 days if not set or invalid
}
