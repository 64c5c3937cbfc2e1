//! Helpers shared by unit tests across the crate

use std::env;

/// Set (or unset) an environment variable for the duration of `test` and
/// restore the original value afterward. Callers must be `#[serial]`.
pub(crate) fn with_env_var<F, R>(key: &str, value: Option<&str>, test: F) -> R
where
    F: FnOnce() -> R,
{
    let original = env::var(key).ok();

    match value {
        Some(val) => unsafe { env::set_var(key, val) },
        None => unsafe { env::remove_var(key) },
    }

    let result = test();

    match original {
        Some(val) => unsafe { env::set_var(key, val) },
        None => unsafe { env::remove_var(key) },
    }

    result
}
