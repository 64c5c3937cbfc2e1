use std::env;
use std::sync::LazyLock;

/// Shared-storage key under which the session envelope is persisted
pub static MIRROR_ENVELOPE_KEY: LazyLock<String> = LazyLock::new(mirror_envelope_key_from_env);

fn mirror_envelope_key_from_env() -> String {
    env::var("MIRROR_ENVELOPE_KEY")
        .ok()
        .filter(|key| !key.is_empty())
        .unwrap_or_else(|| "persist:auth".to_string())
}
