use std::sync::LazyLock;

/// Name of the broadcast channel tabs use to announce login and logout
pub static SYNC_CHANNEL_NAME: LazyLock<String> = LazyLock::new(sync_channel_name_from_env);

/// Events buffered per subscriber before it lags and has to resync
pub static SYNC_CHANNEL_CAPACITY: LazyLock<usize> = LazyLock::new(sync_channel_capacity_from_env);

fn sync_channel_name_from_env() -> String {
    std::env::var("SYNC_CHANNEL_NAME")
        .ok()
        .filter(|name| !name.is_empty())
        .unwrap_or("auth".to_string())
}

fn sync_channel_capacity_from_env() -> usize {
    std::env::var("SYNC_CHANNEL_CAPACITY")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|capacity| *capacity > 0)
        .unwrap_or(64)
}
