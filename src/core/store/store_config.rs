use std::time::Duration;

pub const DEFAULT_ASYNC_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub initial_value: i64,
    /// How long `increment_async` waits before dispatching.
    pub async_delay: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            initial_value: 0,
            async_delay: DEFAULT_ASYNC_DELAY,
        }
    }
}

pub fn get_store_config() -> StoreConfig {
    StoreConfig::default()
}
