use crate::cache::ResponseCache;
use crate::config::ProviderConfig;
use crate::rate_limit::ThrottleGuard;

// app's shared state: one HTTP client, the provider config snapshot, and the
// two process-lifetime maps (cache + throttle), each owning its own locking
pub struct AppState {
    pub client: reqwest::Client,
    pub provider: ProviderConfig,
    pub cache: ResponseCache,
    pub throttle: ThrottleGuard,
}
