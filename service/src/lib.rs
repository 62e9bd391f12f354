use config::Config;
use events::SubscriptionManager;

pub mod config;
pub mod logging;

// Service-level state containing only infrastructure concerns
// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub subscriptions: SubscriptionManager,
}

impl AppState {
    pub fn new(app_config: Config, subscriptions: SubscriptionManager) -> Self {
        Self {
            config: app_config,
            subscriptions,
        }
    }
}
