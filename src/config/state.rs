// Application state module
// Everything a request handler needs, built once at startup and shared

use std::sync::Arc;

use super::types::Config;
use crate::routing::EndpointRouter;
use crate::storage::ResponseStore;

/// Application state
pub struct AppState {
    pub config: Config,
    pub router: EndpointRouter,
    pub store: Arc<dyn ResponseStore>,
    /// Root prefix of every storage key
    pub responses_root: String,
}

impl AppState {
    pub fn new(config: &Config, router: EndpointRouter, store: Arc<dyn ResponseStore>) -> Self {
        Self {
            config: config.clone(),
            router,
            store,
            responses_root: config.responses_root(),
        }
    }
}
