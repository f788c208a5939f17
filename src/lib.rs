pub mod api;
pub mod avatar;
pub mod compose;
pub mod config;
pub mod error;
pub mod mask;
pub mod openapi;
pub mod raster;
pub mod themes;

use std::sync::Arc;

use crate::config::Config;
use crate::themes::ThemeStore;

/// Shared, immutable per-process state. The compositor itself is
/// stateless; everything request-scoped lives on the stack of a handler.
#[derive(Clone)]
pub struct AppState {
    pub http: reqwest::Client,
    pub config: Arc<Config>,
    pub themes: ThemeStore,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let themes = ThemeStore::new(config.frames_dir.clone());
        Self {
            http: reqwest::Client::new(),
            config: Arc::new(config),
            themes,
        }
    }
}
