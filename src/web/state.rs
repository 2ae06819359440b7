//! Application state shared across handlers

use crate::config::Settings;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Full database contents, scanned per request
    pub database: Arc<String>,
    /// Template renderer
    pub templates: Arc<super::Templates>,
}

impl AppState {
    /// Create new application state
    pub fn new(settings: Settings, database: String) -> anyhow::Result<Self> {
        Ok(Self {
            settings: Arc::new(settings),
            database: Arc::new(database),
            templates: Arc::new(super::Templates::new()?),
        })
    }
}
