use reqwest::Client;
use std::{sync::Arc, time::Duration};

use crate::config::Config;

/// Shared by every request handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Pooled client for calls to the identity providers
    pub http: Client,
}

impl AppState {
    pub fn new(config: Config) -> crate::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build()?;

        Ok(Self {
            config: Arc::new(config),
            http,
        })
    }
}
