use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use trailarr_core::{Config, SanitizedConfig, TrailerPipeline};

/// Shared application state
pub struct AppState {
    config: Config,
    pipeline: Arc<TrailerPipeline>,
    shutdown: CancellationToken,
}

impl AppState {
    pub fn new(config: Config, pipeline: Arc<TrailerPipeline>, shutdown: CancellationToken) -> Self {
        Self {
            config,
            pipeline,
            shutdown,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn pipeline(&self) -> &Arc<TrailerPipeline> {
        &self.pipeline
    }

    /// Token cancelled when the process shuts down. Manual runs observe it.
    pub fn shutdown(&self) -> &CancellationToken {
        &self.shutdown
    }
}
