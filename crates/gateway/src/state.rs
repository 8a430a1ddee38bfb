use std::sync::Arc;

use {wasend_dispatch::Dispatcher, wasend_media::StagingStore};

use crate::auth::ResolvedAuth;

/// Shared gateway runtime state, wrapped in Arc for use across request tasks.
pub struct GatewayState {
    /// Auth configuration.
    pub auth: ResolvedAuth,
    /// Maps validated requests to protocol send calls.
    pub dispatcher: Dispatcher,
    /// Stages media payloads for the upload step.
    pub staging: Arc<StagingStore>,
    /// Server version string.
    pub version: String,
}

impl GatewayState {
    pub fn new(auth: ResolvedAuth, dispatcher: Dispatcher, staging: Arc<StagingStore>) -> Arc<Self> {
        Arc::new(Self {
            auth,
            dispatcher,
            staging,
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }
}
