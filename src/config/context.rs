//! Per-connection context

use std::sync::Arc;

use super::connection::ConnectionConfig;
use crate::store::StoreClient;

/// Everything a statement needs from its connection
#[derive(Clone)]
pub struct ConnectionContext {
    config: ConnectionConfig,
    store: Arc<dyn StoreClient>,
}

impl ConnectionContext {
    pub fn new(config: ConnectionConfig, store: Arc<dyn StoreClient>) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn store(&self) -> &dyn StoreClient {
        self.store.as_ref()
    }
}

impl std::fmt::Debug for ConnectionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
