//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use wordbook::domain::DEFAULT_PROVIDER_TIMEOUT;
use wordbook::domain::ports::TranslationProvider;
use wordbook::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) provider: Arc<dyn TranslationProvider>,
    pub(crate) provider_timeout: Duration,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a server configuration around a translation provider.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, provider: Arc<dyn TranslationProvider>) -> Self {
        Self {
            bind_addr,
            provider,
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
            db_pool: None,
        }
    }

    /// Attach a database connection pool.
    ///
    /// Without one the server keeps words in an in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Override the default provider deadline.
    #[must_use]
    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }
}
