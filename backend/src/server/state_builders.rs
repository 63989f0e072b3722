//! Builders wiring the word service onto the configured adapters.

use std::sync::Arc;

use tracing::warn;

use wordbook::domain::WordService;
use wordbook::domain::ports::{InMemoryWordRepository, TranslationProvider, WordRepository};
use wordbook::inbound::http::state::HttpState;
use wordbook::outbound::persistence::DieselWordRepository;

use super::ServerConfig;

fn state_for<R>(repository: Arc<R>, config: &ServerConfig) -> HttpState
where
    R: WordRepository + 'static,
{
    let provider: Arc<dyn TranslationProvider> = config.provider.clone();
    let service = Arc::new(
        WordService::new(repository, provider).with_provider_timeout(config.provider_timeout),
    );
    HttpState::new(service.clone(), service)
}

/// Build HTTP state using the Diesel store when a pool is configured,
/// otherwise an in-memory store.
pub(crate) fn build_http_state(config: &ServerConfig) -> HttpState {
    match &config.db_pool {
        Some(pool) => state_for(Arc::new(DieselWordRepository::new(pool.clone())), config),
        None => {
            warn!("no database configured; words are kept in memory and lost on restart");
            state_for(Arc::new(InMemoryWordRepository::new()), config)
        }
    }
}
