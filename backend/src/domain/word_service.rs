//! Word resolution service.
//!
//! Implements the cache-or-translate-then-associate protocol behind
//! [`WordCommand`] and the read-side pass-throughs behind [`WordQuery`].
//! The store's uniqueness constraint is what keeps one canonical record per
//! text; the single-flight table on top of it only saves duplicate provider
//! calls when several users add the same unseen word at once.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    ResolveWordRequest, TranslationProvider, TranslationProviderError, WordCommand, WordQuery,
    WordRepository, WordRepositoryError,
};
use crate::domain::{Error, NewWord, SingleFlight, UserId, Word, WordId, WordText};

/// Provider deadline applied when a request does not supply its own.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);

/// Word service implementing the driving ports.
pub struct WordService<R, P: ?Sized> {
    words: Arc<R>,
    provider: Arc<P>,
    provider_timeout: Duration,
    flights: SingleFlight<WordText, Result<Word, Error>>,
}

impl<R, P: ?Sized> Clone for WordService<R, P> {
    fn clone(&self) -> Self {
        Self {
            words: Arc::clone(&self.words),
            provider: Arc::clone(&self.provider),
            provider_timeout: self.provider_timeout,
            flights: self.flights.clone(),
        }
    }
}

impl<R, P: ?Sized> WordService<R, P> {
    /// Create a new service over the given store and provider.
    pub fn new(words: Arc<R>, provider: Arc<P>) -> Self {
        Self {
            words,
            provider,
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
            flights: SingleFlight::new(),
        }
    }

    /// Replace the default provider deadline.
    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    /// Deadline applied to provider calls without a per-request override.
    pub fn provider_timeout(&self) -> Duration {
        self.provider_timeout
    }
}

impl<R, P: ?Sized> WordService<R, P>
where
    R: WordRepository + 'static,
    P: TranslationProvider + 'static,
{
    fn map_repository_error(error: WordRepositoryError) -> Error {
        match error {
            WordRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("word store unavailable: {message}"))
                    .with_details(json!({ "code": "store_unavailable" }))
            }
            WordRepositoryError::Query { message } => {
                Error::internal(format!("word store error: {message}"))
            }
            WordRepositoryError::Conflict { text } => {
                Error::internal(format!("unexpected word conflict: {text}"))
            }
            WordRepositoryError::NotFound { message } => Error::not_found(message),
        }
    }

    fn map_provider_error(error: &TranslationProviderError) -> Error {
        let message = error.to_string();
        if error.is_untrusted_payload() {
            Error::bad_gateway(message)
                .with_details(json!({ "code": "provider_invalid_response" }))
        } else if matches!(error, TranslationProviderError::Timeout { .. }) {
            Error::gateway_timeout(message).with_details(json!({ "code": "provider_timeout" }))
        } else if error.is_unavailable() {
            Error::service_unavailable(message)
                .with_details(json!({ "code": "provider_unavailable" }))
        } else {
            Error::internal(message)
        }
    }

    fn parse_text(raw: &str) -> Result<WordText, Error> {
        WordText::parse(raw).map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({
                "field": "word",
                "code": "invalid_word",
            }))
        })
    }

    async fn find(&self, text: &WordText) -> Result<Option<Word>, Error> {
        self.words
            .find_by_text(text)
            .await
            .map_err(Self::map_repository_error)
    }

    /// Translate `text` and store the result, reusing a concurrently
    /// created record on conflict.
    ///
    /// Runs inside a single-flight entry, so it owns its collaborators.
    async fn translate_and_store(
        words: Arc<R>,
        provider: Arc<P>,
        text: WordText,
    ) -> Result<Word, Error> {
        if let Some(word) = words
            .find_by_text(&text)
            .await
            .map_err(Self::map_repository_error)?
        {
            debug!(word = %text, "word stored while waiting to translate");
            return Ok(word);
        }

        let translated = provider.translate(&text).await.map_err(|err| {
            warn!(word = %text, kind = err.kind(), error = %err, "translation failed");
            Self::map_provider_error(&err)
        })?;

        let new_word = NewWord::from_translation(text.clone(), translated);
        match words.create_word(&new_word).await {
            Ok(word) => {
                info!(word = %word.text, word_id = %word.id, "stored new word");
                Ok(word)
            }
            Err(WordRepositoryError::Conflict { .. }) => {
                info!(word = %text, "word created concurrently; reusing stored record");
                words
                    .find_by_text(&text)
                    .await
                    .map_err(Self::map_repository_error)?
                    .ok_or_else(|| {
                        Error::internal(format!("word {text} vanished after a create conflict"))
                    })
            }
            Err(err) => {
                warn!(word = %text, kind = err.kind(), error = %err, "failed to store word");
                Err(Self::map_repository_error(err))
            }
        }
    }

    async fn translate_shared(
        &self,
        text: WordText,
        timeout: Option<Duration>,
    ) -> Result<Word, Error> {
        let limit = timeout.unwrap_or(self.provider_timeout);
        let words = Arc::clone(&self.words);
        let provider = Arc::clone(&self.provider);
        let key = text.clone();
        let flight = self.flights.run(key, move || {
            Self::translate_and_store(words, provider, text)
        });

        if let Ok(result) = tokio::time::timeout(limit, flight).await {
            result
        } else {
            let millis = limit.as_millis();
            warn!(timeout_ms = %millis, "translation timed out");
            Err(Self::map_provider_error(&TranslationProviderError::timeout(
                format!("no answer within {millis} ms"),
            )))
        }
    }
}

#[async_trait]
impl<R, P: ?Sized> WordCommand for WordService<R, P>
where
    R: WordRepository + 'static,
    P: TranslationProvider + 'static,
{
    async fn resolve(&self, request: ResolveWordRequest) -> Result<Word, Error> {
        let ResolveWordRequest {
            user_id,
            word: raw,
            timeout,
        } = request;
        let text = Self::parse_text(&raw)?;

        let word = if let Some(word) = self.find(&text).await? {
            debug!(word = %text, user_id = %user_id, "word cache hit");
            word
        } else {
            info!(word = %text, user_id = %user_id, "word cache miss; translating");
            self.translate_shared(text, timeout).await?
        };

        self.words
            .associate_user(word.id, user_id)
            .await
            .map_err(|err| {
                warn!(
                    word_id = %word.id,
                    user_id = %user_id,
                    error = %err,
                    "failed to associate word with user"
                );
                Self::map_repository_error(err)
            })?;
        Ok(word)
    }

    async fn forget(&self, user_id: UserId, word_id: WordId) -> Result<(), Error> {
        match self.words.dissociate_user(user_id, word_id).await {
            Ok(()) => Ok(()),
            Err(WordRepositoryError::NotFound { .. }) => Err(Error::not_found(format!(
                "word {word_id} is not in the user's list"
            ))),
            Err(err) => Err(Self::map_repository_error(err)),
        }
    }
}

#[async_trait]
impl<R, P: ?Sized> WordQuery for WordService<R, P>
where
    R: WordRepository + 'static,
    P: TranslationProvider + 'static,
{
    async fn get_by_text(&self, word: &str) -> Result<Word, Error> {
        let text = Self::parse_text(word)?;
        self.find(&text)
            .await?
            .ok_or_else(|| Error::not_found(format!("word not found: {text}")))
    }

    async fn list_mine(&self, user_id: UserId) -> Result<Vec<Word>, Error> {
        self.words
            .list_for_user(user_id)
            .await
            .map_err(Self::map_repository_error)
    }

    async fn list_all(&self) -> Result<Vec<Word>, Error> {
        self.words
            .list_all()
            .await
            .map_err(Self::map_repository_error)
    }
}

#[cfg(test)]
#[path = "word_service_tests.rs"]
mod tests;
