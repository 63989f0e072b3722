//! Driving port for word mutations.
//!
//! HTTP handlers call [`WordCommand`] to add a word to the caller's list
//! (translating it on first sight) or to drop it from that list.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{Error, UserId, Word, WordId};

/// Request to resolve a word on behalf of a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveWordRequest {
    /// The authenticated user adding the word.
    pub user_id: UserId,
    /// Raw word as typed by the user; normalised by the service.
    pub word: String,
    /// Optional deadline for the provider call, overriding the service
    /// default.
    pub timeout: Option<Duration>,
}

impl ResolveWordRequest {
    /// Build a request that uses the service's default timeout.
    pub fn new(user_id: UserId, word: impl Into<String>) -> Self {
        Self {
            user_id,
            word: word.into(),
            timeout: None,
        }
    }

    /// Override the provider deadline for this request.
    #[cfg(test)]
    pub(crate) fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Driving port for word mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WordCommand: Send + Sync {
    /// Return the canonical word for `request.word`, creating it through the
    /// translation provider on first sight, and associate it with the user.
    ///
    /// # Errors
    ///
    /// - `invalid_request` when the word fails validation.
    /// - `service_unavailable` / `gateway_timeout` when the provider cannot
    ///   be reached in time.
    /// - `bad_gateway` when the provider answer cannot be trusted.
    /// - `service_unavailable` / `internal_error` for store failures.
    async fn resolve(&self, request: ResolveWordRequest) -> Result<Word, Error>;

    /// Remove a word from the user's list. The word stays in the catalogue.
    ///
    /// # Errors
    ///
    /// Returns `not_found` when the user has not learned that word.
    async fn forget(&self, user_id: UserId, word_id: WordId) -> Result<(), Error>;
}
