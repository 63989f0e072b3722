//! Driving port for word lookups.

use async_trait::async_trait;

use crate::domain::{Error, UserId, Word};

/// Read-side use-cases over the shared word catalogue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WordQuery: Send + Sync {
    /// Fetch one word by its text (normalised before lookup).
    ///
    /// Returns `not_found` when no such word has been resolved yet.
    async fn get_by_text(&self, word: &str) -> Result<Word, Error>;

    /// Words the user has learned.
    async fn list_mine(&self, user_id: UserId) -> Result<Vec<Word>, Error>;

    /// The whole public catalogue.
    async fn list_all(&self) -> Result<Vec<Word>, Error>;
}
