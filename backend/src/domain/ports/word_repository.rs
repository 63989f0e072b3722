//! Port for the shared word store.
//!
//! The store owns the uniqueness of [`WordText`]: `create_word` is a
//! conditional insert that fails with [`WordRepositoryError::Conflict`] when
//! the text already exists, which is what lets concurrent first-time
//! resolutions converge on one canonical record.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};

use crate::domain::{NewWord, UserId, Word, WordId, WordText};

use super::define_port_error;

define_port_error! {
    /// Errors raised by word store adapters.
    pub enum WordRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "word store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "word store query failed: {message}",
        /// A word with the same normalised text already exists.
        Conflict { text: String } =>
            "word already exists: {text}",
        /// The requested word or association does not exist.
        NotFound { message: String } =>
            "word store record not found: {message}",
    }
}

/// Port for durable storage of words and their user associations.
///
/// Every mutating call is durable before it returns.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WordRepository: Send + Sync {
    /// Exact match on normalised text; `None` when no such word exists.
    async fn find_by_text(&self, text: &WordText) -> Result<Option<Word>, WordRepositoryError>;

    /// Every stored word, oldest first.
    async fn list_all(&self) -> Result<Vec<Word>, WordRepositoryError>;

    /// Words associated with `user_id`, oldest first.
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Word>, WordRepositoryError>;

    /// Insert a new word.
    ///
    /// Fails with [`WordRepositoryError::Conflict`] when the text is taken.
    async fn create_word(&self, word: &NewWord) -> Result<Word, WordRepositoryError>;

    /// Link a user to a word. Linking an already-linked pair is a no-op.
    ///
    /// Fails with [`WordRepositoryError::NotFound`] when the word is unknown.
    async fn associate_user(
        &self,
        word_id: WordId,
        user_id: UserId,
    ) -> Result<(), WordRepositoryError>;

    /// Remove the link between a user and a word; the word itself is kept.
    ///
    /// Fails with [`WordRepositoryError::NotFound`] when the pair is not
    /// linked.
    async fn dissociate_user(
        &self,
        user_id: UserId,
        word_id: WordId,
    ) -> Result<(), WordRepositoryError>;
}

#[derive(Default)]
struct InMemoryState {
    next_id: i64,
    words: BTreeMap<WordId, Word>,
    by_text: HashMap<WordText, WordId>,
    links: BTreeSet<(UserId, WordId)>,
}

/// Thread-safe in-memory word store honouring the port contract.
///
/// Used by tests and by the server when no database is configured.
///
/// # Examples
/// ```
/// use wordbook::domain::ports::{InMemoryWordRepository, WordRepository};
/// use wordbook::domain::{CefrLevel, NewWord, Translation, UserId, WordText};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let repo = InMemoryWordRepository::new();
/// let word = repo
///     .create_word(&NewWord {
///         text: WordText::parse("cat").unwrap(),
///         translation: Translation::new("кот").unwrap(),
///         level: CefrLevel::A1,
///     })
///     .await
///     .unwrap();
/// repo.associate_user(word.id, UserId::new(1).unwrap()).await.unwrap();
/// assert_eq!(repo.link_count(), 1);
/// # });
/// ```
#[derive(Clone)]
pub struct InMemoryWordRepository {
    state: Arc<Mutex<InMemoryState>>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryWordRepository {
    fn default() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }
}

impl InMemoryWordRepository {
    /// Create an empty store stamping words with the system clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store using the supplied clock for `created_at`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Arc::new(Mutex::new(InMemoryState::default())),
            clock,
        }
    }

    /// Number of stored words.
    pub fn word_count(&self) -> usize {
        self.lock().words.len()
    }

    /// Number of user/word links.
    pub fn link_count(&self) -> usize {
        self.lock().links.len()
    }

    fn lock(&self) -> MutexGuard<'_, InMemoryState> {
        // No mutation below can panic halfway, so a poisoned state is intact.
        self.state.lock().unwrap_or_else(|err| err.into_inner())
    }
}

#[async_trait]
impl WordRepository for InMemoryWordRepository {
    async fn find_by_text(&self, text: &WordText) -> Result<Option<Word>, WordRepositoryError> {
        let state = self.lock();
        Ok(state
            .by_text
            .get(text)
            .and_then(|id| state.words.get(id))
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<Word>, WordRepositoryError> {
        Ok(self.lock().words.values().cloned().collect())
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Word>, WordRepositoryError> {
        let state = self.lock();
        Ok(state
            .links
            .range((user_id, WordId::new(i64::MIN))..=(user_id, WordId::new(i64::MAX)))
            .filter_map(|(_, word_id)| state.words.get(word_id))
            .cloned()
            .collect())
    }

    async fn create_word(&self, word: &NewWord) -> Result<Word, WordRepositoryError> {
        let mut state = self.lock();
        if state.by_text.contains_key(&word.text) {
            return Err(WordRepositoryError::conflict(word.text.as_str()));
        }
        state.next_id += 1;
        let stored = Word {
            id: WordId::new(state.next_id),
            text: word.text.clone(),
            translation: word.translation.clone(),
            level: word.level,
            created_at: self.clock.utc(),
        };
        state.by_text.insert(stored.text.clone(), stored.id);
        state.words.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn associate_user(
        &self,
        word_id: WordId,
        user_id: UserId,
    ) -> Result<(), WordRepositoryError> {
        let mut state = self.lock();
        if !state.words.contains_key(&word_id) {
            return Err(WordRepositoryError::not_found(format!("word {word_id}")));
        }
        state.links.insert((user_id, word_id));
        Ok(())
    }

    async fn dissociate_user(
        &self,
        user_id: UserId,
        word_id: WordId,
    ) -> Result<(), WordRepositoryError> {
        if self.lock().links.remove(&(user_id, word_id)) {
            Ok(())
        } else {
            Err(WordRepositoryError::not_found(format!(
                "word {word_id} is not linked to user {user_id}"
            )))
        }
    }
}
