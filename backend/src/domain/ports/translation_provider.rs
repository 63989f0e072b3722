//! Driven port for the external translation service.
//!
//! Adapters translate one English word into Russian and classify its CEFR
//! level. The error taxonomy separates "the provider could not be reached"
//! from "the provider answered with something we cannot trust".

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::domain::{CefrLevel, TranslatedWord, Translation, WordText};

use super::define_port_error;

define_port_error! {
    /// Errors surfaced while calling the translation provider.
    pub enum TranslationProviderError {
        /// Transport, authentication, quota or server-side failure.
        Unavailable { message: String } =>
            "translation provider unavailable: {message}",
        /// The provider did not answer within the allotted time.
        Timeout { message: String } =>
            "translation provider timed out: {message}",
        /// The provider answered without any candidate content.
        EmptyResponse =>
            "translation provider returned an empty response",
        /// The answer contained no parseable JSON object.
        MalformedResponse { message: String } =>
            "translation provider returned malformed output: {message}",
        /// The JSON object was missing fields or carried an unknown level.
        InvalidTranslation { message: String } =>
            "translation provider returned an invalid translation: {message}",
    }
}

impl TranslationProviderError {
    /// Return whether the provider could not be reached at all.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. } | Self::Timeout { .. })
    }

    /// Return whether the provider answered with untrustworthy content.
    pub fn is_untrusted_payload(&self) -> bool {
        matches!(
            self,
            Self::EmptyResponse | Self::MalformedResponse { .. } | Self::InvalidTranslation { .. }
        )
    }
}

/// Port for translating a single word.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Translate `word` and classify its difficulty.
    async fn translate(&self, word: &WordText) -> Result<TranslatedWord, TranslationProviderError>;
}

/// Fixture provider answering from a fixed table and counting calls.
///
/// Words missing from the table fail with
/// [`TranslationProviderError::Unavailable`].
///
/// # Examples
/// ```
/// use wordbook::domain::ports::{FixtureTranslationProvider, TranslationProvider};
/// use wordbook::domain::{CefrLevel, WordText};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let provider = FixtureTranslationProvider::new().with_answer("apple", "яблоко", CefrLevel::A1);
/// let answer = provider
///     .translate(&WordText::parse("apple").unwrap())
///     .await
///     .unwrap();
/// assert_eq!(answer.translation.as_str(), "яблоко");
/// assert_eq!(provider.calls(), 1);
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct FixtureTranslationProvider {
    answers: HashMap<String, (String, CefrLevel)>,
    calls: Arc<AtomicUsize>,
}

impl FixtureTranslationProvider {
    /// Create a provider with no known answers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the answer returned for `word` (matched after normalisation).
    ///
    /// # Panics
    ///
    /// Panics when `word` does not normalise to a valid [`WordText`].
    pub fn with_answer(mut self, word: &str, translation: &str, level: CefrLevel) -> Self {
        let key = match WordText::parse(word) {
            Ok(text) => String::from(text),
            Err(err) => panic!("fixture words must be valid: {err}"),
        };
        self.answers.insert(key, (translation.to_owned(), level));
        self
    }

    /// Number of `translate` calls observed so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranslationProvider for FixtureTranslationProvider {
    async fn translate(&self, word: &WordText) -> Result<TranslatedWord, TranslationProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (translation, level) = self.answers.get(word.as_str()).ok_or_else(|| {
            TranslationProviderError::unavailable(format!("no fixture answer for {word}"))
        })?;
        let translation = Translation::new(translation)
            .map_err(|err| TranslationProviderError::invalid_translation(err.to_string()))?;
        Ok(TranslatedWord {
            translation,
            level: *level,
        })
    }
}
