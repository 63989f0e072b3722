//! Word data model.
//!
//! A [`Word`] is content-addressed by its normalised [`WordText`]: no two
//! stored words share the same text. Words are immutable once created; only
//! the set of users associated with them changes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of characters accepted in a normalised word.
pub const WORD_TEXT_MAX: usize = 64;

/// Validation errors raised while constructing word value types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordValidationError {
    EmptyText,
    TextTooLong { max: usize },
    TextNotAlphabetic,
    EmptyTranslation,
    UnknownLevel { value: String },
    NonPositiveUserId,
    InvalidUserId,
}

impl fmt::Display for WordValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyText => write!(f, "word must not be empty"),
            Self::TextTooLong { max } => write!(f, "word must be at most {max} characters"),
            Self::TextNotAlphabetic => write!(f, "word must contain at least one letter"),
            Self::EmptyTranslation => write!(f, "translation must not be empty"),
            Self::UnknownLevel { value } => {
                write!(f, "level must be one of A1, A2, B1, B2, C1, C2 (got {value:?})")
            }
            Self::NonPositiveUserId => write!(f, "user id must be a positive integer"),
            Self::InvalidUserId => write!(f, "user id must be an integer"),
        }
    }
}

impl std::error::Error for WordValidationError {}

/// Store-assigned word identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordId(i64);

impl WordId {
    /// Wrap a raw identifier issued by the store.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an already-authenticated user.
///
/// Users are owned by the authentication subsystem; this crate only ever
/// refers to them by id.
///
/// # Examples
/// ```
/// use wordbook::domain::UserId;
///
/// let id: UserId = "42".parse().expect("valid id");
/// assert_eq!(id.get(), 42);
/// assert!("0".parse::<UserId>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct UserId(i64);

impl UserId {
    /// Validate and wrap a raw user id.
    pub fn new(raw: i64) -> Result<Self, WordValidationError> {
        if raw <= 0 {
            return Err(WordValidationError::NonPositiveUserId);
        }
        Ok(Self(raw))
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for UserId {
    type Error = WordValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for i64 {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl FromStr for UserId {
    type Err = WordValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .trim()
            .parse::<i64>()
            .map_err(|_| WordValidationError::InvalidUserId)?;
        Self::new(raw)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalised source-language word; the uniqueness key of the word store.
///
/// Normalisation trims surrounding whitespace, collapses inner whitespace
/// runs to one space and lower-cases the text.
///
/// # Examples
/// ```
/// use wordbook::domain::WordText;
///
/// let text = WordText::parse("  Ice   Cream ").expect("valid word");
/// assert_eq!(text.as_ref(), "ice cream");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WordText(String);

impl WordText {
    /// Normalise and validate raw user input.
    pub fn parse(raw: &str) -> Result<Self, WordValidationError> {
        let normalised = normalise(raw);
        if normalised.is_empty() {
            return Err(WordValidationError::EmptyText);
        }
        if normalised.chars().count() > WORD_TEXT_MAX {
            return Err(WordValidationError::TextTooLong { max: WORD_TEXT_MAX });
        }
        if !normalised.chars().any(char::is_alphabetic) {
            return Err(WordValidationError::TextNotAlphabetic);
        }
        Ok(Self(normalised))
    }

    /// Borrow the normalised text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

fn normalise(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

impl AsRef<str> for WordText {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for WordText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for WordText {
    type Error = WordValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<WordText> for String {
    fn from(value: WordText) -> Self {
        value.0
    }
}

/// Target-language (Russian) translation of a word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Translation(String);

impl Translation {
    /// Trim and validate a translation.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, WordValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(WordValidationError::EmptyTranslation);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the translation text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Translation {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Translation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Translation {
    type Error = WordValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Translation> for String {
    fn from(value: Translation) -> Self {
        value.0
    }
}

/// CEFR difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CefrLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl CefrLevel {
    /// All levels from easiest to hardest.
    pub const ALL: [Self; 6] = [Self::A1, Self::A2, Self::B1, Self::B2, Self::C1, Self::C2];

    /// Upper-case level code.
    pub const fn code(self) -> &'static str {
        match self {
            Self::A1 => "A1",
            Self::A2 => "A2",
            Self::B1 => "B1",
            Self::B2 => "B2",
            Self::C1 => "C1",
            Self::C2 => "C2",
        }
    }
}

impl fmt::Display for CefrLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CefrLevel {
    type Err = WordValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let candidate = s.trim();
        Self::ALL
            .into_iter()
            .find(|level| level.code().eq_ignore_ascii_case(candidate))
            .ok_or_else(|| WordValidationError::UnknownLevel {
                value: s.to_owned(),
            })
    }
}

/// Translation and level produced by the translation provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedWord {
    pub translation: Translation,
    pub level: CefrLevel,
}

/// Input for creating a word in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWord {
    pub text: WordText,
    pub translation: Translation,
    pub level: CefrLevel,
}

impl NewWord {
    /// Pair normalised text with a provider answer.
    pub fn from_translation(text: WordText, translated: TranslatedWord) -> Self {
        Self {
            text,
            translation: translated.translation,
            level: translated.level,
        }
    }
}

/// Canonical stored word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub id: WordId,
    pub text: WordText,
    pub translation: Translation,
    pub level: CefrLevel,
    pub created_at: DateTime<Utc>,
}
