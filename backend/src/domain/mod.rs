//! Domain primitives, ports and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - `Error` and `ErrorCode`: transport-agnostic error payload and its
//!   stable identifier.
//! - `Word`, `WordText`, `Translation`, `CefrLevel`: the shared word catalogue.
//! - `WordService`: resolves words through the store and the provider.

pub mod error;
pub mod ports;
pub mod single_flight;
pub mod word;
pub mod word_service;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::single_flight::SingleFlight;
pub use self::word::{
    CefrLevel, NewWord, TranslatedWord, Translation, UserId, WORD_TEXT_MAX, Word, WordId,
    WordText, WordValidationError,
};
pub use self::word_service::{DEFAULT_PROVIDER_TIMEOUT, WordService};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use wordbook::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
