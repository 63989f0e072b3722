//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports ([`WordRepository`], [`TranslationProvider`]) are implemented
//! by outbound adapters; driving ports ([`WordCommand`], [`WordQuery`]) are
//! consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod translation_provider;
mod word_command;
mod word_query;
mod word_repository;

#[cfg(test)]
pub use translation_provider::MockTranslationProvider;
pub use translation_provider::{
    FixtureTranslationProvider, TranslationProvider, TranslationProviderError,
};
#[cfg(test)]
pub use word_command::MockWordCommand;
pub use word_command::{ResolveWordRequest, WordCommand};
#[cfg(test)]
pub use word_query::MockWordQuery;
pub use word_query::WordQuery;
#[cfg(test)]
pub use word_repository::MockWordRepository;
pub use word_repository::{InMemoryWordRepository, WordRepository, WordRepositoryError};
