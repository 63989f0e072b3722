//! Wordbook backend library.
//!
//! A shared English to Russian vocabulary: the first user to add a word pays
//! for one translation call, every later user gets the cached record.
//!
//! - [`domain`]: word types, ports and the resolution service.
//! - [`outbound`]: PostgreSQL store and Gemini translation adapters.
//! - [`inbound`]: actix-web HTTP handlers.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
