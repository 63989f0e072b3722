//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{WordCommand, WordQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub words: Arc<dyn WordCommand>,
    pub words_query: Arc<dyn WordQuery>,
}

impl HttpState {
    /// Construct state from the word use-cases.
    ///
    /// A single service usually implements both ports, so callers pass the
    /// same `Arc` twice.
    pub fn new(words: Arc<dyn WordCommand>, words_query: Arc<dyn WordQuery>) -> Self {
        Self { words, words_query }
    }
}
