//! Gemini outbound adapter.
//!
//! This module provides a thin HTTP implementation of the
//! `TranslationProvider` port on top of the Generative Language API.

mod dto;
mod http_provider;

pub use http_provider::{
    DEFAULT_GEMINI_ENDPOINT, DEFAULT_GEMINI_MODEL, GeminiProviderBuildError,
    GeminiTranslationProvider,
};
