//! Reqwest-backed Gemini translation provider.
//!
//! This adapter owns transport details only. It builds the prompt, maps
//! timeouts and HTTP failures onto port errors, and pulls the JSON object
//! out of free-form model output.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use tracing::debug;

use super::dto::{GenerateContentRequestDto, GenerateContentResponseDto};
use crate::domain::ports::{TranslationProvider, TranslationProviderError};
use crate::domain::{CefrLevel, TranslatedWord, Translation, WordText};

/// Default Generative Language API base URL.
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/";
/// Default model used for translation.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Errors raised while building the provider.
#[derive(Debug, thiserror::Error)]
pub enum GeminiProviderBuildError {
    /// The reqwest client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    /// The endpoint and model do not form a valid URL.
    #[error("invalid Gemini endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// Translation provider that calls Gemini's `generateContent` endpoint.
pub struct GeminiTranslationProvider {
    client: Client,
    url: Url,
    api_key: String,
}

impl GeminiTranslationProvider {
    /// Build a provider for `model` under `endpoint`, with a per-request
    /// timeout.
    ///
    /// `endpoint` is the API base, e.g. [`DEFAULT_GEMINI_ENDPOINT`]; a
    /// missing trailing slash is added.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed or the
    /// model name does not form a valid URL.
    pub fn new(
        endpoint: Url,
        api_key: impl Into<String>,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, GeminiProviderBuildError> {
        let client = Client::builder().timeout(timeout).build()?;
        let url = generate_content_url(endpoint, model)?;
        Ok(Self {
            client,
            url,
            api_key: api_key.into(),
        })
    }

    /// Fully resolved `generateContent` URL.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl TranslationProvider for GeminiTranslationProvider {
    async fn translate(&self, word: &WordText) -> Result<TranslatedWord, TranslationProviderError> {
        let prompt = build_prompt(word);
        let response = self
            .client
            .post(self.url.clone())
            .header(API_KEY_HEADER, self.api_key.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&GenerateContentRequestDto::user_prompt(&prompt))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let text = parse_envelope(body.as_ref())?;
        debug!(word = %word, output = %body_preview(text.as_bytes()), "model answered");
        parse_translation(&text)
    }
}

fn generate_content_url(mut endpoint: Url, model: &str) -> Result<Url, url::ParseError> {
    if !endpoint.path().ends_with('/') {
        let path = format!("{}/", endpoint.path());
        endpoint.set_path(&path);
    }
    endpoint.join(&format!("models/{}:generateContent", model.trim()))
}

/// Instruction sent to the model for `word`.
fn build_prompt(word: &WordText) -> String {
    format!(
        "Переведи английское слово \"{word}\" на русский и определи его уровень сложности \
         (A1, A2, B1, B2, C1, C2).\n\
         Ответь СТРОГО в формате JSON, без markdown, без пояснений, без текста вне JSON.\n\
         Формат:\n\
         {{\"ru_word\":\"перевод\",\"level\":\"A1\"}}"
    )
}

fn parse_envelope(body: &[u8]) -> Result<String, TranslationProviderError> {
    let decoded: GenerateContentResponseDto = serde_json::from_slice(body).map_err(|error| {
        TranslationProviderError::malformed_response(format!(
            "invalid generateContent payload: {error}"
        ))
    })?;
    decoded
        .into_first_text()
        .ok_or_else(TranslationProviderError::empty_response)
}

/// Substring from the first `{` to the last `}` inclusive.
fn extract_json_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| raw.get(start..=end)).flatten()
}

/// String value of `field`, or `None` when absent or of another type.
fn text_field<'a>(payload: &'a Value, field: &str) -> Option<&'a str> {
    payload.get(field).and_then(Value::as_str)
}

/// Extract and validate the `{ru_word, level}` object from model output.
fn parse_translation(raw: &str) -> Result<TranslatedWord, TranslationProviderError> {
    let span = extract_json_span(raw).ok_or_else(|| {
        TranslationProviderError::malformed_response(format!(
            "no JSON object in model output: {}",
            body_preview(raw.as_bytes())
        ))
    })?;
    let payload: Value = serde_json::from_str(span).map_err(|error| {
        TranslationProviderError::malformed_response(format!("model output is not JSON: {error}"))
    })?;

    let translation = text_field(&payload, "ru_word")
        .and_then(|raw| Translation::new(raw).ok())
        .ok_or_else(|| {
            TranslationProviderError::invalid_translation("ru_word is missing or not a string")
        })?;
    let level = text_field(&payload, "level")
        .filter(|level| !level.trim().is_empty())
        .ok_or_else(|| {
            TranslationProviderError::invalid_translation("level is missing or not a string")
        })?
        .parse::<CefrLevel>()
        .map_err(|error| TranslationProviderError::invalid_translation(error.to_string()))?;

    Ok(TranslatedWord { translation, level })
}

fn map_transport_error(error: reqwest::Error) -> TranslationProviderError {
    if error.is_timeout() {
        TranslationProviderError::timeout(error.to_string())
    } else {
        TranslationProviderError::unavailable(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> TranslationProviderError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            TranslationProviderError::timeout(message)
        }
        _ => TranslationProviderError::unavailable(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
#[path = "http_provider_tests.rs"]
mod tests;
