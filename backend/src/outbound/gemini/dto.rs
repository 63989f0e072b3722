//! DTOs for the Generative Language `generateContent` endpoint.
//!
//! Only the fields the adapter reads are modelled; unknown fields are
//! ignored so API additions do not break decoding.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GenerateContentRequestDto<'a> {
    pub(super) contents: [ContentRequestDto<'a>; 1],
    pub(super) generation_config: GenerationConfigDto,
}

impl<'a> GenerateContentRequestDto<'a> {
    pub(super) fn user_prompt(prompt: &'a str) -> Self {
        Self {
            contents: [ContentRequestDto {
                role: "user",
                parts: [PartRequestDto { text: prompt }],
            }],
            generation_config: GenerationConfigDto { temperature: 0.0 },
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct ContentRequestDto<'a> {
    pub(super) role: &'static str,
    pub(super) parts: [PartRequestDto<'a>; 1],
}

#[derive(Debug, Serialize)]
pub(super) struct PartRequestDto<'a> {
    pub(super) text: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct GenerationConfigDto {
    pub(super) temperature: f32,
}

#[derive(Debug, Deserialize)]
pub(super) struct GenerateContentResponseDto {
    #[serde(default)]
    pub(super) candidates: Vec<CandidateDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CandidateDto {
    pub(super) content: Option<ContentResponseDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ContentResponseDto {
    #[serde(default)]
    pub(super) parts: Vec<PartResponseDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct PartResponseDto {
    pub(super) text: Option<String>,
}

impl GenerateContentResponseDto {
    /// Text of the first candidate, with its text parts concatenated.
    ///
    /// `None` when there is no candidate or it carries no non-blank text.
    pub(super) fn into_first_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text = content
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect::<String>();
        (!text.trim().is_empty()).then_some(text)
    }
}
