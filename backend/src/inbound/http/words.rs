//! Word catalogue HTTP handlers.
//!
//! ```text
//! POST   /api/v1/words
//! GET    /api/v1/words/my
//! DELETE /api/v1/words/my/{id}
//! GET    /api/v1/words
//! GET    /api/v1/words/{word}
//! ```
//!
//! Handlers only translate between JSON and the word ports; resolution,
//! caching and provider calls live in the domain service.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::ResolveWordRequest;
use crate::domain::{Error, Word, WordId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Request payload for adding a word to the caller's list.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddWordRequest {
    /// English word or short phrase as typed by the user.
    #[schema(example = "apple")]
    pub word: Option<String>,
}

/// Word as exposed over HTTP.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WordResponse {
    #[schema(example = 17)]
    pub id: i64,
    /// Normalised English text.
    #[schema(example = "apple")]
    pub word: String,
    /// Russian translation.
    #[schema(example = "яблоко")]
    pub ru_word: String,
    /// CEFR level code.
    #[schema(example = "A1")]
    pub level: String,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

impl From<Word> for WordResponse {
    fn from(value: Word) -> Self {
        Self {
            id: value.id.get(),
            word: value.text.into(),
            ru_word: value.translation.into(),
            level: value.level.code().to_owned(),
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

fn into_responses(words: Vec<Word>) -> Vec<WordResponse> {
    words.into_iter().map(WordResponse::from).collect()
}

fn missing_word_error() -> Error {
    Error::invalid_request("word is required").with_details(json!({
        "field": "word",
        "code": "missing_field",
    }))
}

/// Add a word to the caller's list, translating it on first sight.
#[utoipa::path(
    post,
    path = "/api/v1/words",
    request_body = AddWordRequest,
    params(
        ("X-User-Id" = i64, Header, description = "Authenticated user id set by the gateway")
    ),
    responses(
        (status = 201, description = "Word resolved and added", body = WordResponse),
        (status = 400, description = "Invalid word", body = ErrorSchema),
        (status = 401, description = "Missing identity", body = ErrorSchema),
        (status = 502, description = "Translation provider answered with garbage", body = ErrorSchema),
        (status = 503, description = "Provider or store unavailable", body = ErrorSchema),
        (status = 504, description = "Translation provider timed out", body = ErrorSchema)
    ),
    tags = ["words"],
    operation_id = "addWord"
)]
#[post("/words")]
pub async fn add_word(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<AddWordRequest>,
) -> ApiResult<HttpResponse> {
    let word = payload.into_inner().word.ok_or_else(missing_word_error)?;
    let resolved = state
        .words
        .resolve(ResolveWordRequest::new(user.user_id(), word))
        .await?;
    Ok(HttpResponse::Created().json(WordResponse::from(resolved)))
}

/// List the caller's words.
#[utoipa::path(
    get,
    path = "/api/v1/words/my",
    params(
        ("X-User-Id" = i64, Header, description = "Authenticated user id set by the gateway")
    ),
    responses(
        (status = 200, description = "Words the caller has added", body = [WordResponse]),
        (status = 401, description = "Missing identity", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["words"],
    operation_id = "listMyWords"
)]
#[get("/words/my")]
pub async fn list_my_words(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<WordResponse>>> {
    let words = state.words_query.list_mine(user.user_id()).await?;
    Ok(web::Json(into_responses(words)))
}

/// Remove a word from the caller's list. The word stays in the catalogue.
#[utoipa::path(
    delete,
    path = "/api/v1/words/my/{id}",
    params(
        ("id" = i64, Path, description = "Word identifier"),
        ("X-User-Id" = i64, Header, description = "Authenticated user id set by the gateway")
    ),
    responses(
        (status = 204, description = "Word removed from the caller's list"),
        (status = 401, description = "Missing identity", body = ErrorSchema),
        (status = 404, description = "Word is not in the caller's list", body = ErrorSchema)
    ),
    tags = ["words"],
    operation_id = "forgetWord"
)]
#[delete("/words/my/{id}")]
pub async fn forget_word(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let word_id = WordId::new(path.into_inner());
    state.words.forget(user.user_id(), word_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// List every word in the shared catalogue.
#[utoipa::path(
    get,
    path = "/api/v1/words",
    responses(
        (status = 200, description = "All words", body = [WordResponse]),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["words"],
    operation_id = "listWords"
)]
#[get("/words")]
pub async fn list_words(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<WordResponse>>> {
    let words = state.words_query.list_all().await?;
    Ok(web::Json(into_responses(words)))
}

/// Fetch one word by its text.
#[utoipa::path(
    get,
    path = "/api/v1/words/{word}",
    params(("word" = String, Path, description = "Word text; normalised before lookup")),
    responses(
        (status = 200, description = "The word", body = WordResponse),
        (status = 400, description = "Invalid word", body = ErrorSchema),
        (status = 404, description = "Word has not been resolved yet", body = ErrorSchema)
    ),
    tags = ["words"],
    operation_id = "getWord"
)]
#[get("/words/{word}")]
pub async fn get_word(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<WordResponse>> {
    let word = state.words_query.get_by_text(&path.into_inner()).await?;
    Ok(web::Json(WordResponse::from(word)))
}

/// Register the word handlers.
///
/// `/words/my` must be registered before `/words/{word}` so the literal
/// segment wins.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("invalid JSON body: {err}"))
            .with_details(json!({ "code": "invalid_body" }))
            .into()
    });

    cfg.app_data(json_config)
        .service(add_word)
        .service(list_my_words)
        .service(forget_word)
        .service(list_words)
        .service(get_word);
}

#[cfg(test)]
#[path = "words_tests.rs"]
mod tests;
