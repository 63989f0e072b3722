//! Handler tests for the word endpoints, driven through the real word
//! service over the in-memory store and a fixture provider.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{
    FixtureTranslationProvider, InMemoryWordRepository, MockWordCommand, MockWordQuery,
    WordCommand, WordQuery,
};
use crate::domain::{CefrLevel, WordService};
use crate::inbound::http::identity::USER_ID_HEADER;

struct Backend {
    repo: Arc<InMemoryWordRepository>,
    provider: Arc<FixtureTranslationProvider>,
    state: HttpState,
}

#[fixture]
fn backend() -> Backend {
    let repo = Arc::new(InMemoryWordRepository::new());
    let provider = Arc::new(
        FixtureTranslationProvider::new()
            .with_answer("apple", "яблоко", CefrLevel::A1)
            .with_answer("ice cream", "мороженое", CefrLevel::A2),
    );
    let service = Arc::new(WordService::new(repo.clone(), provider.clone()));
    let state = HttpState::new(service.clone(), service);
    Backend {
        repo,
        provider,
        state,
    }
}

async fn send(state: HttpState, req: test::TestRequest) -> (StatusCode, Value) {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(web::scope("/api/v1").configure(configure)),
    )
    .await;
    let res = test::call_service(&app, req.to_request()).await;
    let status = res.status();
    let body = test::read_body(res).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON body")
    };
    (status, value)
}

fn add(user: &str, word: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/v1/words")
        .insert_header((USER_ID_HEADER, user))
        .set_json(json!({ "word": word }))
}

#[rstest]
#[actix_web::test]
async fn adding_a_new_word_returns_201_with_the_translation(backend: Backend) {
    let (status, body) = send(backend.state, add("7", "  Apple ")).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["word"], "apple");
    assert_eq!(body["ruWord"], "яблоко");
    assert_eq!(body["level"], "A1");
    assert!(body["id"].is_i64());
    let created_at = body["createdAt"].as_str().expect("createdAt string");
    assert!(chrono::DateTime::parse_from_rfc3339(created_at).is_ok());
}

#[rstest]
#[actix_web::test]
async fn second_user_reuses_the_cached_word(backend: Backend) {
    let (_, first) = send(backend.state.clone(), add("1", "apple")).await;
    let (status, second) = send(backend.state, add("2", "APPLE")).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["id"], second["id"]);
    assert_eq!(backend.provider.calls(), 1);
    assert_eq!(backend.repo.link_count(), 2);
}

#[rstest]
#[actix_web::test]
async fn adding_requires_an_identity(backend: Backend) {
    let req = test::TestRequest::post()
        .uri("/api/v1/words")
        .set_json(json!({ "word": "apple" }));

    let (status, body) = send(backend.state, req).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");
    assert_eq!(backend.provider.calls(), 0);
}

#[rstest]
#[case::blank(json!({ "word": "   " }), "invalid_word")]
#[case::digits(json!({ "word": "1234" }), "invalid_word")]
#[case::missing(json!({}), "missing_field")]
#[case::wrong_type(json!({ "word": 5 }), "invalid_body")]
#[actix_web::test]
async fn invalid_payloads_are_rejected(
    backend: Backend,
    #[case] payload: Value,
    #[case] detail: &str,
) {
    let req = test::TestRequest::post()
        .uri("/api/v1/words")
        .insert_header((USER_ID_HEADER, "7"))
        .set_json(payload);

    let (status, body) = send(backend.state, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["code"], detail);
    assert_eq!(backend.provider.calls(), 0);
}

#[rstest]
#[actix_web::test]
async fn unreachable_provider_surfaces_as_503(backend: Backend) {
    let (status, body) = send(backend.state, add("7", "zyzzyva")).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "service_unavailable");
    assert_eq!(body["details"]["code"], "provider_unavailable");
    assert_eq!(backend.repo.word_count(), 0);
}

#[rstest]
#[actix_web::test]
async fn my_words_only_lists_the_callers_words(backend: Backend) {
    send(backend.state.clone(), add("1", "apple")).await;
    send(backend.state.clone(), add("2", "ice cream")).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/words/my")
        .insert_header((USER_ID_HEADER, "2"));
    let (status, body) = send(backend.state, req).await;

    assert_eq!(status, StatusCode::OK);
    let words = body.as_array().expect("array body");
    assert_eq!(words.len(), 1);
    assert_eq!(words[0]["word"], "ice cream");
}

#[rstest]
#[actix_web::test]
async fn catalogue_is_public(backend: Backend) {
    send(backend.state.clone(), add("1", "apple")).await;
    send(backend.state.clone(), add("2", "ice cream")).await;

    let (status, body) = send(backend.state, test::TestRequest::get().uri("/api/v1/words")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(2));
}

#[rstest]
#[actix_web::test]
async fn single_word_lookup_normalises_the_path(backend: Backend) {
    send(backend.state.clone(), add("1", "ice cream")).await;

    let req = test::TestRequest::get().uri("/api/v1/words/Ice%20%20Cream");
    let (status, body) = send(backend.state, req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ruWord"], "мороженое");
}

#[rstest]
#[actix_web::test]
async fn single_word_lookup_misses_with_404(backend: Backend) {
    let req = test::TestRequest::get().uri("/api/v1/words/apple");
    let (status, body) = send(backend.state, req).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
    assert_eq!(backend.provider.calls(), 0);
}

#[rstest]
#[actix_web::test]
async fn forgetting_a_word_keeps_it_in_the_catalogue(backend: Backend) {
    let (_, added) = send(backend.state.clone(), add("7", "apple")).await;
    let id = added["id"].as_i64().expect("numeric id");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/words/my/{id}"))
        .insert_header((USER_ID_HEADER, "7"));
    let (status, _) = send(backend.state.clone(), req).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(backend.repo.link_count(), 0);
    assert_eq!(backend.repo.word_count(), 1);

    let again = test::TestRequest::delete()
        .uri(&format!("/api/v1/words/my/{id}"))
        .insert_header((USER_ID_HEADER, "7"));
    let (status, body) = send(backend.state, again).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[rstest]
#[actix_web::test]
async fn internal_failures_are_redacted() {
    let mut command = MockWordCommand::new();
    command.expect_resolve().never();
    let mut query = MockWordQuery::new();
    query
        .expect_list_all()
        .times(1)
        .returning(|| Err(Error::internal("relation \"words\" does not exist")));
    let command: Arc<dyn WordCommand> = Arc::new(command);
    let query: Arc<dyn WordQuery> = Arc::new(query);

    let (status, body) = send(
        HttpState::new(command, query),
        test::TestRequest::get().uri("/api/v1/words"),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Internal server error");
}

#[rstest]
#[::core::prelude::v1::test]
fn response_uses_camel_case_fields() {
    let word = Word {
        id: WordId::new(3),
        text: crate::domain::WordText::parse("cat").expect("valid word"),
        translation: crate::domain::Translation::new("кот").expect("valid translation"),
        level: CefrLevel::B1,
        created_at: chrono::Utc::now(),
    };

    let value = serde_json::to_value(WordResponse::from(word)).expect("serialises");

    assert_eq!(value["id"], 3);
    assert_eq!(value["ruWord"], "кот");
    assert_eq!(value["level"], "B1");
    assert!(value.get("createdAt").is_some());
}
