//! Behaviour-driven tests for word resolution over the in-memory store.
//!
//! Each scenario drives the public service and checks the shared-cache
//! guarantees: one provider call per unseen word, one record per normalised
//! text and one link per user.

use std::sync::Arc;
use std::time::Duration;

use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use tokio::runtime::Runtime;
use wordbook::domain::ports::{
    FixtureTranslationProvider, InMemoryWordRepository, ResolveWordRequest, WordCommand,
    WordQuery,
};
use wordbook::domain::{CefrLevel, Error, UserId, Word, WordService};

type Service = WordService<InMemoryWordRepository, FixtureTranslationProvider>;
type Resolution = Result<Word, Error>;

/// Wrapper so the runtime can live in a `Slot`.
#[derive(Clone)]
struct RuntimeHandle(Arc<Runtime>);

#[derive(Default, ScenarioState)]
struct ResolutionWorld {
    runtime: Slot<RuntimeHandle>,
    repository: Slot<Arc<InMemoryWordRepository>>,
    provider: Slot<Arc<FixtureTranslationProvider>>,
    service: Slot<Arc<Service>>,
    results: Slot<Vec<Resolution>>,
}

impl ResolutionWorld {
    fn runtime(&self) -> Arc<Runtime> {
        self.runtime.get().expect("runtime initialised").0
    }

    fn service(&self) -> Arc<Service> {
        self.service.get().expect("service initialised")
    }

    fn record(&self, outcomes: impl IntoIterator<Item = Resolution>) {
        let mut results = self.results.get().unwrap_or_default();
        results.extend(outcomes);
        self.results.set(results);
    }

    fn results(&self) -> Vec<Resolution> {
        self.results.get().unwrap_or_default()
    }

    fn resolve_as(&self, user_id: i64, word: &str) -> Resolution {
        let service = self.service();
        let request = ResolveWordRequest::new(user(user_id), word);
        let outcome = self
            .runtime()
            .block_on(async move { service.resolve(request).await });
        self.record([outcome.clone()]);
        outcome
    }
}

fn user(raw: i64) -> UserId {
    UserId::new(raw).expect("valid user id")
}

#[fixture]
fn world() -> ResolutionWorld {
    ResolutionWorld::default()
}

#[given("an empty shared vocabulary")]
fn an_empty_shared_vocabulary(world: &ResolutionWorld) {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .enable_all()
        .build()
        .expect("runtime builds");
    let repository = Arc::new(InMemoryWordRepository::new());
    let provider = Arc::new(
        FixtureTranslationProvider::new()
            .with_answer("apple", "яблоко", CefrLevel::A1)
            .with_answer("serendipity", "счастливая случайность", CefrLevel::C1),
    );
    let service = Arc::new(
        WordService::new(repository.clone(), provider.clone())
            .with_provider_timeout(Duration::from_secs(5)),
    );
    assert_eq!(repository.word_count(), 0);

    world.runtime.set(RuntimeHandle(Arc::new(runtime)));
    world.repository.set(repository);
    world.provider.set(provider);
    world.service.set(service);
}

#[given("user {user_id} has already added \"{word}\"")]
fn user_has_already_added(world: &ResolutionWorld, user_id: i64, word: String) {
    let outcome = world.resolve_as(user_id, &word);
    assert!(outcome.is_ok(), "seeding {word} failed: {outcome:?}");
}

#[when("user {user_id} adds \"{word}\"")]
fn user_adds(world: &ResolutionWorld, user_id: i64, word: String) {
    world.resolve_as(user_id, &word);
}

#[when("{count} users add \"{word}\" at the same time")]
fn users_add_at_the_same_time(world: &ResolutionWorld, count: i64, word: String) {
    let service = world.service();
    let outcomes = world.runtime().block_on(async move {
        let tasks: Vec<_> = (1..=count)
            .map(|id| {
                let service = service.clone();
                let request = ResolveWordRequest::new(user(id), word.clone());
                tokio::spawn(async move { service.resolve(request).await })
            })
            .collect();
        let mut outcomes = Vec::with_capacity(tasks.len());
        for task in tasks {
            outcomes.push(task.await.expect("resolution task joins"));
        }
        outcomes
    });
    world.record(outcomes);
}

#[then("every caller receives the same word")]
fn every_caller_receives_the_same_word(world: &ResolutionWorld) {
    let ids: Vec<_> = world
        .results()
        .iter()
        .map(|outcome| outcome.as_ref().expect("resolution succeeds").id)
        .collect();
    let Some(first) = ids.first().copied() else {
        panic!("no resolutions were recorded");
    };
    assert!(ids.iter().all(|id| *id == first), "ids diverged: {ids:?}");
}

#[then("the translation provider answered {calls} requests")]
fn the_translation_provider_answered(world: &ResolutionWorld, calls: usize) {
    let provider = world.provider.get().expect("provider initialised");
    assert_eq!(provider.calls(), calls);
}

#[then("the vocabulary holds {words} words and {links} links")]
fn the_vocabulary_holds(world: &ResolutionWorld, words: usize, links: usize) {
    let repository = world.repository.get().expect("repository initialised");
    assert_eq!(repository.word_count(), words);
    assert_eq!(repository.link_count(), links);
}

#[then("the last resolution fails with \"{code}\"")]
fn the_last_resolution_fails_with(world: &ResolutionWorld, code: String) {
    let results = world.results();
    let error = results
        .last()
        .and_then(|outcome| outcome.as_ref().err())
        .expect("last resolution failed");
    let actual = serde_json::to_value(error.code()).expect("error code serialises");
    assert_eq!(actual, serde_json::Value::String(code));
}

#[then("user {user_id} lists \"{word}\"")]
fn user_lists(world: &ResolutionWorld, user_id: i64, word: String) {
    let service = world.service();
    let mine = world
        .runtime()
        .block_on(async move { service.list_mine(user(user_id)).await })
        .expect("listing succeeds");
    assert!(
        mine.iter().any(|stored| stored.text.as_str() == word),
        "user {user_id} should list {word}"
    );
}

#[scenario(
    path = "tests/features/word_resolution.feature",
    name = "Adding a word twice is idempotent"
)]
fn adding_a_word_twice_is_idempotent(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/word_resolution.feature",
    name = "A second user hits the shared cache"
)]
fn a_second_user_hits_the_shared_cache(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/word_resolution.feature",
    name = "Concurrent first resolutions share one translation"
)]
fn concurrent_first_resolutions_share_one_translation(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/word_resolution.feature",
    name = "Invalid words never reach the provider"
)]
fn invalid_words_never_reach_the_provider(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/word_resolution.feature",
    name = "Provider failures create nothing"
)]
fn provider_failures_create_nothing(world: ResolutionWorld) {
    let _ = world;
}
