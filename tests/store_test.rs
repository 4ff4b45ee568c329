//! Session store lifecycle tests over a mock page handle: no WebDriver
//! endpoint needed to exercise creation, activity refresh, idempotent
//! destruction and the idle reaper.

use async_trait::async_trait;
use quotepilot::session::{PageHandle, SessionState, SessionStore};
use quotepilot::FlowError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
struct MockPage {
    closes: Arc<AtomicUsize>,
}

impl MockPage {
    fn new() -> (Self, Arc<AtomicUsize>) {
        let closes = Arc::new(AtomicUsize::new(0));
        (Self { closes: closes.clone() }, closes)
    }
}

#[async_trait]
impl PageHandle for MockPage {
    async fn teardown(self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

fn store(idle_timeout_ms: u64, reaper_interval_ms: u64) -> SessionStore<MockPage> {
    SessionStore::new(
        Duration::from_millis(idle_timeout_ms),
        Duration::from_millis(reaper_interval_ms),
    )
}

#[tokio::test]
async fn unknown_ids_are_absent() {
    let store = store(10_000, 10_000);
    assert!(store.get_session("no-such-session").await.is_none());
    assert_eq!(store.active_session_count().await, 0);
}

#[tokio::test]
async fn register_then_get_refreshes_and_returns_state() {
    let store = store(10_000, 10_000);
    let (page, _) = MockPage::new();
    let session = store.register(page).await;
    assert_eq!(session.state, SessionState::Initialized);

    let fetched = store.get_session(&session.id).await.expect("session should exist");
    assert_eq!(fetched.id, session.id);
    assert_eq!(fetched.state, SessionState::Initialized);
    assert_eq!(store.active_session_count().await, 1);
}

#[tokio::test]
async fn set_state_advances_and_ignores_absent_ids() {
    let store = store(10_000, 10_000);
    let (page, _) = MockPage::new();
    let session = store.register(page).await;

    store.set_state(&session.id, SessionState::CarFound).await;
    let fetched = store.get_session(&session.id).await.unwrap();
    assert_eq!(fetched.state, SessionState::CarFound);

    // absent id: no panic, no entry materialized
    store.set_state("ghost", SessionState::QuoteReady).await;
    assert_eq!(store.active_session_count().await, 1);
}

#[tokio::test]
async fn destroy_is_idempotent_and_releases_exactly_once() {
    let store = store(10_000, 10_000);
    let (page, closes) = MockPage::new();
    let session = store.register(page).await;

    store.destroy_session(&session.id).await;
    assert!(store.get_session(&session.id).await.is_none());
    assert_eq!(closes.load(Ordering::SeqCst), 1);

    // second destroy is a no-op
    store.destroy_session(&session.id).await;
    assert_eq!(closes.load(Ordering::SeqCst), 1);
    assert_eq!(store.active_session_count().await, 0);
}

#[tokio::test]
async fn concurrent_destroys_release_exactly_once() {
    let store = Arc::new(store(10_000, 10_000));
    let (page, closes) = MockPage::new();
    let session = store.register(page).await;

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let store = Arc::clone(&store);
        let id = session.id.clone();
        tasks.push(tokio::spawn(async move {
            store.destroy_session(&id).await;
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(closes.load(Ordering::SeqCst), 1);
    assert!(store.get_session(&session.id).await.is_none());
}

#[tokio::test]
async fn reaper_destroys_idle_sessions() {
    let store = Arc::new(store(100, 25));
    let (page, closes) = MockPage::new();
    let session = store.register(page).await;

    let reaper = store.start_reaper();
    tokio::time::sleep(Duration::from_millis(500)).await;

    assert!(store.get_session(&session.id).await.is_none());
    assert_eq!(closes.load(Ordering::SeqCst), 1);
    reaper.abort();
}

#[tokio::test]
async fn activity_refresh_staves_off_the_reaper() {
    let store = Arc::new(store(400, 50));
    let (page, closes) = MockPage::new();
    let session = store.register(page).await;

    let reaper = store.start_reaper();

    // keep touching the session well past the idle timeout
    for _ in 0..10 {
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(
            store.get_session(&session.id).await.is_some(),
            "active session must never be reaped"
        );
    }
    assert_eq!(closes.load(Ordering::SeqCst), 0);

    // now leave it idle; the reaper should claim it
    tokio::time::sleep(Duration::from_millis(1200)).await;
    assert!(store.get_session(&session.id).await.is_none());
    assert_eq!(closes.load(Ordering::SeqCst), 1);
    reaper.abort();
}

#[tokio::test]
async fn failed_step_surfaces_timeout_and_destroys_the_session() {
    let store = store(10_000, 10_000);
    let (page, closes) = MockPage::new();
    let session = store.register(page).await;

    // a step whose landmark never appeared, retries exhausted
    let step: Result<(), FlowError> = Err(FlowError::LandmarkTimeout(
        "[\"Already with us?\"] did not appear within 45s".to_string(),
    ));
    let err = store
        .advance_or_destroy(&session.id, step, SessionState::CarDetailsFilled)
        .await
        .unwrap_err();

    assert!(err.is_timeout(), "expected a timeout-class failure, got {:?}", err);
    assert!(
        store.get_session(&session.id).await.is_none(),
        "session must not be retrievable after a failed step"
    );
    assert_eq!(closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn successful_step_advances_state_and_keeps_the_session() {
    let store = store(10_000, 10_000);
    let (page, closes) = MockPage::new();
    let session = store.register(page).await;

    let advanced = store
        .advance_or_destroy(&session.id, Ok("vehicle"), SessionState::CarFound)
        .await
        .unwrap();
    assert_eq!(advanced, "vehicle");

    let fetched = store.get_session(&session.id).await.unwrap();
    assert_eq!(fetched.state, SessionState::CarFound);
    assert_eq!(closes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn destroy_all_clears_the_store() {
    let store = store(10_000, 10_000);
    let (page_a, closes_a) = MockPage::new();
    let (page_b, closes_b) = MockPage::new();
    store.register(page_a).await;
    store.register(page_b).await;
    assert_eq!(store.active_session_count().await, 2);

    store.destroy_all().await;
    assert_eq!(store.active_session_count().await, 0);
    assert_eq!(closes_a.load(Ordering::SeqCst), 1);
    assert_eq!(closes_b.load(Ordering::SeqCst), 1);
}
