use crate::browser;
use crate::config::Config;
use crate::error::FlowError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Owned browser resource held by a session.
///
/// The store is generic over this seam so its lifecycle behaviour (idempotent
/// destroy, activity refresh, idle reaping) can be exercised without a live
/// WebDriver endpoint.
#[async_trait]
pub trait PageHandle: Clone + Send + Sync + 'static {
    /// Releases the underlying browser. Must tolerate the browser already
    /// being gone. Teardown races with the reaper are expected.
    async fn teardown(self);
}

#[async_trait]
impl PageHandle for fantoccini::Client {
    async fn teardown(self) {
        if let Err(e) = self.close().await {
            tracing::debug!("Browser was already closed: {:?}", e);
        }
    }
}

/// Lifecycle of one quote attempt, advanced step by step by the flow engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Initialized,
    CarFound,
    CarDetailsFilled,
    DriverDetailsFilled,
    QuoteReady,
}

/// Snapshot of a live session as handed to callers. The handle is a cheap
/// clone over the same underlying browser.
#[derive(Debug, Clone)]
pub struct Session<H> {
    pub id: String,
    pub handle: H,
    pub state: SessionState,
}

struct Entry<H> {
    handle: H,
    state: SessionState,
    created_at: Instant,
    last_activity: Instant,
}

/// Process-wide registry of in-progress quote sessions.
///
/// One browser per session, exclusively owned; entries leave the map either
/// by explicit destroy or by the idle reaper, and in both cases the browser
/// is released exactly once (removal under the write lock decides the
/// winner).
pub struct SessionStore<H: PageHandle> {
    sessions: RwLock<HashMap<String, Entry<H>>>,
    idle_timeout: Duration,
    reaper_interval: Duration,
}

impl<H: PageHandle> SessionStore<H> {
    pub fn new(idle_timeout: Duration, reaper_interval: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_timeout,
            reaper_interval,
        }
    }

    /// Registers an already-launched browser under a fresh session id.
    pub async fn register(&self, handle: H) -> Session<H> {
        let id = Uuid::new_v4().to_string();
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        sessions.insert(
            id.clone(),
            Entry {
                handle: handle.clone(),
                state: SessionState::Initialized,
                created_at: now,
                last_activity: now,
            },
        );
        tracing::info!("🆕 Session created: {} (active: {})", id, sessions.len());
        Session {
            id,
            handle,
            state: SessionState::Initialized,
        }
    }

    /// Lookup with activity refresh. Any access through here extends the
    /// session's life; this is the only mechanism that does.
    pub async fn get_session(&self, id: &str) -> Option<Session<H>> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(id)?;
        entry.last_activity = Instant::now();
        Some(Session {
            id: id.to_string(),
            handle: entry.handle.clone(),
            state: entry.state,
        })
    }

    /// Advances the lifecycle label. No effect on an absent id.
    pub async fn set_state(&self, id: &str, state: SessionState) {
        let mut sessions = self.sessions.write().await;
        if let Some(entry) = sessions.get_mut(id) {
            tracing::debug!("Session {}: {:?} -> {:?}", id, entry.state, state);
            entry.state = state;
            entry.last_activity = Instant::now();
        }
    }

    /// Idempotent teardown: removes the entry and releases its browser.
    /// Safe to call twice and safe to race with a reaper sweep; whichever
    /// caller wins the removal performs the single teardown.
    pub async fn destroy_session(&self, id: &str) {
        let removed = {
            let mut sessions = self.sessions.write().await;
            sessions.remove(id)
        };
        match removed {
            Some(entry) => {
                let age = entry.created_at.elapsed().as_secs();
                entry.handle.teardown().await;
                tracing::info!("🗑️ Session destroyed: {} (lived {}s)", id, age);
            }
            None => {
                tracing::debug!("destroy_session on absent id: {}", id);
            }
        }
    }

    pub async fn active_session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Spawns the idle reaper: a periodic sweep that destroys sessions whose
    /// last activity is older than the idle timeout. Abort the returned
    /// handle at process stop.
    pub fn start_reaper(self: &Arc<Self>) -> JoinHandle<()> {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(store.reaper_interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let expired: Vec<String> = {
                    let sessions = store.sessions.read().await;
                    sessions
                        .iter()
                        .filter(|(_, e)| e.last_activity.elapsed() > store.idle_timeout)
                        .map(|(id, _)| id.clone())
                        .collect()
                };
                for id in expired {
                    tracing::warn!("⏰ Session idle past timeout, reaping: {}", id);
                    store.destroy_session(&id).await;
                }
            }
        })
    }

    /// Step-failure policy: a successful step advances the lifecycle label;
    /// a failed one costs the caller the session and its browser. The flow
    /// is never resumable mid-step.
    pub async fn advance_or_destroy<T>(
        &self,
        id: &str,
        result: Result<T, FlowError>,
        next: SessionState,
    ) -> Result<T, FlowError> {
        match result {
            Ok(value) => {
                self.set_state(id, next).await;
                Ok(value)
            }
            Err(e) => {
                tracing::error!("❌ Step failed, destroying session {}: {}", id, e);
                self.destroy_session(id).await;
                Err(e)
            }
        }
    }

    /// Destroys every live session. For process shutdown.
    pub async fn destroy_all(&self) {
        let ids: Vec<String> = {
            let sessions = self.sessions.read().await;
            sessions.keys().cloned().collect()
        };
        for id in ids {
            self.destroy_session(&id).await;
        }
    }
}

impl SessionStore<fantoccini::Client> {
    /// Store sized from runtime configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Duration::from_secs(config.session_idle_timeout_secs),
            Duration::from_secs(config.reaper_interval_secs),
        )
    }

    /// Launches a browser and registers it as a new session. Launch failure
    /// propagates and leaves no entry behind.
    pub async fn create_session(&self, config: &Config) -> Result<Session<fantoccini::Client>, FlowError> {
        let client = browser::launch(config).await?;
        Ok(self.register(client).await)
    }
}
