//! Orchestration over the store and the flow engine: per-step lifecycle
//! transitions and the destroy-on-failure policy. A failed step is never
//! resumable: the session's browser is torn down and the caller restarts
//! from vehicle lookup.

use crate::config::Config;
use crate::error::FlowError;
use crate::extract::QuoteExtractor;
use crate::flow;
use crate::models::{DriverDetails, OwnerDetails, QuoteResult, VehicleLookup};
use crate::session::{QuoteSessionStore, Session, SessionState, SessionStore};
use fantoccini::Client;
use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeginQuoteOutcome {
    pub session_id: String,
    pub vehicle: String,
}

pub struct QuoteService {
    config: Arc<Config>,
    store: Arc<QuoteSessionStore>,
    extractor: QuoteExtractor,
}

impl QuoteService {
    pub fn new(config: Arc<Config>) -> Result<Self, FlowError> {
        let extractor = QuoteExtractor::new(config.extraction_window)?;
        let store = Arc::new(SessionStore::from_config(&config));
        Ok(Self {
            config,
            store,
            extractor,
        })
    }

    /// Spawns the store's idle reaper. Abort the handle at process stop.
    pub fn start_reaper(&self) -> JoinHandle<()> {
        self.store.start_reaper()
    }

    pub fn store(&self) -> &Arc<QuoteSessionStore> {
        &self.store
    }

    pub async fn active_sessions(&self) -> usize {
        self.store.active_session_count().await
    }

    pub async fn destroy(&self, session_id: &str) {
        self.store.destroy_session(session_id).await;
    }

    /// Step 1: validates the lookup, launches a session and locates the
    /// vehicle. Invalid lookups fail before any browser resource is created.
    pub async fn begin_quote(&self, lookup: &VehicleLookup) -> Result<BeginQuoteOutcome, FlowError> {
        lookup.validate()?;

        let session = self.store.create_session(&self.config).await?;

        let located = match lookup {
            VehicleLookup::Registration { rego, jurisdiction } => {
                flow::locate_by_registration(&session.handle, &self.config, rego, jurisdiction)
                    .await
            }
            VehicleLookup::Manual {
                year,
                make,
                model,
                body_type,
            } => {
                flow::locate_manually(&session.handle, &self.config, year, make, model, body_type)
                    .await
            }
        };

        let vehicle = self
            .store
            .advance_or_destroy(&session.id, located, SessionState::CarFound)
            .await?;
        Ok(BeginQuoteOutcome {
            session_id: session.id,
            vehicle,
        })
    }

    /// Step 2. The session must be in `CarFound`.
    pub async fn submit_owner_details(
        &self,
        session_id: &str,
        details: &OwnerDetails,
    ) -> Result<(), FlowError> {
        details.validate()?;
        let session = self.checked_out(session_id).await?;
        let result = flow::fill_owner_details(&session.handle, &self.config, details).await;
        self.store
            .advance_or_destroy(session_id, result, SessionState::CarDetailsFilled)
            .await
    }

    /// Step 3. The session must be in `CarDetailsFilled`.
    pub async fn submit_driver_details(
        &self,
        session_id: &str,
        details: &DriverDetails,
    ) -> Result<(), FlowError> {
        let session = self.checked_out(session_id).await?;
        let result = flow::fill_driver_details(&session.handle, &self.config, details).await;
        self.store
            .advance_or_destroy(session_id, result, SessionState::DriverDetailsFilled)
            .await
    }

    /// Step 4: extracts the quote result and reclaims the browser. The
    /// session is single-use and is destroyed whether extraction succeeds or
    /// not.
    pub async fn finish_quote(&self, session_id: &str) -> Result<QuoteResult, FlowError> {
        let session = self.checked_out(session_id).await?;
        let result =
            flow::extract_quote_result(&session.handle, &self.config, &self.extractor).await;
        if result.is_ok() {
            self.store.set_state(session_id, SessionState::QuoteReady).await;
        }
        self.store.destroy_session(session_id).await;
        result
    }

    async fn checked_out(&self, session_id: &str) -> Result<Session<Client>, FlowError> {
        self.store
            .get_session(session_id)
            .await
            .ok_or_else(|| FlowError::UnknownSession(session_id.to_string()))
    }
}
