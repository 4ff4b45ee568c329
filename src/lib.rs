//! Session-scoped browser automation for a multi-step car-insurance quoting
//! flow. One browser per in-progress quote, four ordered steps, completion
//! inferred from rendered text rather than structured signals.
//!
//! The outer transport is a separate concern; this crate exposes the session
//! store, the flow steps, and a [`service::QuoteService`] that ties the two
//! together with the destroy-on-failure policy.

pub mod browser;
pub mod config;
pub mod error;
pub mod extract;
pub mod flow;
pub mod models;
pub mod service;
pub mod session;

pub use config::Config;
pub use error::FlowError;
pub use extract::QuoteExtractor;
pub use models::{
    CoverStartDate, DriverDetails, DriverSummary, Gender, OwnerDetails, ProductQuote, QuoteResult,
    UsagePurpose, VehicleLookup,
};
pub use service::{BeginQuoteOutcome, QuoteService};
pub use session::{QuoteSessionStore, SessionState, SessionStore};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Logging bootstrap for embedding processes: env-filtered subscriber with
/// a sensible default level for this crate.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,quotepilot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
