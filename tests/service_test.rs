//! Fail-fast behaviour of the orchestration layer: incomplete lookups must
//! be rejected before any browser resource is created.

use quotepilot::{Config, FlowError, QuoteService, VehicleLookup};
use std::sync::Arc;

fn service() -> QuoteService {
    let config = Config::from_env().expect("config should load from defaults");
    QuoteService::new(Arc::new(config)).expect("service should construct")
}

#[tokio::test]
async fn incomplete_registration_lookup_fails_before_launch() {
    let service = service();
    let lookup = VehicleLookup::Registration {
        rego: "".to_string(),
        jurisdiction: "NSW".to_string(),
    };

    let err = service.begin_quote(&lookup).await.unwrap_err();
    assert!(matches!(err, FlowError::InvalidInput(_)), "got {:?}", err);
    assert_eq!(service.active_sessions().await, 0);
}

#[tokio::test]
async fn incomplete_manual_lookup_fails_before_launch() {
    let service = service();
    let lookup = VehicleLookup::Manual {
        year: "2018".to_string(),
        make: "".to_string(),
        model: "Corolla".to_string(),
        body_type: "Hatch".to_string(),
    };

    let err = service.begin_quote(&lookup).await.unwrap_err();
    assert!(matches!(err, FlowError::InvalidInput(_)), "got {:?}", err);
    assert_eq!(service.active_sessions().await, 0);
}

#[tokio::test]
async fn impossible_cover_start_date_fails_before_any_page_interaction() {
    use quotepilot::{CoverStartDate, OwnerDetails, UsagePurpose};

    let service = service();
    let details = OwnerDetails {
        address: "12 Example Street, Sydney NSW".to_string(),
        under_finance: false,
        purpose: UsagePurpose::Private,
        registered_in_business: false,
        cover_start: Some(CoverStartDate { day: 31, month: 2, year: 2026 }),
        email: None,
    };

    // validation runs before the session lookup, so even an unknown id
    // reports the bad date
    let err = service
        .submit_owner_details("no-such-session", &details)
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::InvalidInput(_)), "got {:?}", err);
}

#[tokio::test]
async fn steps_against_unknown_sessions_are_rejected() {
    let service = service();
    let result = service.finish_quote("no-such-session").await;
    assert!(matches!(result, Err(FlowError::UnknownSession(_))));
}
