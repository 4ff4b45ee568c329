//! Step 2: vehicle/owner details. Address autocomplete, finance, usage
//! purpose, business registration, optional cover start date and email.

use crate::browser::human_delay;
use crate::config::Config;
use crate::error::FlowError;
use crate::flow::page::{
    click_continue_with_retry, dispatch_change, select_flag, select_option, wait_for_element,
};
use crate::flow::selectors::QuoteSelectors;
use crate::models::OwnerDetails;
use fantoccini::{Client, Locator};
use regex::Regex;
use std::time::Duration;

/// A committed address shorter than this cannot be a full street address;
/// treat it as a failed autocomplete rather than carrying it forward.
const MIN_COMMITTED_ADDRESS_LEN: usize = 12;

const STREET_KEYWORDS: &[&str] = &[
    "Street", " St", "Road", " Rd", "Avenue", " Ave", "Drive", " Dr", "Court", " Ct", "Place",
    " Pl", "Crescent", " Cres", "Highway", " Hwy", "Lane", " Ln", "Parade", "Boulevard",
];

pub async fn fill_owner_details(
    client: &Client,
    config: &Config,
    details: &OwnerDetails,
) -> Result<(), FlowError> {
    let step_timeout = Duration::from_millis(config.step_timeout_ms);

    tracing::info!("🏠 Filling vehicle/owner details");
    wait_for_element(client, config, QuoteSelectors::ADDRESS_INPUT, step_timeout).await?;

    fill_address_with_retry(client, config, &details.address).await?;
    human_delay(config.action_delay_min_ms, config.action_delay_max_ms).await;

    select_flag(client, QuoteSelectors::UNDER_FINANCE_SELECT, details.under_finance).await?;
    human_delay(config.action_delay_min_ms, config.action_delay_max_ms).await;

    select_option(
        client,
        QuoteSelectors::PURPOSE_SELECT,
        details.purpose.form_value(),
    )
    .await?;
    // The framework does not always react to the raw selection event on this
    // field; without the re-dispatch the purpose silently stays at default.
    dispatch_change(client, QuoteSelectors::PURPOSE_SELECT).await?;
    human_delay(config.action_delay_min_ms, config.action_delay_max_ms).await;

    select_flag(
        client,
        QuoteSelectors::BUSINESS_SELECT,
        details.registered_in_business,
    )
    .await?;
    human_delay(config.action_delay_min_ms, config.action_delay_max_ms).await;

    if let Some(start) = &details.cover_start {
        if let Ok(elem) = client.find(Locator::Css(QuoteSelectors::START_DATE_INPUT)).await {
            elem.clear().await?;
            elem.send_keys(&start.form_value()).await?;
            human_delay(config.action_delay_min_ms, config.action_delay_max_ms).await;
        } else {
            tracing::warn!("⚠️ Start date field not present, leaving site default");
        }
    }

    if let Some(email) = &details.email {
        if let Ok(elem) = client.find(Locator::Css(QuoteSelectors::EMAIL_INPUT)).await {
            elem.clear().await?;
            elem.send_keys(email).await?;
            human_delay(config.action_delay_min_ms, config.action_delay_max_ms).await;
        } else {
            tracing::warn!("⚠️ Email field not present, skipping");
        }
    }

    click_continue_with_retry(
        client,
        config,
        &[QuoteSelectors::DRIVER_PAGE_LANDMARK],
        step_timeout,
    )
    .await?;

    tracing::info!("✅ Owner details submitted");
    Ok(())
}

/// Types the address, waits for the suggestion list, and accepts the first
/// plausible entry. The whole attempt is retried on a bounded budget; if no
/// suggestion is ever accepted and the committed value is too short to be a
/// real address, the step fails.
async fn fill_address_with_retry(
    client: &Client,
    config: &Config,
    address: &str,
) -> Result<(), FlowError> {
    let attempts = config.address_retry_max + 1;
    let address_re = Regex::new(r"^\d+[A-Za-z]?[/\s]\S+")?;

    for attempt in 1..=attempts {
        let input = client
            .find(Locator::Css(QuoteSelectors::ADDRESS_INPUT))
            .await
            .map_err(|_| FlowError::Interaction("Address field not found".to_string()))?;
        input.click().await?;
        input.clear().await?;

        // keystroke pacing keeps the autocomplete firing per character
        let mut buf = [0u8; 4];
        for ch in address.chars() {
            input.send_keys(ch.encode_utf8(&mut buf)).await?;
            human_delay(config.keystroke_delay_min_ms, config.keystroke_delay_max_ms).await;
        }

        human_delay(config.action_delay_min_ms, config.action_delay_max_ms).await;

        if pick_suggestion(client, &address_re).await? {
            let committed = input.prop("value").await?.unwrap_or_default();
            if committed.len() >= MIN_COMMITTED_ADDRESS_LEN {
                tracing::info!("✅ Address accepted: {}", committed);
                return Ok(());
            }
            tracing::warn!(
                "⚠️ Committed address too short ({:?}), retrying (attempt {}/{})",
                committed,
                attempt,
                attempts
            );
        } else {
            tracing::warn!(
                "⚠️ No address suggestion accepted (attempt {}/{})",
                attempt,
                attempts
            );
        }
    }

    Err(FlowError::Interaction(format!(
        "No address suggestion could be resolved for '{}' after {} attempts",
        address, attempts
    )))
}

/// Scans the suggestion list for an address-shaped entry, falling back to any
/// entry carrying a street-type keyword. Returns whether one was clicked.
async fn pick_suggestion(client: &Client, address_re: &Regex) -> Result<bool, FlowError> {
    for selector in QuoteSelectors::ADDRESS_SUGGESTIONS {
        let items = match client.find_all(Locator::Css(selector)).await {
            Ok(items) if !items.is_empty() => items,
            _ => continue,
        };

        let mut fallback = None;
        for item in items {
            let text = match item.text().await {
                Ok(text) => text,
                Err(_) => continue,
            };
            let trimmed = text.trim();
            if address_re.is_match(trimmed) {
                item.click().await?;
                tracing::debug!("Picked suggestion: {}", trimmed);
                return Ok(true);
            }
            if fallback.is_none() && STREET_KEYWORDS.iter().any(|kw| trimmed.contains(kw)) {
                fallback = Some(item);
            }
        }

        if let Some(item) = fallback {
            item.click().await?;
            tracing::debug!("Picked street-keyword fallback suggestion");
            return Ok(true);
        }
    }
    Ok(false)
}
