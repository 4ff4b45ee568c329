//! Step 1: locate the vehicle, by registration or by manual selection.

use crate::browser::human_delay;
use crate::config::Config;
use crate::error::FlowError;
use crate::extract::parser::vehicle_description;
use crate::flow::page::{page_text, select_option, wait_for_element};
use crate::flow::selectors::QuoteSelectors;
use fantoccini::{Client, Locator};
use std::time::Duration;

/// Looks the vehicle up by plate and jurisdiction. Returns the human-readable
/// vehicle description the site renders back (e.g. "2018 Toyota Corolla").
pub async fn locate_by_registration(
    client: &Client,
    config: &Config,
    rego: &str,
    jurisdiction: &str,
) -> Result<String, FlowError> {
    let step_timeout = Duration::from_millis(config.step_timeout_ms);

    tracing::info!("🚗 Vehicle lookup by registration: {}", mask(rego));
    client.goto(&config.quote_entry_url).await?;

    let rego_input = wait_for_element(client, config, QuoteSelectors::REGO_INPUT, step_timeout).await?;
    human_delay(config.action_delay_min_ms, config.action_delay_max_ms).await;

    rego_input.clear().await?;
    rego_input.send_keys(rego).await?;
    human_delay(config.action_delay_min_ms, config.action_delay_max_ms).await;

    select_option(client, QuoteSelectors::JURISDICTION_SELECT, jurisdiction).await?;
    human_delay(config.action_delay_min_ms, config.action_delay_max_ms).await;

    submit_lookup(client).await?;

    // Arrival at step 2 is confirmed by its address field rendering.
    wait_for_element(client, config, QuoteSelectors::ADDRESS_INPUT, step_timeout)
        .await
        .map_err(|e| match e {
            FlowError::LandmarkTimeout(msg) => FlowError::LandmarkTimeout(format!(
                "{}. Verify the registration and state, or switch to manual lookup",
                msg
            )),
            other => other,
        })?;

    let text = page_text(client).await?;
    let description = vehicle_description(&text).unwrap_or_else(|| "Unknown vehicle".to_string());
    tracing::info!("✅ Vehicle found: {}", description);
    Ok(description)
}

/// Manual lookup: year, make, model and body type from cascading selects.
/// Each pick repopulates the next list, so every selection is paced.
pub async fn locate_manually(
    client: &Client,
    config: &Config,
    year: &str,
    make: &str,
    model: &str,
    body_type: &str,
) -> Result<String, FlowError> {
    let step_timeout = Duration::from_millis(config.step_timeout_ms);

    tracing::info!("🚗 Manual vehicle lookup: {} {} {}", year, make, model);
    client.goto(&config.quote_entry_url).await?;
    wait_for_element(client, config, QuoteSelectors::REGO_INPUT, step_timeout).await?;
    human_delay(config.action_delay_min_ms, config.action_delay_max_ms).await;

    open_manual_lookup(client).await?;

    let picks = [
        (QuoteSelectors::YEAR_SELECT, year),
        (QuoteSelectors::MAKE_SELECT, make),
        (QuoteSelectors::MODEL_SELECT, model),
        (QuoteSelectors::BODY_TYPE_SELECT, body_type),
    ];
    for (selector, value) in picks {
        wait_for_element(client, config, selector, step_timeout).await?;
        // let the dependent list finish repopulating before touching it
        human_delay(config.action_delay_min_ms, config.action_delay_max_ms).await;
        select_option(client, selector, value).await?;
        tracing::debug!("Selected '{}' in {}", value, selector);
    }

    human_delay(config.action_delay_min_ms, config.action_delay_max_ms).await;
    submit_lookup(client).await?;
    wait_for_element(client, config, QuoteSelectors::ADDRESS_INPUT, step_timeout).await?;

    let text = page_text(client).await?;
    let description = vehicle_description(&text)
        .unwrap_or_else(|| format!("{} {} {}", year, make, model));
    tracing::info!("✅ Vehicle selected: {}", description);
    Ok(description)
}

async fn submit_lookup(client: &Client) -> Result<(), FlowError> {
    for selector in QuoteSelectors::SEARCH_BUTTONS {
        if let Ok(elem) = client.find(Locator::Css(selector)).await {
            if elem.click().await.is_ok() {
                return Ok(());
            }
        }
    }
    Err(FlowError::Interaction(
        "Vehicle search button not found".to_string(),
    ))
}

async fn open_manual_lookup(client: &Client) -> Result<(), FlowError> {
    for selector in QuoteSelectors::MANUAL_LOOKUP_LINKS {
        if let Ok(elem) = client.find(Locator::Css(selector)).await {
            if elem.click().await.is_ok() {
                return Ok(());
            }
        }
    }

    let js_click_manual = r#"
        const links = Array.from(document.querySelectorAll('a, button'));
        for (const link of links) {
            const text = (link.innerText || '').toLowerCase();
            if (text.includes("don't know") || text.includes('manual') || text.includes('find my car')) {
                link.click();
                return { found: true };
            }
        }
        return { found: false };
    "#;
    let result = client.execute(js_click_manual, vec![]).await?;
    let found = result
        .get("found")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    if found {
        Ok(())
    } else {
        Err(FlowError::Interaction(
            "Manual lookup link not found".to_string(),
        ))
    }
}

/// The plate is personal data; keep it out of logs. Counts characters, not
/// bytes, since the rego string arrives from the caller unvalidated.
fn mask(rego: &str) -> String {
    let total = rego.chars().count();
    if total <= 2 {
        return "*".repeat(total);
    }
    let prefix: String = rego.chars().take(2).collect();
    format!("{}{}", prefix, "*".repeat(total - 2))
}
