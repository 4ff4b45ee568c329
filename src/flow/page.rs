//! Shared page primitives: rendered-text polling, paced input, and the
//! bounded-retry continue click every step advances through.
//!
//! The target renders no structured completion signals, so progress is always
//! confirmed by a landmark substring turning up in `document.body.innerText`.

use crate::browser::human_delay;
use crate::config::Config;
use crate::error::FlowError;
use crate::flow::selectors::QuoteSelectors;
use fantoccini::key::Key;
use fantoccini::{Client, Locator};
use std::time::{Duration, Instant};

/// Full rendered text of the current page.
pub async fn page_text(client: &Client) -> Result<String, FlowError> {
    let value = client
        .execute("return document.body.innerText || '';", vec![])
        .await?;
    Ok(value.as_str().unwrap_or_default().to_string())
}

/// Polls the rendered text until `landmark` appears or the deadline elapses.
pub async fn wait_for_text(
    client: &Client,
    landmark: &str,
    timeout: Duration,
    interval: Duration,
) -> Result<(), FlowError> {
    wait_for_any_text(client, &[landmark], timeout, interval).await
}

/// Any-of variant of [`wait_for_text`]. On timeout logs a bounded prefix of
/// the page text so a selector drift can be diagnosed from logs alone.
pub async fn wait_for_any_text(
    client: &Client,
    landmarks: &[&str],
    timeout: Duration,
    interval: Duration,
) -> Result<(), FlowError> {
    let deadline = Instant::now() + timeout;
    loop {
        let text = page_text(client).await?;
        if landmarks.iter().any(|l| text.contains(l)) {
            return Ok(());
        }
        if Instant::now() >= deadline {
            let preview: String = text.chars().take(300).collect();
            tracing::warn!(
                "⚠️ Landmark {:?} never appeared; page text starts with: {}",
                landmarks,
                preview
            );
            return Err(FlowError::LandmarkTimeout(format!(
                "{:?} did not appear within {}s",
                landmarks,
                timeout.as_secs()
            )));
        }
        tokio::time::sleep(interval).await;
    }
}

/// Waits for an element to render, on the flow's polling cadence.
pub async fn wait_for_element(
    client: &Client,
    config: &Config,
    selector: &str,
    timeout: Duration,
) -> Result<fantoccini::elements::Element, FlowError> {
    client
        .wait()
        .at_most(timeout)
        .every(Duration::from_millis(config.poll_interval_ms))
        .for_element(Locator::Css(selector))
        .await
        .map_err(|_| {
            FlowError::LandmarkTimeout(format!(
                "Element '{}' did not render within {}s",
                selector,
                timeout.as_secs()
            ))
        })
}

/// Clicks the continue control and confirms arrival via landmark text,
/// retrying the click up to the configured budget. An overlay occasionally
/// intercepts the click and it silently no-ops, which is why a single click
/// cannot be trusted.
pub async fn click_continue_with_retry(
    client: &Client,
    config: &Config,
    landmarks: &[&str],
    step_timeout: Duration,
) -> Result<(), FlowError> {
    let attempts = config.continue_retry_max.max(1);
    let per_attempt = step_timeout / attempts;
    let interval = Duration::from_millis(config.poll_interval_ms);

    for attempt in 1..=attempts {
        human_delay(config.action_delay_min_ms, config.action_delay_max_ms).await;
        click_continue(client).await?;
        tracing::debug!("Continue clicked (attempt {}/{})", attempt, attempts);

        match wait_for_any_text(client, landmarks, per_attempt, interval).await {
            Ok(()) => return Ok(()),
            Err(FlowError::LandmarkTimeout(_)) if attempt < attempts => {
                tracing::warn!(
                    "⚠️ No landmark after continue (attempt {}/{}), clicking again",
                    attempt,
                    attempts
                );
            }
            Err(e) => return Err(e),
        }
    }

    Err(FlowError::LandmarkTimeout(format!(
        "{:?} did not appear after {} continue attempts",
        landmarks, attempts
    )))
}

async fn click_continue(client: &Client) -> Result<(), FlowError> {
    for selector in QuoteSelectors::CONTINUE_BUTTONS {
        if let Ok(elem) = client.find(Locator::Css(selector)).await {
            if elem.click().await.is_ok() {
                return Ok(());
            }
        }
    }

    // Class names churn; fall back to button text.
    let js_click_continue = r#"
        const keywords = ['continue', 'next'];
        const buttons = Array.from(document.querySelectorAll("button, input[type='submit'], a.btn"));
        for (const btn of buttons) {
            const text = (btn.innerText || btn.value || '').toLowerCase();
            if (keywords.some(kw => text.includes(kw))) {
                btn.click();
                return { found: true, text: text };
            }
        }
        return { found: false };
    "#;

    let result = client.execute(js_click_continue, vec![]).await?;
    let found = result
        .get("found")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    if found {
        Ok(())
    } else {
        Err(FlowError::Interaction(
            "Continue button not found by any selector".to_string(),
        ))
    }
}

/// Selects an option by its visible label.
pub async fn select_option(client: &Client, selector: &str, label: &str) -> Result<(), FlowError> {
    let elem = client
        .find(Locator::Css(selector))
        .await
        .map_err(|_| FlowError::Interaction(format!("Select '{}' not found", selector)))?;
    elem.select_by_label(label)
        .await
        .map_err(|e| FlowError::Interaction(format!("Could not pick '{}' in '{}': {}", label, selector, e)))?;
    Ok(())
}

/// Yes/No select shorthand for the flag fields.
pub async fn select_flag(client: &Client, selector: &str, value: bool) -> Result<(), FlowError> {
    select_option(client, selector, if value { "Yes" } else { "No" }).await
}

/// Re-dispatches input/change events on a field. The site's client-side
/// framework misses the raw selection event on some selects and leaves its
/// model stale without this nudge.
pub async fn dispatch_change(client: &Client, selector: &str) -> Result<(), FlowError> {
    let js = format!(
        r#"
        const el = document.querySelector("{}");
        if (!el) return false;
        el.dispatchEvent(new Event('input', {{ bubbles: true }}));
        el.dispatchEvent(new Event('change', {{ bubbles: true }}));
        return true;
        "#,
        selector
    );
    client.execute(&js, vec![]).await?;
    Ok(())
}

/// Types a value one keystroke at a time and commits it with a tab-out.
/// The numeric fields ignore values assigned in one shot; only discrete
/// key events register.
pub async fn type_paced(
    client: &Client,
    config: &Config,
    selector: &str,
    value: &str,
) -> Result<(), FlowError> {
    let elem = client
        .find(Locator::Css(selector))
        .await
        .map_err(|_| FlowError::Interaction(format!("Input '{}' not found", selector)))?;
    elem.click().await?;
    elem.clear().await?;

    let mut buf = [0u8; 4];
    for ch in value.chars() {
        elem.send_keys(ch.encode_utf8(&mut buf)).await?;
        human_delay(config.keystroke_delay_min_ms, config.keystroke_delay_max_ms).await;
    }

    let tab = String::from(char::from(Key::Tab));
    elem.send_keys(&tab).await?;
    Ok(())
}
