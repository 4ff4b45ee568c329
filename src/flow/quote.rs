//! Step 4: read the rendered quote page and recover structured results.
//! Comprehensive products live on the default tab; third-party products sit
//! behind a separate tab control that only sometimes exists.

use crate::browser::human_delay;
use crate::config::Config;
use crate::error::FlowError;
use crate::extract::{self, QuoteExtractor};
use crate::flow::page::page_text;
use crate::models::QuoteResult;
use fantoccini::Client;

pub async fn extract_quote_result(
    client: &Client,
    config: &Config,
    extractor: &QuoteExtractor,
) -> Result<QuoteResult, FlowError> {
    tracing::info!("📊 Extracting quote result");

    let text = page_text(client).await?;

    let vehicle = extract::vehicle_description(&text)
        .unwrap_or_else(|| "Unknown vehicle".to_string());
    let driver = extractor.driver_summary(&text);
    let comprehensive_quotes =
        extractor.extract_products(&text, extract::COMPREHENSIVE_PRODUCTS);
    tracing::info!(
        "✅ Comprehensive tab: {} product(s) priced",
        comprehensive_quotes.len()
    );

    let third_party_quotes = match open_third_party_tab(client).await? {
        true => {
            human_delay(config.action_delay_min_ms, config.action_delay_max_ms).await;
            let tab_text = page_text(client).await?;
            let quotes = extractor.extract_products(&tab_text, extract::THIRD_PARTY_PRODUCTS);
            tracing::info!("✅ Third-party tab: {} product(s) priced", quotes.len());
            quotes
        }
        false => {
            tracing::info!("Third-party tab not present, skipping");
            Vec::new()
        }
    };

    Ok(QuoteResult {
        vehicle,
        driver,
        comprehensive_quotes,
        third_party_quotes,
    })
}

/// Clicks the third-party tab if it exists and is visible. Returns whether
/// the tab was opened.
async fn open_third_party_tab(client: &Client) -> Result<bool, FlowError> {
    let js_click_tab = r#"
        const tabs = Array.from(document.querySelectorAll("[role='tab'], .tab, button, a"));
        for (const tab of tabs) {
            const text = (tab.innerText || '').trim();
            if (!text.toLowerCase().includes('third party')) continue;
            const style = window.getComputedStyle(tab);
            if (style.display === 'none' || style.visibility === 'hidden') continue;
            tab.click();
            return { clicked: true, text: text };
        }
        return { clicked: false };
    "#;

    let result = client.execute(js_click_tab, vec![]).await?;
    Ok(result
        .get("clicked")
        .and_then(|v| v.as_bool())
        .unwrap_or(false))
}
