use crate::config::Config;
use crate::error::FlowError;
use fantoccini::{Client, ClientBuilder};
use rand::Rng;
use serde_json::json;
use std::time::Duration;

/// Launches one isolated browser instance configured to look like a human
/// visitor: automation flags stripped, fixed locale/timezone/geolocation,
/// realistic viewport and user agent.
///
/// On failure no session must be retained by the caller; the error carries
/// no half-initialized handle.
pub async fn launch(config: &Config) -> Result<Client, FlowError> {
    let mut caps = serde_json::Map::new();

    let mut chrome_opts = serde_json::Map::new();

    let mut args = vec![
        "--disable-blink-features=AutomationControlled".to_string(),
        "--no-sandbox".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--disable-gpu".to_string(),
        "--window-size=1366,768".to_string(),
        format!(
            "--lang={}",
            config.accept_language.split(',').next().unwrap_or("en-AU")
        ),
        "--disable-infobars".to_string(),
        "--exclude-switches=enable-automation".to_string(),
        format!("--user-agent={}", config.user_agent),
    ];

    if config.headless {
        args.push("--headless=new".to_string());
        args.push("--disable-software-rasterizer".to_string());
    }

    if let Some(proxy_url) = &config.proxy_url {
        args.push(format!("--proxy-server={}", proxy_url));
    }

    chrome_opts.insert("args".to_string(), json!(args));
    chrome_opts.insert("excludeSwitches".to_string(), json!(["enable-automation"]));

    let mut prefs = serde_json::Map::new();
    prefs.insert("credentials_enable_service".to_string(), json!(false));
    prefs.insert("profile.password_manager_enabled".to_string(), json!(false));
    chrome_opts.insert("prefs".to_string(), json!(prefs));

    caps.insert("goog:chromeOptions".to_string(), json!(chrome_opts));
    caps.insert("browserName".to_string(), json!("chrome"));
    caps.insert("acceptInsecureCerts".to_string(), json!(true));
    caps.insert("timezone".to_string(), json!(config.timezone));

    tracing::info!("Connecting to WebDriver at {}", config.webdriver_url);

    let client = ClientBuilder::native()
        .capabilities(caps)
        .connect(&config.webdriver_url)
        .await?;

    let (lat, lng) = config.geolocation;
    let languages: Vec<&str> = config.accept_language.split(',')
        .map(|l| l.split(';').next().unwrap_or(l))
        .collect();

    // Mask the obvious automation signals before the first navigation.
    let stealth_script = format!(
        r#"
        Object.defineProperty(navigator, 'webdriver', {{
            get: () => undefined
        }});

        window.navigator.chrome = {{
            runtime: {{}}
        }};

        const originalQuery = window.navigator.permissions.query;
        window.navigator.permissions.query = (parameters) => (
            parameters.name === 'notifications' ?
                Promise.resolve({{ state: Notification.permission }}) :
                originalQuery(parameters)
        );

        Object.defineProperty(navigator, 'plugins', {{
            get: () => [1, 2, 3, 4, 5]
        }});

        Object.defineProperty(navigator, 'languages', {{
            get: () => {languages}
        }});

        navigator.geolocation.getCurrentPosition = (success) => {{
            success({{
                coords: {{
                    latitude: {lat},
                    longitude: {lng},
                    accuracy: 50
                }},
                timestamp: Date.now()
            }});
        }};
        "#,
        languages = serde_json::to_string(&languages).unwrap_or_else(|_| "[\"en-AU\"]".into()),
        lat = lat,
        lng = lng,
    );

    if let Err(e) = client.execute(&stealth_script, vec![]).await {
        tracing::warn!("⚠️ Stealth script failed to apply: {:?}", e);
    } else {
        tracing::debug!("Stealth script applied");
    }

    tracing::info!("✅ Browser launched");

    Ok(client)
}

/// Suspends for a uniformly random duration in `[min_ms, max_ms]`.
///
/// Every DOM interaction in the flow is separated by one of these pauses,
/// both to stay under the target's bot-defence thresholds and to give its
/// client-side framework time to settle between state changes.
pub async fn human_delay(min_ms: u64, max_ms: u64) {
    let wait = if max_ms > min_ms {
        rand::thread_rng().gen_range(min_ms..=max_ms)
    } else {
        min_ms
    };
    tokio::time::sleep(Duration::from_millis(wait)).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn human_delay_stays_in_range() {
        let start = Instant::now();
        human_delay(20, 60).await;
        let elapsed = start.elapsed().as_millis();
        assert!(elapsed >= 20, "delay of {}ms was below the minimum", elapsed);
        // generous ceiling; scheduler jitter can stretch the sleep
        assert!(elapsed < 800, "delay of {}ms ran far past the maximum", elapsed);
    }

    #[tokio::test]
    async fn human_delay_handles_degenerate_range() {
        human_delay(10, 10).await;
        human_delay(10, 5).await;
    }
}
