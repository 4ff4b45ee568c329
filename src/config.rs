use std::env;

/// Runtime configuration, loaded once from the environment.
///
/// Every empirical constant of the flow (extraction window, retry budgets,
/// poll cadence, step deadlines) lives here rather than in code. They are
/// tuned against one observed site layout and will need re-tuning when the
/// target changes.
#[derive(Debug, Clone)]
pub struct Config {
    /// Entry point of the quoting form.
    pub quote_entry_url: String,

    // Browser
    pub webdriver_url: String,
    pub headless: bool,
    pub proxy_url: Option<String>,
    pub user_agent: String,
    pub accept_language: String,
    pub timezone: String,
    pub geolocation: (f64, f64),

    // Pacing
    pub action_delay_min_ms: u64,
    pub action_delay_max_ms: u64,
    pub keystroke_delay_min_ms: u64,
    pub keystroke_delay_max_ms: u64,

    // Confirmation polling
    pub poll_interval_ms: u64,
    pub step_timeout_ms: u64,
    pub quote_timeout_ms: u64,

    // Retry budgets
    pub continue_retry_max: u32,
    pub address_retry_max: u32,

    // Extraction
    pub extraction_window: usize,

    // Session lifecycle
    pub session_idle_timeout_secs: u64,
    pub reaper_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        Ok(Config {
            quote_entry_url: env::var("QUOTE_ENTRY_URL")
                .unwrap_or_else(|_| "https://quote.example.insurance/car".to_string()),

            webdriver_url: env::var("WEBDRIVER_URL")
                .unwrap_or_else(|_| "http://localhost:9515".to_string()),
            headless: env::var("HEADLESS")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
            proxy_url: env::var("PROXY_URL").ok().filter(|s| !s.is_empty()),
            user_agent: env::var("USER_AGENT").unwrap_or_else(|_| {
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36".to_string()
            }),
            accept_language: env::var("ACCEPT_LANGUAGE")
                .unwrap_or_else(|_| "en-AU,en;q=0.9".to_string()),
            timezone: env::var("TIMEZONE")
                .unwrap_or_else(|_| "Australia/Sydney".to_string()),
            // Sydney CBD; fixed so repeated runs present one consistent fingerprint
            geolocation: (
                env::var("GEO_LAT").ok().and_then(|s| s.parse().ok()).unwrap_or(-33.8688),
                env::var("GEO_LNG").ok().and_then(|s| s.parse().ok()).unwrap_or(151.2093),
            ),

            action_delay_min_ms: env_u64("ACTION_DELAY_MIN_MS", 400),
            action_delay_max_ms: env_u64("ACTION_DELAY_MAX_MS", 1200),
            keystroke_delay_min_ms: env_u64("KEYSTROKE_DELAY_MIN_MS", 80),
            keystroke_delay_max_ms: env_u64("KEYSTROKE_DELAY_MAX_MS", 180),

            poll_interval_ms: env_u64("POLL_INTERVAL_MS", 2000),
            step_timeout_ms: env_u64("STEP_TIMEOUT_MS", 45_000),
            // quote computation on the target backend routinely takes 15-20s
            quote_timeout_ms: env_u64("QUOTE_TIMEOUT_MS", 60_000),

            continue_retry_max: env_u64("CONTINUE_RETRY_MAX", 3) as u32,
            address_retry_max: env_u64("ADDRESS_RETRY_MAX", 2) as u32,

            extraction_window: env_u64("EXTRACTION_WINDOW", 500) as usize,

            session_idle_timeout_secs: env_u64("SESSION_IDLE_TIMEOUT_SECS", 600),
            reaper_interval_secs: env_u64("REAPER_INTERVAL_SECS", 60),
        })
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key).ok().and_then(|s| s.parse().ok()).unwrap_or(default)
}
