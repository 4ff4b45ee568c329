use thiserror::Error;

/// Failure taxonomy for the quoting flow.
///
/// `Launch`, `LandmarkTimeout` and `Interaction` abort the current step and
/// cost the caller its session. Extraction misses never surface here; the
/// extractor falls back to sentinels instead.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Browser launch failed: {0}")]
    Launch(String),

    #[error("Timed out waiting for page: {0}")]
    LandmarkTimeout(String),

    #[error("Page interaction failed: {0}")]
    Interaction(String),

    #[error("WebDriver error: {0}")]
    WebDriver(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown or expired session: {0}")]
    UnknownSession(String),
}

impl FlowError {
    /// True for failures caused by a confirmation landmark never appearing.
    pub fn is_timeout(&self) -> bool {
        matches!(self, FlowError::LandmarkTimeout(_))
    }
}

impl From<fantoccini::error::CmdError> for FlowError {
    fn from(err: fantoccini::error::CmdError) -> Self {
        FlowError::WebDriver(err.to_string())
    }
}

impl From<fantoccini::error::NewSessionError> for FlowError {
    fn from(err: fantoccini::error::NewSessionError) -> Self {
        FlowError::Launch(err.to_string())
    }
}

impl From<regex::Error> for FlowError {
    fn from(err: regex::Error) -> Self {
        FlowError::Interaction(format!("Pattern compile failed: {}", err))
    }
}
