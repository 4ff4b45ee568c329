pub mod store;

pub use store::{PageHandle, Session, SessionState, SessionStore};

/// Store over real WebDriver-backed sessions.
pub type QuoteSessionStore = SessionStore<fantoccini::Client>;
