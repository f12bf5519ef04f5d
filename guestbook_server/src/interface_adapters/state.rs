use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::domain::entities::GuestbookKey;
use crate::domain::ports::{Clock, GreetingStore, IdentityProvider, SessionStore};
use crate::use_cases::sessions::SessionManager;

pub type SharedClock = Arc<dyn Clock>;
pub type SharedSessionStore = Arc<dyn SessionStore>;

// What a session handler does when saving the session fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionSaveFailurePolicy {
    // Log server-side and still answer 200.
    #[default]
    Log,
    // Answer 500 with the raw store error.
    Fail,
}

impl FromStr for SessionSaveFailurePolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "log" => Ok(Self::Log),
            "fail" => Ok(Self::Fail),
            other => Err(format!("unknown session save failure policy: {other}")),
        }
    }
}

// Knobs for the session demonstration routes.
#[derive(Clone, Copy, Debug, Default)]
pub struct SessionDemoSettings {
    pub max_age_override: Option<i64>,
    pub save_failure: SessionSaveFailurePolicy,
}

// Application state shared by all handlers.
pub struct AppState {
    // We use Arc<dyn Trait> to hold any implementation (dependency injection).
    pub greetings: Arc<dyn GreetingStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub clock: SharedClock,
    pub session_store: SharedSessionStore,
    pub sessions: SessionManager<SharedClock, SharedSessionStore>,
    pub guestbook: GuestbookKey,
    pub session_demo: SessionDemoSettings,
}

// System clock adapter used by guestbook use cases.
#[derive(Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}
