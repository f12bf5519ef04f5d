use tracing::{debug, warn};

use crate::domain::entities::{SessionKey, SessionValue};
use crate::domain::errors::GuestbookError;
use crate::domain::ports::{Clock, SessionStore};
use crate::use_cases::sessions::{SavedSession, SessionManager};

// Demonstration values written by the session demo.
pub const GREETING_KEY: &str = "foo";
pub const GREETING_VALUE: &str = "bar";
pub const COUNTER_KEY: i64 = 42;
pub const COUNTER_SEED: i64 = 43;

// Writes the demonstration values into the named session.
pub struct SessionDemoUseCase<'a, C, S> {
    pub manager: &'a SessionManager<C, S>,
    pub max_age_override: Option<i64>,
}

impl<C, S> SessionDemoUseCase<'_, C, S>
where
    C: Clock,
    S: SessionStore,
{
    pub async fn execute(
        &self,
        name: &str,
        session_id: Option<&str>,
    ) -> Result<SavedSession, GuestbookError> {
        let mut session = self.manager.get(name, session_id).await;

        session.values.insert(GREETING_KEY, GREETING_VALUE);
        session.values.insert(COUNTER_KEY, COUNTER_SEED);
        if let Some(max_age) = self.max_age_override {
            session.options.max_age = max_age;
        }

        self.manager.save(&session).await
    }
}

// Reads the demonstration values back and bumps the counter.
pub struct SessionCounterUseCase<'a, C, S> {
    pub manager: &'a SessionManager<C, S>,
}

impl<C, S> SessionCounterUseCase<'_, C, S>
where
    C: Clock,
    S: SessionStore,
{
    pub async fn execute(
        &self,
        name: &str,
        session_id: Option<&str>,
    ) -> Result<SavedSession, GuestbookError> {
        let mut session = self.manager.get(name, session_id).await;

        let counter_key = SessionKey::Int(COUNTER_KEY);
        debug!(
            foo = ?session.values.get(&SessionKey::from(GREETING_KEY)),
            counter = ?session.values.get(&counter_key),
            "session values"
        );

        session.options.max_age = 0;
        match session.values.get(&counter_key) {
            Some(SessionValue::Int(count)) => {
                let next = count.saturating_add(1);
                session.values.insert(COUNTER_KEY, next);
            }
            Some(other) => warn!(value = ?other, "session counter is not an integer; leaving it"),
            None => {}
        }

        self.manager.save(&session).await
    }
}
