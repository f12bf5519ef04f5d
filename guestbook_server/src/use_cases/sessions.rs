use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::entities::{Session, StoredSession};
use crate::domain::errors::GuestbookError;
use crate::domain::ports::{Clock, SessionStore};

// Server-side lifetime for sessions saved with max_age == 0.
pub const DEFAULT_NON_PERSISTENT_SESSION_SECS: u64 = 24 * 60 * 60;

// Max-age given to freshly created sessions (30 days).
pub const DEFAULT_SESSION_MAX_AGE_SECS: i64 = 30 * 24 * 60 * 60;

#[derive(Clone, Debug)]
pub struct SessionSettings {
    pub namespace: String,
    pub default_duration_secs: u64,
    pub default_max_age_secs: i64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            namespace: String::new(),
            default_duration_secs: DEFAULT_NON_PERSISTENT_SESSION_SECS,
            default_max_age_secs: DEFAULT_SESSION_MAX_AGE_SECS,
        }
    }
}

// Result of a save, enough for the adapter layer to write the cookie.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavedSession {
    pub name: String,
    pub id: String,
    pub max_age: i64,
}

// Service-scoped session client built once at startup.
pub struct SessionManager<C, S> {
    pub clock: C,
    pub store: S,
    pub settings: SessionSettings,
}

impl<C, S> SessionManager<C, S>
where
    C: Clock,
    S: SessionStore,
{
    // Returns the live session named `name` for `session_id`, or a fresh one.
    // Load failures are not fatal; the caller always gets a session.
    pub async fn get(&self, name: &str, session_id: Option<&str>) -> Session {
        if let Some(id) = session_id {
            match self.store.load(&self.settings.namespace, id).await {
                Ok(Some(stored)) => {
                    let now = self.clock.now_epoch_millis();
                    if stored.name == name && stored.expires_at > now {
                        return Session::from(stored);
                    }
                    debug!(session_name = name, "stored session is stale; starting a new one");
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(error = %err, session_name = name, "failed to load session; starting a new one")
                }
            }
        }

        let mut session = Session::new(Uuid::new_v4().to_string(), name);
        session.options.max_age = self.settings.default_max_age_secs;
        session
    }

    pub async fn save(&self, session: &Session) -> Result<SavedSession, GuestbookError> {
        let namespace = &self.settings.namespace;
        let max_age = session.options.max_age;

        if max_age < 0 {
            self.store
                .remove(namespace, &session.id)
                .await
                .map_err(GuestbookError::SessionStorage)?;
        } else {
            let lifetime_secs = if max_age > 0 {
                max_age.unsigned_abs()
            } else {
                self.settings.default_duration_secs
            };
            let expires_at = self
                .clock
                .now_epoch_millis()
                .saturating_add(lifetime_secs.saturating_mul(1_000));

            let stored = StoredSession {
                id: session.id.clone(),
                name: session.name.clone(),
                values: session.values.clone(),
                max_age,
                expires_at,
            };
            self.store
                .upsert(namespace, stored)
                .await
                .map_err(GuestbookError::SessionStorage)?;
        }

        Ok(SavedSession {
            name: session.name.clone(),
            id: session.id.clone(),
            max_age,
        })
    }
}
