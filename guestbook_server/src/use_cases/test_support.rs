use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::entities::{Greeting, GuestbookKey, StoredSession, User};
use crate::domain::errors::IdentityError;
use crate::domain::ports::{Clock, GreetingStore, IdentityProvider, SessionStore};

pub(crate) type GreetingTable = Arc<Mutex<Vec<(GuestbookKey, String, Greeting)>>>;
pub(crate) type SessionTable = Arc<Mutex<HashMap<(String, String), StoredSession>>>;

// Shared time source for deterministic tests; clones observe `set`.
#[derive(Clone)]
pub(crate) struct FixedClock(Arc<AtomicU64>);

impl FixedClock {
    pub(crate) fn at(now_millis: u64) -> Self {
        Self(Arc::new(AtomicU64::new(now_millis)))
    }

    pub(crate) fn set(&self, now_millis: u64) {
        self.0.store(now_millis, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_epoch_millis(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Copy, Default)]
pub(crate) struct FailureFlags {
    pub put: bool,
    pub query: bool,
    pub load: bool,
    pub save: bool,
    pub sweep: bool,
}

#[derive(Clone)]
pub(crate) struct RecordingGreetingStore {
    greetings: GreetingTable,
    failures: FailureFlags,
}

impl RecordingGreetingStore {
    pub(crate) fn new() -> Self {
        Self {
            greetings: Arc::new(Mutex::new(Vec::new())),
            failures: FailureFlags::default(),
        }
    }

    pub(crate) fn with_failures(mut self, failures: FailureFlags) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn stored(&self) -> Vec<(GuestbookKey, String, Greeting)> {
        let guard = self.greetings.lock().expect("greetings mutex poisoned");
        guard.clone()
    }
}

#[async_trait]
impl GreetingStore for RecordingGreetingStore {
    async fn put(
        &self,
        parent: &GuestbookKey,
        id: String,
        greeting: Greeting,
    ) -> Result<(), String> {
        if self.failures.put {
            return Err("datastore: put failed".to_string());
        }

        let mut guard = self.greetings.lock().expect("greetings mutex poisoned");
        guard.push((parent.clone(), id, greeting));
        Ok(())
    }

    async fn latest(&self, parent: &GuestbookKey, limit: usize) -> Result<Vec<Greeting>, String> {
        if self.failures.query {
            return Err("datastore: query failed".to_string());
        }

        let guard = self.greetings.lock().expect("greetings mutex poisoned");
        let mut greetings: Vec<Greeting> = guard
            .iter()
            .filter(|(key, _, _)| key == parent)
            .map(|(_, _, greeting)| greeting.clone())
            .collect();
        greetings.sort_by(|a, b| b.date.cmp(&a.date));
        greetings.truncate(limit);
        Ok(greetings)
    }
}

#[derive(Clone)]
pub(crate) struct RecordingSessionStore {
    sessions: SessionTable,
    failures: FailureFlags,
}

impl RecordingSessionStore {
    pub(crate) fn new() -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            failures: FailureFlags::default(),
        }
    }

    pub(crate) fn with_failures(mut self, failures: FailureFlags) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn insert_test_session(&self, namespace: &str, session: StoredSession) {
        let mut guard = self.sessions.lock().expect("sessions mutex poisoned");
        guard.insert((namespace.to_string(), session.id.clone()), session);
    }

    pub(crate) fn get_test_session(&self, namespace: &str, id: &str) -> Option<StoredSession> {
        let guard = self.sessions.lock().expect("sessions mutex poisoned");
        guard
            .get(&(namespace.to_string(), id.to_string()))
            .cloned()
    }

    pub(crate) fn len(&self) -> usize {
        let guard = self.sessions.lock().expect("sessions mutex poisoned");
        guard.len()
    }
}

#[async_trait]
impl SessionStore for RecordingSessionStore {
    async fn load(&self, namespace: &str, id: &str) -> Result<Option<StoredSession>, String> {
        if self.failures.load {
            return Err("session store: load failed".to_string());
        }

        Ok(self.get_test_session(namespace, id))
    }

    async fn upsert(&self, namespace: &str, session: StoredSession) -> Result<(), String> {
        if self.failures.save {
            return Err("session store: save failed".to_string());
        }

        self.insert_test_session(namespace, session);
        Ok(())
    }

    async fn remove(&self, namespace: &str, id: &str) -> Result<bool, String> {
        if self.failures.save {
            return Err("session store: remove failed".to_string());
        }

        let mut guard = self.sessions.lock().expect("sessions mutex poisoned");
        Ok(guard
            .remove(&(namespace.to_string(), id.to_string()))
            .is_some())
    }

    async fn remove_expired(&self, namespace: &str, now_millis: u64) -> Result<u64, String> {
        if self.failures.sweep {
            return Err("session store: sweep failed".to_string());
        }

        let mut guard = self.sessions.lock().expect("sessions mutex poisoned");
        let before = guard.len();
        guard.retain(|(ns, _), session| ns != namespace || session.expires_at > now_millis);
        Ok((before - guard.len()) as u64)
    }
}

// Identity fake that resolves known bearer tokens.
#[derive(Clone, Default)]
pub(crate) struct TokenIdentity {
    users: HashMap<String, User>,
    fail: bool,
}

impl TokenIdentity {
    pub(crate) fn with_user(mut self, token: &str, display_name: &str) -> Self {
        let user = User {
            user_id: self.users.len() as u64 + 1,
            display_name: display_name.to_string(),
        };
        self.users.insert(token.to_string(), user);
        self
    }

    pub(crate) fn failing() -> Self {
        Self {
            users: HashMap::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl IdentityProvider for TokenIdentity {
    async fn current_user(
        &self,
        bearer_token: Option<&str>,
    ) -> Result<Option<User>, IdentityError> {
        if self.fail {
            return Err(IdentityError::Unavailable("connection refused".to_string()));
        }

        Ok(bearer_token.and_then(|token| self.users.get(token).cloned()))
    }
}
