use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// Logical parent name shared by every greeting in this service.
pub const DEFAULT_GUESTBOOK: &str = "default_guestbook";

// Parent key that scopes greeting records.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GuestbookKey(String);

impl GuestbookKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for GuestbookKey {
    fn default() -> Self {
        Self::new(DEFAULT_GUESTBOOK)
    }
}

// Guestbook entry. Author is empty when the signer was anonymous.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Greeting {
    pub author: String,
    pub content: String,
    // Milliseconds since the Unix epoch.
    pub date: u64,
}

// Authenticated caller resolved by the identity provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub user_id: u64,
    pub display_name: String,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name)
    }
}

// Session keys are either names or integers.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKey {
    Str(String),
    Int(i64),
}

impl From<&str> for SessionKey {
    fn from(value: &str) -> Self {
        SessionKey::Str(value.to_string())
    }
}

impl From<i64> for SessionKey {
    fn from(value: i64) -> Self {
        SessionKey::Int(value)
    }
}

// Typed session value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionValue {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl From<&str> for SessionValue {
    fn from(value: &str) -> Self {
        SessionValue::Str(value.to_string())
    }
}

impl From<String> for SessionValue {
    fn from(value: String) -> Self {
        SessionValue::Str(value)
    }
}

impl From<i64> for SessionValue {
    fn from(value: i64) -> Self {
        SessionValue::Int(value)
    }
}

impl From<bool> for SessionValue {
    fn from(value: bool) -> Self {
        SessionValue::Bool(value)
    }
}

// Wire shape for one session value; JSON maps only allow string keys.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionEntry {
    pub key: SessionKey,
    pub value: SessionValue,
}

// Key/value bag carried by a session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<SessionEntry>", into = "Vec<SessionEntry>")]
pub struct SessionValues(BTreeMap<SessionKey, SessionValue>);

impl SessionValues {
    pub fn get(&self, key: &SessionKey) -> Option<&SessionValue> {
        self.0.get(key)
    }

    pub fn insert(
        &mut self,
        key: impl Into<SessionKey>,
        value: impl Into<SessionValue>,
    ) -> Option<SessionValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<SessionEntry>> for SessionValues {
    fn from(entries: Vec<SessionEntry>) -> Self {
        Self(
            entries
                .into_iter()
                .map(|entry| (entry.key, entry.value))
                .collect(),
        )
    }
}

impl From<SessionValues> for Vec<SessionEntry> {
    fn from(values: SessionValues) -> Self {
        values
            .0
            .into_iter()
            .map(|(key, value)| SessionEntry { key, value })
            .collect()
    }
}

// Cookie and lifetime options for a session.
// max_age > 0 persists for that many seconds, 0 lasts for the browser
// session, and a negative value deletes the session on save.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionOptions {
    pub max_age: i64,
}

// Session handed to request handlers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub name: String,
    pub values: SessionValues,
    pub options: SessionOptions,
    pub is_new: bool,
}

impl Session {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            values: SessionValues::default(),
            options: SessionOptions::default(),
            is_new: true,
        }
    }
}

// Session record as persisted by a session store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredSession {
    pub id: String,
    pub name: String,
    pub values: SessionValues,
    pub max_age: i64,
    // Milliseconds since the Unix epoch.
    pub expires_at: u64,
}

impl From<StoredSession> for Session {
    fn from(stored: StoredSession) -> Self {
        Self {
            id: stored.id,
            name: stored.name,
            values: stored.values,
            options: SessionOptions {
                max_age: stored.max_age,
            },
            is_new: false,
        }
    }
}
