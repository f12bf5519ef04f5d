use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::entities::{Greeting, GuestbookKey, SessionValues, StoredSession};
use crate::domain::ports::{GreetingStore, SessionStore};

type GreetingRows = HashMap<GuestbookKey, Vec<(String, Greeting)>>;
type SessionRows = HashMap<(String, String), StoredSession>;

// In-memory greeting store used when no database is configured.
#[derive(Clone, Default)]
pub struct InMemoryGreetingStore {
    pub greetings: Arc<Mutex<GreetingRows>>,
}

#[async_trait]
impl GreetingStore for InMemoryGreetingStore {
    async fn put(
        &self,
        parent: &GuestbookKey,
        id: String,
        greeting: Greeting,
    ) -> Result<(), String> {
        let mut greetings = self.greetings.lock().await;
        greetings
            .entry(parent.clone())
            .or_default()
            .push((id, greeting));
        Ok(())
    }

    async fn latest(&self, parent: &GuestbookKey, limit: usize) -> Result<Vec<Greeting>, String> {
        let greetings = self.greetings.lock().await;
        let mut rows: Vec<Greeting> = greetings
            .get(parent)
            .map(|rows| rows.iter().map(|(_, greeting)| greeting.clone()).collect())
            .unwrap_or_default();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        rows.truncate(limit);
        Ok(rows)
    }
}

// In-memory session store used when no database is configured.
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    pub sessions: Arc<Mutex<SessionRows>>,
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, namespace: &str, id: &str) -> Result<Option<StoredSession>, String> {
        let sessions = self.sessions.lock().await;
        Ok(sessions
            .get(&(namespace.to_string(), id.to_string()))
            .cloned())
    }

    async fn upsert(&self, namespace: &str, session: StoredSession) -> Result<(), String> {
        let mut sessions = self.sessions.lock().await;
        sessions.insert((namespace.to_string(), session.id.clone()), session);
        Ok(())
    }

    async fn remove(&self, namespace: &str, id: &str) -> Result<bool, String> {
        let mut sessions = self.sessions.lock().await;
        Ok(sessions
            .remove(&(namespace.to_string(), id.to_string()))
            .is_some())
    }

    async fn remove_expired(&self, namespace: &str, now_millis: u64) -> Result<u64, String> {
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|(ns, _), session| ns != namespace || session.expires_at > now_millis);
        Ok((before - sessions.len()) as u64)
    }
}

// Epoch-millisecond column read back from PostgreSQL; negative values are corrupt rows.
fn stored_millis(column: &str, value: i64) -> Result<u64, String> {
    u64::try_from(value).map_err(|_| format!("{column}: invalid timestamp {value}"))
}

// PostgreSQL-backed greeting store.
#[derive(Clone)]
pub struct PostgresGreetingStore {
    pub db: PgPool,
}

#[async_trait]
impl GreetingStore for PostgresGreetingStore {
    async fn put(
        &self,
        parent: &GuestbookKey,
        id: String,
        greeting: Greeting,
    ) -> Result<(), String> {
        let date = i64::try_from(greeting.date).map_err(|err| err.to_string())?;

        sqlx::query(
            r#"
            INSERT INTO greetings (id, guestbook, author, content, date)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(id)
        .bind(parent.as_str())
        .bind(greeting.author)
        .bind(greeting.content)
        .bind(date)
        .execute(&self.db)
        .await
        .map_err(|err| err.to_string())?;

        Ok(())
    }

    async fn latest(&self, parent: &GuestbookKey, limit: usize) -> Result<Vec<Greeting>, String> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = sqlx::query_as::<_, (String, String, i64)>(
            r#"
            SELECT author, content, date
            FROM greetings
            WHERE guestbook = $1
            ORDER BY date DESC
            LIMIT $2
            "#,
        )
        .bind(parent.as_str())
        .bind(limit)
        .fetch_all(&self.db)
        .await
        .map_err(|err| err.to_string())?;

        rows.into_iter()
            .map(|(author, content, date)| -> Result<Greeting, String> {
                Ok(Greeting {
                    author,
                    content,
                    date: stored_millis("greetings.date", date)?,
                })
            })
            .collect()
    }
}

// PostgreSQL-backed session store. Values are kept as a JSON document.
#[derive(Clone)]
pub struct PostgresSessionStore {
    pub db: PgPool,
}

#[async_trait]
impl SessionStore for PostgresSessionStore {
    async fn load(&self, namespace: &str, id: &str) -> Result<Option<StoredSession>, String> {
        let row = sqlx::query_as::<_, (String, String, String, i64, i64)>(
            r#"
            SELECT id, name, data, max_age, expires_at
            FROM sessions
            WHERE namespace = $1 AND id = $2
            "#,
        )
        .bind(namespace)
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(|err| err.to_string())?;

        let Some((id, name, data, max_age, expires_at)) = row else {
            return Ok(None);
        };
        let values: SessionValues = serde_json::from_str(&data).map_err(|err| err.to_string())?;

        Ok(Some(StoredSession {
            id,
            name,
            values,
            max_age,
            expires_at: stored_millis("sessions.expires_at", expires_at)?,
        }))
    }

    async fn upsert(&self, namespace: &str, session: StoredSession) -> Result<(), String> {
        let data = serde_json::to_string(&session.values).map_err(|err| err.to_string())?;
        let expires_at = i64::try_from(session.expires_at).unwrap_or(i64::MAX);

        sqlx::query(
            r#"
            INSERT INTO sessions (namespace, id, name, data, max_age, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (namespace, id) DO UPDATE SET
                name = EXCLUDED.name,
                data = EXCLUDED.data,
                max_age = EXCLUDED.max_age,
                expires_at = EXCLUDED.expires_at
            "#,
        )
        .bind(namespace)
        .bind(session.id)
        .bind(session.name)
        .bind(data)
        .bind(session.max_age)
        .bind(expires_at)
        .execute(&self.db)
        .await
        .map_err(|err| err.to_string())?;

        Ok(())
    }

    async fn remove(&self, namespace: &str, id: &str) -> Result<bool, String> {
        let result = sqlx::query("DELETE FROM sessions WHERE namespace = $1 AND id = $2")
            .bind(namespace)
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(|err| err.to_string())?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove_expired(&self, namespace: &str, now_millis: u64) -> Result<u64, String> {
        let now = i64::try_from(now_millis).unwrap_or(i64::MAX);
        let result = sqlx::query("DELETE FROM sessions WHERE namespace = $1 AND expires_at <= $2")
            .bind(namespace)
            .bind(now)
            .execute(&self.db)
            .await
            .map_err(|err| err.to_string())?;

        Ok(result.rows_affected())
    }
}
