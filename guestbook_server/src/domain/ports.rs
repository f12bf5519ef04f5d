use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::entities::{Greeting, GuestbookKey, StoredSession, User};
use crate::domain::errors::IdentityError;

// Port for greeting persistence used by guestbook use cases.
#[async_trait]
pub trait GreetingStore: Send + Sync {
    async fn put(&self, parent: &GuestbookKey, id: String, greeting: Greeting)
    -> Result<(), String>;
    // Newest first, at most `limit` records.
    async fn latest(&self, parent: &GuestbookKey, limit: usize) -> Result<Vec<Greeting>, String>;
}

// Port for server-side session storage.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, namespace: &str, id: &str) -> Result<Option<StoredSession>, String>;
    async fn upsert(&self, namespace: &str, session: StoredSession) -> Result<(), String>;
    async fn remove(&self, namespace: &str, id: &str) -> Result<bool, String>;
    // Removes sessions whose expiry is at or before `now_millis`.
    async fn remove_expired(&self, namespace: &str, now_millis: u64) -> Result<u64, String>;
}

// Port for resolving the caller of the current request.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_user(&self, bearer_token: Option<&str>)
    -> Result<Option<User>, IdentityError>;
}

// Port for retrieving the current time.
pub trait Clock: Send + Sync {
    fn now_epoch_millis(&self) -> u64;
}

// Shared adapters live behind `Arc<dyn Port>` in the app state.

#[async_trait]
impl<T> GreetingStore for Arc<T>
where
    T: GreetingStore + ?Sized,
{
    async fn put(
        &self,
        parent: &GuestbookKey,
        id: String,
        greeting: Greeting,
    ) -> Result<(), String> {
        (**self).put(parent, id, greeting).await
    }

    async fn latest(&self, parent: &GuestbookKey, limit: usize) -> Result<Vec<Greeting>, String> {
        (**self).latest(parent, limit).await
    }
}

#[async_trait]
impl<T> SessionStore for Arc<T>
where
    T: SessionStore + ?Sized,
{
    async fn load(&self, namespace: &str, id: &str) -> Result<Option<StoredSession>, String> {
        (**self).load(namespace, id).await
    }

    async fn upsert(&self, namespace: &str, session: StoredSession) -> Result<(), String> {
        (**self).upsert(namespace, session).await
    }

    async fn remove(&self, namespace: &str, id: &str) -> Result<bool, String> {
        (**self).remove(namespace, id).await
    }

    async fn remove_expired(&self, namespace: &str, now_millis: u64) -> Result<u64, String> {
        (**self).remove_expired(namespace, now_millis).await
    }
}

#[async_trait]
impl<T> IdentityProvider for Arc<T>
where
    T: IdentityProvider + ?Sized,
{
    async fn current_user(
        &self,
        bearer_token: Option<&str>,
    ) -> Result<Option<User>, IdentityError> {
        (**self).current_user(bearer_token).await
    }
}

impl<T> Clock for Arc<T>
where
    T: Clock + ?Sized,
{
    fn now_epoch_millis(&self) -> u64 {
        (**self).now_epoch_millis()
    }
}
