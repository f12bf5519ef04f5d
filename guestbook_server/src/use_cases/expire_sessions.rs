use crate::domain::errors::GuestbookError;
use crate::domain::ports::{Clock, SessionStore};

// Maintenance sweep that drops sessions past their expiry.
pub struct ExpireSessionsUseCase<C, S> {
    pub clock: C,
    pub store: S,
    pub namespace: String,
}

impl<C, S> ExpireSessionsUseCase<C, S>
where
    C: Clock,
    S: SessionStore,
{
    pub async fn execute(&self) -> Result<u64, GuestbookError> {
        let now = self.clock.now_epoch_millis();
        self.store
            .remove_expired(&self.namespace, now)
            .await
            .map_err(GuestbookError::SessionStorage)
    }
}
