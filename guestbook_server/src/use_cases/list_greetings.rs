use crate::domain::entities::{Greeting, GuestbookKey};
use crate::domain::errors::GuestbookError;
use crate::domain::ports::GreetingStore;

// Number of greetings shown on the guestbook page.
pub const GREETINGS_PAGE_SIZE: usize = 10;

// Guestbook listing use case with injected dependencies.
pub struct ListGreetingsUseCase<G> {
    pub store: G,
    pub guestbook: GuestbookKey,
    pub limit: usize,
}

impl<G> ListGreetingsUseCase<G>
where
    G: GreetingStore,
{
    pub async fn execute(&self) -> Result<Vec<Greeting>, GuestbookError> {
        let mut greetings = self
            .store
            .latest(&self.guestbook, self.limit)
            .await
            .map_err(GuestbookError::Storage)?;

        // Adapters promise newest-first; the cap is enforced here regardless.
        greetings.truncate(self.limit);
        Ok(greetings)
    }
}
