use tracing::warn;
use uuid::Uuid;

use crate::domain::entities::{Greeting, GuestbookKey};
use crate::domain::errors::GuestbookError;
use crate::domain::ports::{Clock, GreetingStore, IdentityProvider};

// Sign request as seen by the use case.
pub struct SignRequest {
    pub content: String,
    pub bearer_token: Option<String>,
}

// Greeting persisted by the sign use case, with its generated child id.
pub struct SignResponse {
    pub id: String,
    pub greeting: Greeting,
}

// Guestbook signing use case with injected dependencies.
pub struct SignGuestbookUseCase<C, G, I> {
    pub clock: C,
    pub store: G,
    pub identity: I,
    pub guestbook: GuestbookKey,
}

impl<C, G, I> SignGuestbookUseCase<C, G, I>
where
    C: Clock,
    G: GreetingStore,
    I: IdentityProvider,
{
    pub async fn execute(&self, request: SignRequest) -> Result<SignResponse, GuestbookError> {
        let mut greeting = Greeting {
            author: String::new(),
            content: request.content,
            date: self.clock.now_epoch_millis(),
        };

        // Identity lookups never block a signature; failures sign anonymously.
        match self
            .identity
            .current_user(request.bearer_token.as_deref())
            .await
        {
            Ok(Some(user)) => greeting.author = user.to_string(),
            Ok(None) => {}
            Err(err) => warn!(error = %err, "identity lookup failed; signing anonymously"),
        }

        let id = Uuid::new_v4().to_string();
        self.store
            .put(&self.guestbook, id.clone(), greeting.clone())
            .await
            .map_err(GuestbookError::Storage)?;

        Ok(SignResponse { id, greeting })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{
        FailureFlags, FixedClock, RecordingGreetingStore, TokenIdentity,
    };

    fn use_case(
        store: RecordingGreetingStore,
        identity: TokenIdentity,
    ) -> SignGuestbookUseCase<FixedClock, RecordingGreetingStore, TokenIdentity> {
        SignGuestbookUseCase {
            clock: FixedClock::at(1_700_000_000_000),
            store,
            identity,
            guestbook: GuestbookKey::default(),
        }
    }

    #[tokio::test]
    async fn when_no_identity_is_present_then_greeting_is_stored_anonymously() {
        let store = RecordingGreetingStore::new();
        let use_case = use_case(store.clone(), TokenIdentity::default());

        let result = use_case
            .execute(SignRequest {
                content: "hello".to_string(),
                bearer_token: None,
            })
            .await
            .expect("expected sign to succeed");

        assert_eq!(result.greeting.author, "");
        assert_eq!(result.greeting.content, "hello");
        assert_eq!(result.greeting.date, 1_700_000_000_000);

        let stored = store.stored();
        assert_eq!(stored.len(), 1);
        let (parent, id, greeting) = &stored[0];
        assert_eq!(parent, &GuestbookKey::default());
        assert_eq!(id, &result.id);
        assert_eq!(greeting, &result.greeting);
    }

    #[tokio::test]
    async fn when_identity_resolves_alice_then_author_is_alice() {
        let store = RecordingGreetingStore::new();
        let use_case = use_case(
            store.clone(),
            TokenIdentity::default().with_user("alice-token", "alice"),
        );

        let result = use_case
            .execute(SignRequest {
                content: "hi from alice".to_string(),
                bearer_token: Some("alice-token".to_string()),
            })
            .await
            .expect("expected sign to succeed");

        assert_eq!(result.greeting.author, "alice");
        assert_eq!(store.stored()[0].2.author, "alice");
    }

    #[tokio::test]
    async fn when_token_is_unknown_then_greeting_is_anonymous() {
        let use_case = use_case(
            RecordingGreetingStore::new(),
            TokenIdentity::default().with_user("alice-token", "alice"),
        );

        let result = use_case
            .execute(SignRequest {
                content: "who am i".to_string(),
                bearer_token: Some("stranger".to_string()),
            })
            .await
            .expect("expected sign to succeed");

        assert_eq!(result.greeting.author, "");
    }

    #[tokio::test]
    async fn when_identity_lookup_fails_then_greeting_is_still_stored_anonymously() {
        let store = RecordingGreetingStore::new();
        let use_case = use_case(store.clone(), TokenIdentity::failing());

        let result = use_case
            .execute(SignRequest {
                content: "still here".to_string(),
                bearer_token: Some("alice-token".to_string()),
            })
            .await
            .expect("expected sign to succeed");

        assert_eq!(result.greeting.author, "");
        assert_eq!(store.stored().len(), 1);
    }

    #[tokio::test]
    async fn when_content_is_empty_then_greeting_is_stored_with_empty_content() {
        let store = RecordingGreetingStore::new();
        let use_case = use_case(store.clone(), TokenIdentity::default());

        use_case
            .execute(SignRequest {
                content: String::new(),
                bearer_token: None,
            })
            .await
            .expect("expected sign to succeed");

        assert_eq!(store.stored()[0].2.content, "");
    }

    #[tokio::test]
    async fn when_store_put_fails_then_returns_storage_error() {
        let use_case = use_case(
            RecordingGreetingStore::new().with_failures(FailureFlags {
                put: true,
                ..Default::default()
            }),
            TokenIdentity::default(),
        );

        let result = use_case
            .execute(SignRequest {
                content: "hello".to_string(),
                bearer_token: None,
            })
            .await;

        assert!(matches!(result, Err(GuestbookError::Storage(_))));
    }
}
