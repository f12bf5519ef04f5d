use crate::domain::errors::GuestbookError;
use crate::interface_adapters::handlers::internal_error;
use crate::interface_adapters::headers::bearer_token;
use crate::interface_adapters::protocol::SignForm;
use crate::interface_adapters::state::AppState;
use crate::interface_adapters::view::{GuestbookView, render_guestbook};
use crate::use_cases::list_greetings::{GREETINGS_PAGE_SIZE, ListGreetingsUseCase};
use crate::use_cases::sign_guestbook::{SignGuestbookUseCase, SignRequest};
use axum::{
    Form,
    extract::State,
    http::{HeaderMap, HeaderName, StatusCode, header::LOCATION},
    response::Html,
};
use std::sync::Arc;

// Handler for the guestbook page.
#[tracing::instrument(name = "list_greetings", skip_all)]
pub async fn list_greetings(
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, (StatusCode, String)> {
    let use_case = ListGreetingsUseCase {
        store: state.greetings.clone(),
        guestbook: state.guestbook.clone(),
        limit: GREETINGS_PAGE_SIZE,
    };

    let greetings = use_case.execute().await.map_err(internal_error)?;

    let view = GuestbookView::from_greetings(&greetings);
    let html = render_guestbook(&view)
        .map_err(|err| internal_error(GuestbookError::Render(err.to_string())))?;

    Ok(Html(html))
}

// Handler for signing the guestbook; redirects back to the page.
#[tracing::instrument(name = "sign_guestbook", skip_all)]
pub async fn sign_guestbook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<SignForm>,
) -> Result<(StatusCode, [(HeaderName, &'static str); 1]), (StatusCode, String)> {
    let use_case = SignGuestbookUseCase {
        clock: state.clock.clone(),
        store: state.greetings.clone(),
        identity: state.identity.clone(),
        guestbook: state.guestbook.clone(),
    };

    let result = use_case
        .execute(SignRequest {
            content: form.content,
            bearer_token: bearer_token(&headers),
        })
        .await
        .map_err(internal_error)?;

    tracing::info!(
        greeting_id = %result.id,
        anonymous = result.greeting.author.is_empty(),
        "guestbook signed"
    );

    Ok((StatusCode::FOUND, [(LOCATION, "/")]))
}
