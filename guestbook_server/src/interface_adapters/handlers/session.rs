use crate::domain::errors::GuestbookError;
use crate::interface_adapters::headers::{cookie_value, session_cookie};
use crate::interface_adapters::state::{AppState, SessionSaveFailurePolicy};
use crate::use_cases::session_demo::{SessionCounterUseCase, SessionDemoUseCase};
use crate::use_cases::sessions::SavedSession;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

// Cookie and session name used by both demonstration routes.
pub const SESSION_NAME: &str = "session-name";

// Handler that writes the demonstration values into the session.
#[tracing::instrument(name = "session_demo", skip_all)]
pub async fn session_demo(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let session_id = cookie_value(&headers, SESSION_NAME);
    let use_case = SessionDemoUseCase {
        manager: &state.sessions,
        max_age_override: state.session_demo.max_age_override,
    };

    let result = use_case
        .execute(SESSION_NAME, session_id.as_deref())
        .await;

    session_response(result, state.session_demo.save_failure)
}

// Handler that logs the demonstration values and bumps the counter.
#[tracing::instrument(name = "session_counter", skip_all)]
pub async fn session_counter(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let session_id = cookie_value(&headers, SESSION_NAME);
    let use_case = SessionCounterUseCase {
        manager: &state.sessions,
    };

    let result = use_case
        .execute(SESSION_NAME, session_id.as_deref())
        .await;

    session_response(result, state.session_demo.save_failure)
}

fn session_response(
    result: Result<SavedSession, GuestbookError>,
    policy: SessionSaveFailurePolicy,
) -> Response {
    match result {
        Ok(saved) => (StatusCode::OK, [(SET_COOKIE, session_cookie(&saved))]).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "session save failed");
            match policy {
                SessionSaveFailurePolicy::Log => StatusCode::OK.into_response(),
                SessionSaveFailurePolicy::Fail => {
                    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
                }
            }
        }
    }
}
