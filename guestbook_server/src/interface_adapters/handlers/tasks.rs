use crate::interface_adapters::handlers::internal_error;
use crate::interface_adapters::state::AppState;
use crate::use_cases::expire_sessions::ExpireSessionsUseCase;
use axum::{extract::State, http::StatusCode};
use std::sync::Arc;

// Maintenance handler, normally hit by a scheduled task runner.
#[tracing::instrument(name = "remove_expired_sessions", skip_all)]
pub async fn remove_expired_sessions(
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, (StatusCode, String)> {
    let use_case = ExpireSessionsUseCase {
        clock: state.clock.clone(),
        store: state.session_store.clone(),
        namespace: state.sessions.settings.namespace.clone(),
    };

    let removed = use_case.execute().await.map_err(internal_error)?;
    tracing::info!(removed, "expired sessions removed");

    Ok(StatusCode::OK)
}
