pub mod guestbook;
pub mod session;
pub mod tasks;

use crate::domain::errors::GuestbookError;
use axum::http::StatusCode;

// Surfaces a collaborator failure as 500 with the raw error text.
pub(crate) fn internal_error(err: GuestbookError) -> (StatusCode, String) {
    tracing::error!(error = %err, "request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}
