use crate::interface_adapters::handlers::guestbook::{list_greetings, sign_guestbook};
use crate::interface_adapters::handlers::session::{session_counter, session_demo};
use crate::interface_adapters::handlers::tasks::remove_expired_sessions;
use crate::interface_adapters::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

pub fn app(state: Arc<AppState>) -> Router {
    // Wire the HTTP routes to their handlers.
    Router::new()
        .route("/", get(list_greetings))
        .route("/sign", post(sign_guestbook))
        .route("/session", get(session_demo).post(session_demo))
        .route("/session2", get(session_counter).post(session_counter))
        .route(
            "/tasks/removeExpiredSessions",
            get(remove_expired_sessions),
        )
        .with_state(state)
}
