use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/weeks", get(handlers::list_weeks))
        .route("/api/weeks/:week/overview", get(handlers::get_overview))
        .route("/api/session", get(handlers::get_session))
        .route("/api/session/week", post(handlers::select_week))
        .route("/api/session/edit", post(handlers::edit))
        .route("/api/session/finalize", post(handlers::finalize))
        .route("/api/session/close", post(handlers::close))
        .with_state(state)
}
