use crate::handlers;
use crate::state::AppState;
use axum::{Router, routing::get};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/marcacion", get(handlers::daily_page))
        .route("/asistencia", get(handlers::monthly_page))
        .route("/api/marcacion", get(handlers::daily_search))
        .route("/api/asistencia", get(handlers::monthly_search))
        .with_state(state)
}
