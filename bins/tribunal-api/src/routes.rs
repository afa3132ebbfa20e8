use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::{handlers, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/problems", get(handlers::list_problems))
        .route("/problems/:id", get(handlers::get_problem))
        .route("/submit/:id", post(handlers::submit))
        .route("/status", get(handlers::health_check))
}
