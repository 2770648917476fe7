use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{health_check, welcome};

pub fn init_health_router() -> Router<AppState> {
    Router::new()
        .route("/", get(welcome))
        .route("/api/health", get(health_check))
}
