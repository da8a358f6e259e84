use axum::{
    Router,
    routing::{get, post},
};

use crate::{
    http::handlers::{
        create_review_handler, get_review_handler, get_top_handler, health_handler, home_handler,
    },
    state::AppState,
};

pub fn create_http_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/health", get(health_handler))
        .route("/reviews", post(create_review_handler))
        .route("/reviews/{id}", get(get_review_handler))
        .route("/top", get(get_top_handler))
        .with_state(state)
}
