use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
}

/// Process liveness only. Never touches the review store.
pub async fn health_handler() -> Json<Health> {
    Json(Health { status: "ok" })
}
