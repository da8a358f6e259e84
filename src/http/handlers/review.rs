use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    db::review::{aggregate, create_review, get_review},
    errors::{AppError, ErrorBody, ErrorResponse},
    models::{Review, ReviewStats},
    state::AppState,
};

pub async fn create_review_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Review>), ErrorResponse> {
    let Json(body) = payload.map_err(|rejection| {
        tracing::warn!("Unreadable review body: {}", rejection.body_text());
        (
            rejection.status(),
            Json(ErrorBody::message(rejection.body_text())),
        )
    })?;

    let review = state.rules.validate(&body).map_err(|e| {
        tracing::warn!("Rejected review: {}", e);
        AppError::from(e).to_response()
    })?;

    let review = create_review(review, state.store.as_ref())
        .await
        .map_err(|e| {
            tracing::error!("Error storing review: {}", e);
            e.to_response()
        })?;

    tracing::info!("Stored review {} ({})", review.id, review.storage_key());
    Ok((StatusCode::CREATED, Json(review)))
}

pub async fn get_review_handler(
    Path(review_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<Review>, ErrorResponse> {
    let review = get_review(review_id, state.store.as_ref())
        .await
        .map_err(|e| {
            tracing::error!("Error retrieving review {}: {}", review_id, e);
            e.to_response()
        })?;

    Ok(Json(review))
}

pub async fn get_top_handler(
    State(state): State<AppState>,
) -> Result<Json<ReviewStats>, ErrorResponse> {
    let stats = aggregate(state.store.as_ref()).await.map_err(|e| {
        tracing::error!("Error aggregating reviews: {}", e);
        e.to_response()
    })?;

    tracing::info!(
        "Aggregated {} reviews across {} tags",
        stats.count,
        stats.by_tag.len()
    );
    Ok(Json(stats))
}
