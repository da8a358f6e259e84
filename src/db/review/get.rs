use uuid::Uuid;

use crate::{
    db::ReviewStore,
    errors::AppError,
    models::{Review, ReviewStats},
};

pub async fn get_review(id: Uuid, store: &dyn ReviewStore) -> Result<Review, AppError> {
    store
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Review with ID {id} not found")))
}

/// Reads back every stored review and summarizes them.
pub async fn aggregate(store: &dyn ReviewStore) -> Result<ReviewStats, AppError> {
    let reviews = store.list_all().await?;
    Ok(ReviewStats::from_reviews(&reviews))
}
