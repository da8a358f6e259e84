use crate::{
    db::{ReviewStore, StorageError},
    errors::AppError,
    models::Review,
};

const MAX_PUT_ATTEMPTS: usize = 3;

/// Persists a validated review and returns it as stored. A taken key gets a
/// fresh id and another attempt.
pub async fn create_review(mut review: Review, store: &dyn ReviewStore) -> Result<Review, AppError> {
    let mut attempt = 1;
    loop {
        match store.put(&review).await {
            Ok(()) => return Ok(review),
            Err(StorageError::AlreadyExists(key)) if attempt < MAX_PUT_ATTEMPTS => {
                tracing::warn!("Key {key} already taken, retrying with a new id");
                review = review.with_fresh_id();
                attempt += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}
