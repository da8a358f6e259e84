pub mod memory;
pub mod review;
pub mod s3;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::Review;

pub use memory::MemoryReviewStore;
pub use s3::S3ReviewStore;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to write {key}: {reason}")]
    Put { key: String, reason: String },

    #[error("Failed to read {key}: {reason}")]
    Get { key: String, reason: String },

    #[error("Failed to list reviews: {0}")]
    List(String),

    #[error("Object {0} already exists")]
    AlreadyExists(String),

    #[error("Failed to encode review: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Where reviews live. Each review is one object keyed by its id; there is no
/// update or delete.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Writes a new review. Must not replace an existing object; a taken key
    /// is reported as [`StorageError::AlreadyExists`].
    async fn put(&self, review: &Review) -> Result<(), StorageError>;

    async fn get(&self, id: Uuid) -> Result<Option<Review>, StorageError>;

    /// Every stored review, in no particular order.
    async fn list_all(&self) -> Result<Vec<Review>, StorageError>;
}
