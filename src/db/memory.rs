use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    db::{ReviewStore, StorageError},
    models::{Review, review::REVIEW_PREFIX},
};

/// In-process bucket. Holds the same serialized objects the S3 store would,
/// keyed the same way.
#[derive(Debug, Clone, Default)]
pub struct MemoryReviewStore {
    objects: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores raw bytes under `key`, bypassing serialization.
    pub async fn insert_raw(&self, key: impl Into<String>, body: impl Into<Vec<u8>>) {
        self.objects.write().await.insert(key.into(), body.into());
    }

    pub async fn object_count(&self) -> usize {
        self.objects.read().await.len()
    }
}

#[async_trait]
impl ReviewStore for MemoryReviewStore {
    async fn put(&self, review: &Review) -> Result<(), StorageError> {
        let key = review.storage_key();
        let body = serde_json::to_vec(review)?;

        let mut objects = self.objects.write().await;
        if objects.contains_key(&key) {
            return Err(StorageError::AlreadyExists(key));
        }
        objects.insert(key, body);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Review>, StorageError> {
        let key = Review::key_for(id);
        let objects = self.objects.read().await;
        match objects.get(&key) {
            None => Ok(None),
            Some(body) => serde_json::from_slice(body)
                .map(Some)
                .map_err(|e| StorageError::Get {
                    key,
                    reason: e.to_string(),
                }),
        }
    }

    async fn list_all(&self) -> Result<Vec<Review>, StorageError> {
        let objects = self.objects.read().await;
        let mut reviews = Vec::with_capacity(objects.len());

        for (key, body) in objects.iter() {
            if !key.starts_with(REVIEW_PREFIX) {
                continue;
            }
            match serde_json::from_slice::<Review>(body) {
                Ok(review) => reviews.push(review),
                Err(e) => tracing::warn!("Skipping unreadable object {key}: {e}"),
            }
        }

        Ok(reviews)
    }
}
