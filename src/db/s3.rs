//! Review storage on an S3-compatible bucket (Cloudflare R2 in production).

use async_trait::async_trait;
use aws_sdk_s3::{
    Client,
    config::{Credentials, Region, http::HttpResponse},
    error::{DisplayErrorContext, SdkError},
    primitives::ByteStream,
};
use futures::{StreamExt, stream};
use uuid::Uuid;

use crate::{
    config::StorageConfig,
    db::{ReviewStore, StorageError},
    models::{Review, review::REVIEW_PREFIX},
};

/// Concurrent object downloads while listing.
const FETCH_CONCURRENCY: usize = 8;

#[derive(Debug, Clone)]
pub struct S3ReviewStore {
    client: Client,
    bucket: String,
}

impl S3ReviewStore {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Builds a client from the storage settings. Explicit keys take
    /// precedence; without them the default AWS credential chain is used.
    pub async fn from_config(config: &StorageConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        if let (Some(access_key), Some(secret_key)) =
            (&config.access_key_id, &config.secret_access_key)
        {
            loader = loader.credentials_provider(Credentials::new(
                access_key,
                secret_key,
                None,
                None,
                "recommendations-wall-env",
            ));
        }

        let sdk_config = loader.load().await;
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build();

        tracing::info!(
            "Using bucket {} at {}",
            config.bucket,
            config.endpoint_url.as_deref().unwrap_or("default AWS endpoint")
        );

        Self::new(Client::from_conf(s3_config), config.bucket.clone())
    }

    /// Downloads and decodes one object. `None` when the key does not exist.
    async fn fetch(&self, key: &str) -> Result<Option<Review>, StorageError> {
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(err) => {
                if err.as_service_error().is_some_and(|e| e.is_no_such_key()) {
                    return Ok(None);
                }
                return Err(StorageError::Get {
                    key: key.to_string(),
                    reason: DisplayErrorContext(&err).to_string(),
                });
            }
        };

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Get {
                key: key.to_string(),
                reason: e.to_string(),
            })?
            .into_bytes();

        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|e| StorageError::Get {
                key: key.to_string(),
                reason: e.to_string(),
            })
    }

    async fn list_keys(&self) -> Result<Vec<String>, StorageError> {
        let mut keys = Vec::new();
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(REVIEW_PREFIX)
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| StorageError::List(DisplayErrorContext(&e).to_string()))?;
            keys.extend(
                page.contents()
                    .iter()
                    .filter_map(|object| object.key())
                    .filter(|key| key.ends_with(".json"))
                    .map(str::to_string),
            );
        }

        Ok(keys)
    }
}

fn is_precondition_failed<E>(err: &SdkError<E, HttpResponse>) -> bool {
    err.raw_response()
        .is_some_and(|response| response.status().as_u16() == 412)
}

#[async_trait]
impl ReviewStore for S3ReviewStore {
    async fn put(&self, review: &Review) -> Result<(), StorageError> {
        let key = review.storage_key();
        let body = serde_json::to_vec(review)?;

        let result = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type("application/json")
            .if_none_match("*")
            .body(ByteStream::from(body))
            .send()
            .await;

        match result {
            Ok(_) => {
                tracing::debug!("Stored {key}");
                Ok(())
            }
            Err(err) if is_precondition_failed(&err) => Err(StorageError::AlreadyExists(key)),
            Err(err) => Err(StorageError::Put {
                key,
                reason: DisplayErrorContext(&err).to_string(),
            }),
        }
    }

    async fn get(&self, id: Uuid) -> Result<Option<Review>, StorageError> {
        self.fetch(&Review::key_for(id)).await
    }

    async fn list_all(&self) -> Result<Vec<Review>, StorageError> {
        let keys = self.list_keys().await?;
        let total = keys.len();

        let reviews: Vec<Review> = stream::iter(keys)
            .map(|key| async move {
                let result = self.fetch(&key).await;
                (key, result)
            })
            .buffer_unordered(FETCH_CONCURRENCY)
            .filter_map(|(key, result)| async move {
                match result {
                    Ok(review) => review,
                    Err(e) => {
                        tracing::warn!("Skipping {key}: {e}");
                        None
                    }
                }
            })
            .collect()
            .await;

        tracing::debug!("Loaded {} of {} review objects", reviews.len(), total);
        Ok(reviews)
    }
}
