use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use recommendations_wall::{
    db::{
        MemoryReviewStore, ReviewStore, StorageError,
        review::{aggregate, create_review, get_review},
    },
    errors::AppError,
    models::Review,
};
use uuid::Uuid;

fn sample(tag: &str, stars: u8) -> Review {
    Review {
        id: Uuid::new_v4(),
        title: "Sample".into(),
        tag: tag.into(),
        stars,
        comment: "Nice".into(),
        timestamp: Utc::now(),
    }
}

/// Reports the first `collisions` writes as taken keys.
struct CollidingStore {
    inner: MemoryReviewStore,
    collisions: AtomicUsize,
}

#[async_trait]
impl ReviewStore for CollidingStore {
    async fn put(&self, review: &Review) -> Result<(), StorageError> {
        if self.collisions.load(Ordering::SeqCst) > 0 {
            self.collisions.fetch_sub(1, Ordering::SeqCst);
            return Err(StorageError::AlreadyExists(review.storage_key()));
        }
        self.inner.put(review).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<Review>, StorageError> {
        self.inner.get(id).await
    }

    async fn list_all(&self) -> Result<Vec<Review>, StorageError> {
        self.inner.list_all().await
    }
}

#[tokio::test]
async fn test_memory_store_never_overwrites() {
    let store = MemoryReviewStore::new();
    let review = sample("Movie", 4);

    store.put(&review).await.unwrap();
    let again = store.put(&review).await;

    assert!(matches!(again, Err(StorageError::AlreadyExists(key)) if key == review.storage_key()));
    assert_eq!(store.object_count().await, 1);
}

#[tokio::test]
async fn test_objects_are_keyed_by_id() {
    let review = sample("Book", 2);
    assert_eq!(review.storage_key(), format!("reviews/{}.json", review.id));
}

#[tokio::test]
async fn test_list_skips_unreadable_objects() {
    let store = MemoryReviewStore::new();
    store.put(&sample("Game", 5)).await.unwrap();
    store.insert_raw("reviews/broken.json", "{not json").await;
    store.insert_raw("other/ignored.json", "{}").await;

    let reviews = store.list_all().await.unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].tag, "Game");
}

#[tokio::test]
async fn test_create_review_retries_taken_key() {
    let store = CollidingStore {
        inner: MemoryReviewStore::new(),
        collisions: AtomicUsize::new(1),
    };
    let review = sample("Movie", 5);
    let original_id = review.id;

    let stored = create_review(review, &store).await.unwrap();

    assert_ne!(stored.id, original_id);
    assert_eq!(store.inner.object_count().await, 1);
    assert_eq!(store.inner.get(stored.id).await.unwrap(), Some(stored));
}

#[tokio::test]
async fn test_create_review_gives_up_after_repeated_collisions() {
    let store = CollidingStore {
        inner: MemoryReviewStore::new(),
        collisions: AtomicUsize::new(10),
    };

    let result = create_review(sample("Movie", 5), &store).await;

    assert!(matches!(
        result,
        Err(AppError::Storage(StorageError::AlreadyExists(_)))
    ));
    assert_eq!(store.inner.object_count().await, 0);
}

#[tokio::test]
async fn test_get_review_not_found() {
    let store = MemoryReviewStore::new();
    let result = get_review(Uuid::new_v4(), &store).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_aggregate_reads_whole_store() {
    let store = MemoryReviewStore::new();
    for (tag, stars) in [("Movie", 5), ("Movie", 3), ("Book", 4)] {
        store.put(&sample(tag, stars)).await.unwrap();
    }

    let stats = aggregate(&store).await.unwrap();
    assert_eq!(stats.count, 3);
    assert_eq!(stats.average_stars, 4.0);
    assert_eq!(stats.by_tag["Movie"], 2);
    assert_eq!(stats.by_tag["Book"], 1);
}

#[tokio::test]
async fn test_list_skips_out_of_range_stars() {
    let store = MemoryReviewStore::new();
    for (name, stars) in [("high", 200), ("zero", 0)] {
        let body = format!(
            r#"{{"id":"{}","title":"{name}","tag":"Movie","stars":{stars},"comment":"x","timestamp":"2025-11-11T14:30:00Z"}}"#,
            Uuid::new_v4()
        );
        store.insert_raw(format!("reviews/{name}.json"), body).await;
    }
    store.put(&sample("Movie", 1)).await.unwrap();

    let reviews = store.list_all().await.unwrap();
    assert_eq!(reviews.len(), 1);
    assert!(reviews.iter().all(|r| (1..=5).contains(&r.stars)));

    let stats = aggregate(&store).await.unwrap();
    assert_eq!(stats.count, 1);
    assert_eq!(stats.average_stars, 1.0);
}

#[tokio::test]
async fn test_reads_objects_with_null_comment() {
    let store = MemoryReviewStore::new();
    let id = Uuid::new_v4();
    let body = format!(
        r#"{{"id":"{id}","title":"The Matrix","tag":"Movie","stars":5,"comment":null,"timestamp":"2025-11-11T14:30:00.123456Z"}}"#
    );
    store.insert_raw(format!("reviews/{id}.json"), body).await;

    let review = store.get(id).await.unwrap().unwrap();
    assert_eq!(review.comment, "");
    assert_eq!(review.stars, 5);
    assert_eq!(store.list_all().await.unwrap().len(), 1);
}
