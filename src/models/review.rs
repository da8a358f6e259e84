use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use uuid::Uuid;

pub const REVIEW_PREFIX: &str = "reviews/";
pub const MIN_STARS: u8 = 1;
pub const MAX_STARS: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub title: String,
    pub tag: String,
    #[serde(deserialize_with = "stars_in_range")]
    pub stars: u8,
    // older objects store a missing comment as null
    #[serde(default, deserialize_with = "null_as_empty")]
    pub comment: String,
    pub timestamp: DateTime<Utc>,
}

impl Review {
    /// Object key the review is stored under.
    pub fn storage_key(&self) -> String {
        Self::key_for(self.id)
    }

    pub fn key_for(id: Uuid) -> String {
        format!("{REVIEW_PREFIX}{id}.json")
    }

    /// Same review under a newly generated id. Used when a key is already taken.
    pub fn with_fresh_id(self) -> Self {
        Self {
            id: Uuid::new_v4(),
            ..self
        }
    }
}

fn stars_in_range<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let stars = u8::deserialize(deserializer)?;
    if (MIN_STARS..=MAX_STARS).contains(&stars) {
        Ok(stars)
    } else {
        Err(D::Error::custom(format!(
            "stars {stars} outside {MIN_STARS}..={MAX_STARS}"
        )))
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
