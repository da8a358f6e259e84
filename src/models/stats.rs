use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::review::Review;

pub const RECENT_REVIEWS_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagSummary {
    pub tag: String,
    pub count: usize,
    pub avg_stars: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub count: usize,
    pub average_stars: f64,
    pub by_tag: BTreeMap<String, usize>,
    pub top_tags: Vec<TagSummary>,
    pub recent_reviews: Vec<Review>,
}

impl ReviewStats {
    /// Aggregates a set of reviews. The result only depends on which reviews
    /// are present, never on the order they are given in.
    pub fn from_reviews(reviews: &[Review]) -> Self {
        let mut totals: BTreeMap<&str, (usize, u64)> = BTreeMap::new();
        let mut star_sum: u64 = 0;

        for review in reviews {
            let entry = totals.entry(review.tag.as_str()).or_default();
            entry.0 += 1;
            entry.1 += u64::from(review.stars);
            star_sum += u64::from(review.stars);
        }

        let count = reviews.len();
        let average_stars = if count == 0 {
            0.0
        } else {
            round_to(star_sum as f64 / count as f64, 2)
        };

        let by_tag = totals
            .iter()
            .map(|(tag, (n, _))| (tag.to_string(), *n))
            .collect();

        let mut top_tags: Vec<TagSummary> = totals
            .iter()
            .map(|(tag, (n, stars))| TagSummary {
                tag: tag.to_string(),
                count: *n,
                avg_stars: round_to(*stars as f64 / *n as f64, 1),
            })
            .collect();
        // BTreeMap iteration already orders ties by tag
        top_tags.sort_by(|a, b| b.count.cmp(&a.count));

        let mut recent_reviews = reviews.to_vec();
        recent_reviews.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(a.id.cmp(&b.id)));
        recent_reviews.truncate(RECENT_REVIEWS_LIMIT);

        Self {
            count,
            average_stars,
            by_tag,
            top_tags,
            recent_reviews,
        }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
