pub mod review;
pub mod stats;

pub use review::Review;
pub use stats::{ReviewStats, TagSummary};
