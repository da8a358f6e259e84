pub mod health;
pub mod home;
pub mod review;

pub use health::health_handler;
pub use home::home_handler;
pub use review::{create_review_handler, get_review_handler, get_top_handler};
