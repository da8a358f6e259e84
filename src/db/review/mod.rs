pub mod get;
pub mod post;

pub use get::{aggregate, get_review};
pub use post::create_review;
