use std::sync::Arc;

use crate::{db::ReviewStore, validation::ReviewRules};

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub rules: Arc<ReviewRules>,
}

impl AppState {
    pub fn new(store: impl ReviewStore + 'static, rules: ReviewRules) -> Self {
        Self {
            store: Arc::new(store),
            rules: Arc::new(rules),
        }
    }
}

pub type SharedStore = Arc<dyn ReviewStore>;
