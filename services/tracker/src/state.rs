//! Application state shared across handlers

use std::sync::Arc;

use crate::repositories::TrackerStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TrackerStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn TrackerStore>) -> Self {
        Self { store }
    }
}
