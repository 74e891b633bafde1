use crate::store::JobStore;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<JobStore>,
    /// Locations compared when a request names none.
    pub comparison_locations: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(store: JobStore, comparison_locations: Vec<String>) -> AppState {
        AppState {
            store: Arc::new(store),
            comparison_locations: Arc::new(comparison_locations),
        }
    }
}
