//! API shared state

use std::sync::Arc;

use studymap_core::{Pipeline, Storage};

/// Shared application state for the HTTP API
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<Storage>,
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    pub fn new(storage: Arc<Storage>, pipeline: Arc<Pipeline>) -> Self {
        Self { storage, pipeline }
    }
}
