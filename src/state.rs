//! Shared application state for all routes. Nothing in it is written after startup.

use crate::guard::TableGuard;
use crate::projector::Projection;
use crate::source::TableSource;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn TableSource>,
    pub guard: Arc<TableGuard>,
    pub projection: Projection,
}

impl AppState {
    pub fn new(source: impl TableSource + 'static, guard: TableGuard, projection: Projection) -> Self {
        AppState {
            source: Arc::new(source),
            guard: Arc::new(guard),
            projection,
        }
    }
}
