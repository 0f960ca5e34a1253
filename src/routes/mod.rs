//! Route registration: table queries plus health/readiness/version.

pub mod common;
pub mod table;

pub use common::common_routes_with_ready;
pub use table::{register, table_routes, TableQueryMode};

use crate::state::AppState;
use axum::Router;
use tower_http::trace::TraceLayer;

/// Full application: common routes and the table route, with per-request tracing.
pub fn app(state: AppState, mode: TableQueryMode) -> Router {
    Router::new()
        .merge(common_routes_with_ready(state.clone()))
        .merge(table_routes(state, mode))
        .layer(TraceLayer::new_for_http())
}
