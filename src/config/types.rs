//! Service settings, resolved once at startup.

use serde::Deserialize;

use crate::projector::Projection;
use crate::routes::TableQueryMode;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub max_connections: u32,
    /// Allow-list, before identifier validation (done by `TableGuard::new`).
    pub allowed_tables: Vec<String>,
    pub mode: TableQueryMode,
    pub projection: Projection,
}

/// Allow-list file: `{"tables": ["users", "sales.orders"]}`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TablesFile {
    #[serde(default)]
    pub tables: Vec<String>,
}
