//! Table Query SDK: allow-listed, paginated, read-only table queries as JSON.

pub mod case;
pub mod config;
pub mod error;
pub mod guard;
pub mod handlers;
pub mod pagination;
pub mod projector;
pub mod record;
pub mod response;
pub mod routes;
pub mod service;
pub mod source;
pub mod sql;
pub mod state;
pub mod store;
pub mod telemetry;
pub mod value;

pub use case::ColumnCase;
pub use config::{load_from_env, ServiceConfig};
pub use error::{AppError, ConfigError};
pub use guard::TableGuard;
pub use pagination::{LimitOffset, PageRequest, Window};
pub use projector::Projection;
pub use record::{Field, Record};
pub use routes::{app, common_routes_with_ready, register, table_routes, TableQueryMode};
pub use service::TableQueryService;
#[cfg(any(test, feature = "testing"))]
pub use source::{MemoryTable, MemoryTableSource};
pub use source::{PgTableSource, RowCursor, TableSource};
pub use state::AppState;
pub use store::{connect, missing_tables};
pub use telemetry::init_tracing;
pub use value::{BinaryFormat, CellValue, DriverValue, FieldValue};
