//! Where rows come from: a forward-only cursor plus a row count, behind traits so
//! handlers do not depend on the driver.

#[cfg(any(test, feature = "testing"))]
mod memory;
mod pg;
mod pg_types;

#[cfg(any(test, feature = "testing"))]
pub use memory::{MemoryTable, MemoryTableSource};
pub use pg::PgTableSource;
pub use pg_types::{decode_inet, decode_numeric, PgInet, PgNumeric, PgScalar, PgUnknown};

use async_trait::async_trait;

use crate::error::AppError;
use crate::pagination::Window;
use crate::value::CellValue;

/// Forward-only iterator over result rows.
pub trait RowCursor: Send {
    fn columns(&self) -> Result<Vec<String>, AppError>;

    /// Next row, one value per column. `None` when exhausted.
    fn next_row(&mut self) -> Option<Result<Vec<CellValue>, AppError>>;
}

#[async_trait]
pub trait TableSource: Send + Sync {
    async fn count(&self, table: &str) -> Result<i64, AppError>;

    /// Rows of `table`, restricted to `window` when given.
    async fn fetch(&self, table: &str, window: Option<Window>) -> Result<Box<dyn RowCursor>, AppError>;

    /// Readiness check.
    async fn ping(&self) -> Result<(), AppError>;
}
