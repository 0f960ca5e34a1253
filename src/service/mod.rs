//! TableQueryService: count, windowed fetch and projection for an allow-listed table.

mod query;
pub use query::{CountedRecords, TableQueryService};
