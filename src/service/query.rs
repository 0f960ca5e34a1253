//! Read-only query execution against a [`TableSource`].
//!
//! Callers pass a table name that already went through the allow-list. The first
//! failing store call ends the request; nothing is retried.

use crate::error::AppError;
use crate::pagination::{LimitOffset, PageRequest, Window};
use crate::projector::Projection;
use crate::record::Record;
use crate::source::TableSource;

/// A page of records plus the row count of the whole table.
#[derive(Debug)]
pub struct CountedRecords {
    pub total_count: i64,
    pub items: Vec<Record>,
}

pub struct TableQueryService;

impl TableQueryService {
    /// Count, then fetch the page window.
    pub async fn paged(
        source: &dyn TableSource,
        projection: &Projection,
        table: &str,
        page: PageRequest,
    ) -> Result<CountedRecords, AppError> {
        let total_count = source.count(table).await?;
        let items = Self::fetch(source, projection, table, Some(page.window())).await?;
        Ok(CountedRecords { total_count, items })
    }

    /// Count, then fetch the limit/offset window.
    pub async fn limit_offset(
        source: &dyn TableSource,
        projection: &Projection,
        table: &str,
        window: LimitOffset,
    ) -> Result<CountedRecords, AppError> {
        let total_count = source.count(table).await?;
        let items = Self::fetch(source, projection, table, Some(window.window())).await?;
        Ok(CountedRecords { total_count, items })
    }

    /// First row of the table, unwrapped. An empty table is not found.
    pub async fn first(
        source: &dyn TableSource,
        projection: &Projection,
        table: &str,
    ) -> Result<Record, AppError> {
        let window = Window { offset: 0, limit: 1 };
        Self::fetch(source, projection, table, Some(window))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("record not found".into()))
    }

    /// Every row, no count.
    pub async fn all(
        source: &dyn TableSource,
        projection: &Projection,
        table: &str,
    ) -> Result<Vec<Record>, AppError> {
        Self::fetch(source, projection, table, None).await
    }

    async fn fetch(
        source: &dyn TableSource,
        projection: &Projection,
        table: &str,
        window: Option<Window>,
    ) -> Result<Vec<Record>, AppError> {
        let mut cursor = source.fetch(table, window).await?;
        let records = projection.prepare_records(&mut *cursor)?;
        tracing::debug!(table, rows = records.len(), "projected rows");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{MemoryTable, MemoryTableSource};
    use serde_json::json;

    fn source(rows: usize) -> MemoryTableSource {
        let mut t = MemoryTable::new(["id", "name"]);
        for i in 0..rows {
            t = t.row(vec![json!(i as i64 + 1), json!(format!("row {}", i + 1))]);
        }
        MemoryTableSource::new([("items".to_string(), t)])
    }

    #[tokio::test]
    async fn paged_counts_whole_table() {
        let s = source(25);
        let page = PageRequest { page: 3, per_page: 10 };
        let out = TableQueryService::paged(&s, &Projection::default(), "items", page).await.unwrap();
        assert_eq!(out.total_count, 25);
        assert_eq!(out.items.len(), 5);
        assert_eq!(s.queries(), 2);
    }

    #[tokio::test]
    async fn first_on_empty_table_is_not_found() {
        let s = source(0);
        let err = TableQueryService::first(&s, &Projection::default(), "items").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn count_failure_skips_fetch() {
        let s = source(3);
        let err = TableQueryService::limit_offset(&s, &Projection::default(), "missing", LimitOffset::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(s.queries(), 1);
    }
}
