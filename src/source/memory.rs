//! In-memory table source for tests and demos.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::{RowCursor, TableSource};
use crate::error::AppError;
use crate::pagination::Window;
use crate::value::CellValue;

/// Rows are kept as JSON scalars and scanned back into cells on fetch.
/// Strings prefixed with `0x` are treated as hex-encoded bytes.
#[derive(Debug, Clone, Default)]
pub struct MemoryTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl MemoryTable {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MemoryTable {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row(mut self, values: Vec<Value>) -> Self {
        self.rows.push(values);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryTableSource {
    tables: Arc<HashMap<String, MemoryTable>>,
    queries: Arc<AtomicUsize>,
}

impl MemoryTableSource {
    pub fn new(tables: impl IntoIterator<Item = (String, MemoryTable)>) -> Self {
        MemoryTableSource {
            tables: Arc::new(tables.into_iter().collect()),
            queries: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Count and fetch calls issued so far.
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn table(&self, table: &str) -> Result<&MemoryTable, AppError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.tables
            .get(table)
            .ok_or_else(|| AppError::Internal(format!("relation \"{}\" does not exist", table)))
    }
}

#[async_trait]
impl TableSource for MemoryTableSource {
    async fn count(&self, table: &str) -> Result<i64, AppError> {
        Ok(self.table(table)?.rows.len() as i64)
    }

    async fn fetch(&self, table: &str, window: Option<Window>) -> Result<Box<dyn RowCursor>, AppError> {
        let t = self.table(table)?;
        let rows: Vec<Vec<Value>> = match window {
            Some(w) => t
                .rows
                .iter()
                .skip(usize::try_from(w.offset).unwrap_or(usize::MAX))
                .take(usize::try_from(w.limit).unwrap_or(0))
                .cloned()
                .collect(),
            None => t.rows.clone(),
        };
        Ok(Box::new(MemoryCursor {
            columns: t.columns.clone(),
            rows: rows.into_iter(),
        }))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

struct MemoryCursor {
    columns: Vec<String>,
    rows: std::vec::IntoIter<Vec<Value>>,
}

impl RowCursor for MemoryCursor {
    fn columns(&self) -> Result<Vec<String>, AppError> {
        Ok(self.columns.clone())
    }

    fn next_row(&mut self) -> Option<Result<Vec<CellValue>, AppError>> {
        let row = self.rows.next()?;
        if row.len() != self.columns.len() {
            return Some(Err(AppError::Internal(format!(
                "row has {} values for {} columns",
                row.len(),
                self.columns.len()
            ))));
        }
        Some(row.into_iter().map(scan).collect())
    }
}

fn scan(value: Value) -> Result<CellValue, AppError> {
    Ok(match value {
        Value::Null => CellValue::Null,
        Value::Bool(b) => CellValue::Bool(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => CellValue::Int(i),
            None => CellValue::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => match s.strip_prefix("0x") {
            Some(hex) => CellValue::Bytes(decode_hex(hex)?),
            None => CellValue::Text(s),
        },
        doc @ (Value::Array(_) | Value::Object(_)) => {
            let raw = serde_json::value::to_raw_value(&doc).map_err(|e| AppError::Internal(e.to_string()))?;
            CellValue::Json(raw)
        }
    })
}

fn decode_hex(hex: &str) -> Result<Vec<u8>, AppError> {
    if hex.len() % 2 != 0 {
        return Err(AppError::Internal(format!("odd-length hex literal: {}", hex)));
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            hex.get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| AppError::Internal(format!("invalid hex literal: {}", hex)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source() -> MemoryTableSource {
        let t = MemoryTable::new(["id", "blob"])
            .row(vec![json!(1), json!("0x68690a")])
            .row(vec![json!(2), json!(null)])
            .row(vec![json!(3), json!({"k": 1})]);
        MemoryTableSource::new([("things".to_string(), t)])
    }

    #[tokio::test]
    async fn fetch_applies_window() {
        let s = source();
        let mut cursor = s.fetch("things", Some(Window { offset: 1, limit: 5 })).await.unwrap();
        let mut ids = Vec::new();
        while let Some(row) = cursor.next_row() {
            match &row.unwrap()[0] {
                CellValue::Int(n) => ids.push(*n),
                other => panic!("unexpected {:?}", other),
            }
        }
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(s.queries(), 1);
    }

    #[tokio::test]
    async fn hex_strings_scan_as_bytes() {
        let s = source();
        let mut cursor = s.fetch("things", None).await.unwrap();
        let row = cursor.next_row().unwrap().unwrap();
        assert!(matches!(&row[1], CellValue::Bytes(b) if b == b"hi\n"));
    }

    #[tokio::test]
    async fn unknown_table_is_an_error() {
        assert!(matches!(source().count("nope").await, Err(AppError::Internal(_))));
    }
}
