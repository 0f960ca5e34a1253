//! Row projection: cursor rows of untyped cells to ordered records.

use crate::case::{normalize_columns, ColumnCase};
use crate::error::AppError;
use crate::record::Record;
use crate::source::RowCursor;
use crate::value::{BinaryFormat, CellValue};

/// Projection settings shared by every request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Projection {
    pub column_case: ColumnCase,
    pub binary: BinaryFormat,
}

impl Projection {
    /// Project one row. `columns` are the already-normalized keys, positionally matching `values`.
    pub fn project_row(&self, columns: &[String], values: Vec<CellValue>) -> Record {
        let mut record = Record::with_capacity(columns.len());
        for (column, value) in columns.iter().zip(values) {
            record.insert(column.as_str(), value.into_field_value(self.binary));
        }
        record
    }

    /// Drain the cursor into records. Column metadata or scan failures abort with the
    /// error; nothing partial is returned.
    pub fn prepare_records(&self, cursor: &mut dyn RowCursor) -> Result<Vec<Record>, AppError> {
        let columns = normalize_columns(&cursor.columns()?, self.column_case);
        let mut records = Vec::new();
        while let Some(row) = cursor.next_row() {
            let values = row?;
            if values.len() != columns.len() {
                return Err(AppError::Internal(format!(
                    "row has {} values for {} columns",
                    values.len(),
                    columns.len()
                )));
            }
            records.push(self.project_row(&columns, values));
        }
        Ok(records)
    }
}
