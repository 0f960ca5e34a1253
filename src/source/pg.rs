//! PostgreSQL table source over a sqlx pool.

use async_trait::async_trait;
use serde_json::value::RawValue;
use serde_json::Value;
use sqlx::postgres::types::{PgInterval, PgMoney, PgTimeTz};
use sqlx::postgres::{PgPool, PgRow, PgTypeInfo, PgTypeKind, PgValueFormat, PgValueRef, Postgres};
use sqlx::types::Json;
use sqlx::{Column, Row, TypeInfo, ValueRef};

use super::pg_types::{array_json, PgInet, PgNumeric, PgScalar, PgUnknown};
use super::{RowCursor, TableSource};
use crate::error::AppError;
use crate::pagination::Window;
use crate::sql::{count_rows, select_rows};
use crate::value::CellValue;

#[derive(Clone)]
pub struct PgTableSource {
    pool: PgPool,
}

impl PgTableSource {
    pub fn new(pool: PgPool) -> Self {
        PgTableSource { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl TableSource for PgTableSource {
    async fn count(&self, table: &str) -> Result<i64, AppError> {
        let q = count_rows(table);
        tracing::debug!(sql = %q.sql, "query");
        let count: i64 = sqlx::query_scalar(&q.sql).fetch_one(&self.pool).await?;
        Ok(count)
    }

    async fn fetch(&self, table: &str, window: Option<Window>) -> Result<Box<dyn RowCursor>, AppError> {
        let q = select_rows(table, window);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(*p);
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(Box::new(PgCursor::new(rows)))
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

/// Cursor over a fetched result set. Column names come from the first row; an empty
/// result has no columns and no rows.
struct PgCursor {
    columns: Vec<String>,
    rows: std::vec::IntoIter<PgRow>,
}

impl PgCursor {
    fn new(rows: Vec<PgRow>) -> Self {
        let columns = rows
            .first()
            .map(|r| r.columns().iter().map(|c| c.name().to_string()).collect())
            .unwrap_or_default();
        PgCursor {
            columns,
            rows: rows.into_iter(),
        }
    }
}

impl RowCursor for PgCursor {
    fn columns(&self) -> Result<Vec<String>, AppError> {
        Ok(self.columns.clone())
    }

    fn next_row(&mut self) -> Option<Result<Vec<CellValue>, AppError>> {
        let row = self.rows.next()?;
        Some(
            (0..row.len())
                .map(|idx| decode_cell(&row, idx).map_err(AppError::from))
                .collect(),
        )
    }
}

/// Types whose binary wire form is their UTF-8 text.
const TEXT_LIKE: &[&str] = &["TEXT", "VARCHAR", "BPCHAR", "NAME", "UNKNOWN", "CITEXT", "XML", "\"CHAR\""];

/// Scan one column into an explicit variant, chosen by its PostgreSQL type.
fn decode_cell(row: &PgRow, idx: usize) -> Result<CellValue, sqlx::Error> {
    let raw = row.try_get_raw(idx)?;
    if raw.is_null() {
        return Ok(CellValue::Null);
    }
    let type_info = row.column(idx).type_info();
    if let PgTypeKind::Array(_) = type_info.kind() {
        return decode_array(row, idx, type_info.name()).or_else(|err| {
            tracing::debug!(column = idx, type_name = type_info.name(), error = %err, "array kept as raw bytes");
            opaque(&raw, type_info)
        });
    }
    Ok(match type_info.name() {
        "BOOL" => CellValue::Bool(row.try_get(idx)?),
        "INT2" => CellValue::Int(row.try_get::<i16, _>(idx)?.into()),
        "INT4" => CellValue::Int(row.try_get::<i32, _>(idx)?.into()),
        "INT8" => CellValue::Int(row.try_get(idx)?),
        "OID" => CellValue::Int(row.try_get::<sqlx::postgres::types::Oid, _>(idx)?.0.into()),
        "FLOAT4" => CellValue::Float(row.try_get::<f32, _>(idx)?.into()),
        "FLOAT8" => CellValue::Float(row.try_get(idx)?),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" | "UNKNOWN" => CellValue::Text(row.try_get(idx)?),
        "BYTEA" => CellValue::Bytes(row.try_get(idx)?),
        "JSON" | "JSONB" => CellValue::Json(row.try_get::<Json<Box<RawValue>>, _>(idx)?.0),
        "UUID" => CellValue::Custom(Box::new(PgScalar::Uuid(row.try_get(idx)?))),
        "TIMESTAMPTZ" => CellValue::Custom(Box::new(PgScalar::Timestamptz(row.try_get(idx)?))),
        "TIMESTAMP" => CellValue::Custom(Box::new(PgScalar::Timestamp(row.try_get(idx)?))),
        "DATE" => CellValue::Custom(Box::new(PgScalar::Date(row.try_get(idx)?))),
        "TIME" => CellValue::Custom(Box::new(PgScalar::Time(row.try_get(idx)?))),
        "TIMETZ" => CellValue::Custom(Box::new(PgScalar::TimeTz(row.try_get::<PgTimeTz, _>(idx)?))),
        "INTERVAL" => CellValue::Custom(Box::new(PgScalar::Interval(row.try_get::<PgInterval, _>(idx)?))),
        "MONEY" => CellValue::Custom(Box::new(PgScalar::Money(row.try_get::<PgMoney, _>(idx)?))),
        "NUMERIC" => CellValue::Custom(Box::new(PgNumeric {
            bytes: raw.as_bytes().map_err(sqlx::Error::Decode)?.to_vec(),
            text: raw.format() == PgValueFormat::Text,
        })),
        "INET" | "CIDR" => CellValue::Custom(Box::new(PgInet {
            bytes: raw.as_bytes().map_err(sqlx::Error::Decode)?.to_vec(),
            text: raw.format() == PgValueFormat::Text,
        })),
        _ => opaque(&raw, type_info)?,
    })
}

/// One-dimensional arrays of the scalars sqlx decodes, as embedded JSON.
fn decode_array(row: &PgRow, idx: usize, type_name: &str) -> Result<CellValue, sqlx::Error> {
    match type_name {
        "BOOL[]" => array::<bool>(row, idx, Value::Bool),
        "INT2[]" => array::<i16>(row, idx, Value::from),
        "INT4[]" => array::<i32>(row, idx, Value::from),
        "INT8[]" => array::<i64>(row, idx, Value::from),
        "FLOAT4[]" => array::<f32>(row, idx, Value::from),
        "FLOAT8[]" => array::<f64>(row, idx, Value::from),
        "TEXT[]" | "VARCHAR[]" | "BPCHAR[]" | "NAME[]" => array::<String>(row, idx, Value::String),
        "JSON[]" | "JSONB[]" => array::<Json<Value>>(row, idx, |j| j.0),
        "UUID[]" => array::<uuid::Uuid>(row, idx, |v| Value::String(PgScalar::Uuid(v).text())),
        "TIMESTAMPTZ[]" => array::<chrono::DateTime<chrono::Utc>>(row, idx, |v| {
            Value::String(PgScalar::Timestamptz(v).text())
        }),
        "TIMESTAMP[]" => array::<chrono::NaiveDateTime>(row, idx, |v| Value::String(PgScalar::Timestamp(v).text())),
        "DATE[]" => array::<chrono::NaiveDate>(row, idx, |v| Value::String(PgScalar::Date(v).text())),
        "TIME[]" => array::<chrono::NaiveTime>(row, idx, |v| Value::String(PgScalar::Time(v).text())),
        "INTERVAL[]" => array::<PgInterval>(row, idx, |v| Value::String(PgScalar::Interval(v).text())),
        other => Err(sqlx::Error::Decode(format!("no decoder for {}", other).into())),
    }
}

fn array<T>(row: &PgRow, idx: usize, element: fn(T) -> Value) -> Result<CellValue, sqlx::Error>
where
    Vec<Option<T>>: for<'r> sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    let items: Vec<Option<T>> = row.try_get(idx)?;
    array_json(items, element).map_err(sqlx::Error::Decode)
}

/// A type with no decoder. Its bytes are text only for enums and text-like types.
fn opaque(raw: &PgValueRef<'_>, type_info: &PgTypeInfo) -> Result<CellValue, sqlx::Error> {
    Ok(CellValue::Custom(Box::new(PgUnknown {
        type_name: type_info.name().to_string(),
        bytes: raw.as_bytes().map_err(sqlx::Error::Decode)?.to_vec(),
        textual: raw.format() == PgValueFormat::Text || is_textual(type_info),
    })))
}

fn is_textual(type_info: &PgTypeInfo) -> bool {
    match type_info.kind() {
        PgTypeKind::Enum(_) => true,
        PgTypeKind::Domain(base) => is_textual(base),
        _ => TEXT_LIKE.iter().any(|t| t.eq_ignore_ascii_case(type_info.name())),
    }
}
