//! Column values as scanned from a cursor, and the JSON values they project to.
//!
//! A cursor hands back one [`CellValue`] per column. Most SQL types map onto a plain
//! variant directly; types that carry their own representation (uuid, timestamps,
//! numeric, enums, ...) arrive as [`CellValue::Custom`] and are asked for their
//! driver value during projection.

use serde::{Serialize, Serializer};
use serde_json::value::RawValue;
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

pub type BoxDynError = Box<dyn std::error::Error + Send + Sync>;

/// One untyped column value as read from a row.
#[derive(Debug)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    /// A JSON document the store already holds as JSON; embedded verbatim.
    Json(Box<RawValue>),
    Custom(Box<dyn DriverValue>),
}

/// A value that knows how to convert itself into a plain scalar.
///
/// Conversion is best effort: when [`DriverValue::driver_value`] fails the error is
/// discarded and [`DriverValue::raw`] is projected instead. A malformed custom value
/// therefore degrades to its raw form (usually the driver bytes) rather than failing
/// the request.
pub trait DriverValue: fmt::Debug + Send + Sync {
    /// SQL type name, for logging.
    fn type_name(&self) -> &str;

    fn driver_value(&self) -> Result<CellValue, BoxDynError>;

    /// Fallback used when extraction fails.
    fn raw(&self) -> CellValue;
}

/// How byte payloads are written into JSON.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BinaryFormat {
    /// Lossy UTF-8 string.
    #[default]
    String,
    /// Embedded as-is when the bytes are a valid JSON document, else as a string.
    RawJson,
}

impl FromStr for BinaryFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" => Ok(BinaryFormat::String),
            "raw_json" | "raw-json" | "json" => Ok(BinaryFormat::RawJson),
            _ => Err(ConfigError::InvalidValue {
                key: "BINARY_FORMAT",
                value: s.to_string(),
            }),
        }
    }
}

/// A projected, JSON-ready field value.
#[derive(Debug, Clone)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Raw(Box<RawValue>),
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldValue::Null, FieldValue::Null) => true,
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a == b,
            (FieldValue::Int(a), FieldValue::Int(b)) => a == b,
            (FieldValue::Float(a), FieldValue::Float(b)) => a == b,
            (FieldValue::Text(a), FieldValue::Text(b)) => a == b,
            (FieldValue::Raw(a), FieldValue::Raw(b)) => a.get() == b.get(),
            _ => false,
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Null => serializer.serialize_unit(),
            FieldValue::Bool(b) => serializer.serialize_bool(*b),
            FieldValue::Int(n) => serializer.serialize_i64(*n),
            // JSON has no NaN or infinity.
            FieldValue::Float(f) if !f.is_finite() => serializer.serialize_unit(),
            FieldValue::Float(f) => serializer.serialize_f64(*f),
            FieldValue::Text(s) => serializer.serialize_str(s),
            FieldValue::Raw(raw) => raw.serialize(serializer),
        }
    }
}

impl CellValue {
    /// Resolve this cell to a field value: extract custom scalars, then fix up bytes.
    pub fn into_field_value(self, binary: BinaryFormat) -> FieldValue {
        let plain = match self {
            CellValue::Custom(custom) => extract(custom.as_ref()),
            other => other,
        };
        fix_data_type(plain, binary)
    }
}

fn extract(custom: &dyn DriverValue) -> CellValue {
    match custom.driver_value() {
        // A custom value yielding another custom value is not unwrapped further.
        Ok(CellValue::Custom(inner)) => inner.raw(),
        Ok(v) => v,
        Err(e) => {
            tracing::debug!(type_name = custom.type_name(), error = %e, "driver value extraction failed, using raw form");
            custom.raw()
        }
    }
}

fn fix_data_type(value: CellValue, binary: BinaryFormat) -> FieldValue {
    match value {
        CellValue::Null => FieldValue::Null,
        CellValue::Bool(b) => FieldValue::Bool(b),
        CellValue::Int(n) => FieldValue::Int(n),
        CellValue::Float(f) => FieldValue::Float(f),
        CellValue::Text(s) => FieldValue::Text(s),
        CellValue::Json(raw) => FieldValue::Raw(raw),
        CellValue::Bytes(bytes) => bytes_to_field(bytes, binary),
        CellValue::Custom(custom) => fix_data_type(custom.raw(), binary),
    }
}

fn bytes_to_field(bytes: Vec<u8>, binary: BinaryFormat) -> FieldValue {
    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    };
    match binary {
        BinaryFormat::String => FieldValue::Text(text),
        BinaryFormat::RawJson => match serde_json::from_str::<&RawValue>(&text) {
            Ok(raw) => FieldValue::Raw(raw.to_owned()),
            Err(e) => {
                tracing::debug!(error = %e, "byte payload is not JSON, writing as string");
                FieldValue::Text(text)
            }
        },
    }
}
