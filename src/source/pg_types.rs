//! PostgreSQL column types that reach JSON through [`DriverValue`] extraction.

use std::fmt::Write;
use std::net::{Ipv4Addr, Ipv6Addr};

use serde_json::Value;
use sqlx::postgres::types::{PgInterval, PgMoney, PgTimeTz};

use crate::value::{BoxDynError, CellValue, DriverValue};

const NUMERIC_POS: u16 = 0x0000;
const NUMERIC_NEG: u16 = 0x4000;
const NUMERIC_NAN: u16 = 0xC000;
const NUMERIC_PINF: u16 = 0xD000;
const NUMERIC_NINF: u16 = 0xF000;

// Address families as PostgreSQL writes them in binary inet/cidr.
const PGSQL_AF_INET: u8 = 2;
const PGSQL_AF_INET6: u8 = 3;

const MICROS_PER_HOUR: i64 = 3_600_000_000;
const MICROS_PER_MINUTE: i64 = 60_000_000;
const MICROS_PER_SECOND: i64 = 1_000_000;

/// Scalars sqlx decodes into typed values; extracted as their canonical text.
/// `MONEY` extracts as decimal digits in bytes form, like NUMERIC.
#[derive(Debug)]
pub enum PgScalar {
    Uuid(uuid::Uuid),
    Timestamptz(chrono::DateTime<chrono::Utc>),
    Timestamp(chrono::NaiveDateTime),
    Date(chrono::NaiveDate),
    Time(chrono::NaiveTime),
    TimeTz(PgTimeTz),
    Interval(PgInterval),
    Money(PgMoney),
}

impl PgScalar {
    pub(super) fn text(&self) -> String {
        match self {
            PgScalar::Uuid(u) => u.to_string(),
            PgScalar::Timestamptz(d) => d.to_rfc3339(),
            PgScalar::Timestamp(d) => d.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
            PgScalar::Date(d) => d.format("%Y-%m-%d").to_string(),
            PgScalar::Time(t) => t.format("%H:%M:%S%.f").to_string(),
            PgScalar::TimeTz(t) => format!("{}{}", t.time.format("%H:%M:%S%.f"), t.offset),
            PgScalar::Interval(i) => interval_text(i),
            PgScalar::Money(m) => money_text(m),
        }
    }
}

impl DriverValue for PgScalar {
    fn type_name(&self) -> &str {
        match self {
            PgScalar::Uuid(_) => "UUID",
            PgScalar::Timestamptz(_) => "TIMESTAMPTZ",
            PgScalar::Timestamp(_) => "TIMESTAMP",
            PgScalar::Date(_) => "DATE",
            PgScalar::Time(_) => "TIME",
            PgScalar::TimeTz(_) => "TIMETZ",
            PgScalar::Interval(_) => "INTERVAL",
            PgScalar::Money(_) => "MONEY",
        }
    }

    fn driver_value(&self) -> Result<CellValue, BoxDynError> {
        Ok(self.raw())
    }

    fn raw(&self) -> CellValue {
        match self {
            PgScalar::Money(_) => CellValue::Bytes(self.text().into_bytes()),
            _ => CellValue::Text(self.text()),
        }
    }
}

/// ISO 8601 duration, the form PostgreSQL prints with `intervalstyle = iso_8601`.
fn interval_text(i: &PgInterval) -> String {
    let mut out = String::from("P");
    let (years, months) = (i.months / 12, i.months % 12);
    if years != 0 {
        let _ = write!(out, "{}Y", years);
    }
    if months != 0 {
        let _ = write!(out, "{}M", months);
    }
    if i.days != 0 {
        let _ = write!(out, "{}D", i.days);
    }
    let micros = i.microseconds;
    if micros != 0 {
        out.push('T');
        let hours = micros / MICROS_PER_HOUR;
        let minutes = micros % MICROS_PER_HOUR / MICROS_PER_MINUTE;
        let rem = micros % MICROS_PER_MINUTE;
        if hours != 0 {
            let _ = write!(out, "{}H", hours);
        }
        if minutes != 0 {
            let _ = write!(out, "{}M", minutes);
        }
        if rem != 0 {
            let secs = rem / MICROS_PER_SECOND;
            let frac = (rem % MICROS_PER_SECOND).abs();
            if secs == 0 && rem < 0 {
                out.push('-');
            }
            let _ = write!(out, "{}", secs);
            if frac != 0 {
                let digits = format!("{:06}", frac);
                let _ = write!(out, ".{}", digits.trim_end_matches('0'));
            }
            out.push('S');
        }
    }
    if out == "P" {
        out.push_str("T0S");
    }
    out
}

/// MONEY is an integer count of cents (two fractional digits, the default `lc_monetary`).
fn money_text(m: &PgMoney) -> String {
    let sign = if m.0 < 0 { "-" } else { "" };
    let cents = m.0.unsigned_abs();
    format!("{}{}.{:02}", sign, cents / 100, cents % 100)
}

/// Renders a decoded one-dimensional array as an embedded JSON document.
pub fn array_json<T>(items: Vec<Option<T>>, element: impl Fn(T) -> Value) -> Result<CellValue, BoxDynError> {
    let doc = Value::Array(
        items
            .into_iter()
            .map(|item| item.map(&element).unwrap_or(Value::Null))
            .collect(),
    );
    Ok(CellValue::Json(serde_json::value::to_raw_value(&doc)?))
}

/// NUMERIC as delivered on the wire. Extracts to the decimal digits as bytes, so the
/// binary format setting decides between a JSON string and a JSON number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgNumeric {
    pub bytes: Vec<u8>,
    /// Text-format payloads are already decimal strings.
    pub text: bool,
}

impl DriverValue for PgNumeric {
    fn type_name(&self) -> &str {
        "NUMERIC"
    }

    fn driver_value(&self) -> Result<CellValue, BoxDynError> {
        if self.text {
            return Ok(CellValue::Bytes(self.bytes.clone()));
        }
        Ok(CellValue::Bytes(decode_numeric(&self.bytes)?.into_bytes()))
    }

    fn raw(&self) -> CellValue {
        CellValue::Bytes(self.bytes.clone())
    }
}

/// Binary NUMERIC: ndigits, weight, sign, dscale (all 16-bit), then base-10000 digits.
pub fn decode_numeric(buf: &[u8]) -> Result<String, BoxDynError> {
    if buf.len() < 8 {
        return Err(format!("numeric payload too short: {} bytes", buf.len()).into());
    }
    let ndigits = i16::from_be_bytes([buf[0], buf[1]]);
    let weight = i32::from(i16::from_be_bytes([buf[2], buf[3]]));
    let sign = u16::from_be_bytes([buf[4], buf[5]]);
    let dscale = usize::from(u16::from_be_bytes([buf[6], buf[7]]));
    match sign {
        NUMERIC_NAN => return Ok("NaN".into()),
        NUMERIC_PINF => return Ok("Infinity".into()),
        NUMERIC_NINF => return Ok("-Infinity".into()),
        NUMERIC_POS | NUMERIC_NEG => {}
        other => return Err(format!("invalid numeric sign: {:#06x}", other).into()),
    }
    let ndigits = usize::try_from(ndigits).map_err(|_| "negative numeric digit count")?;
    if buf.len() != 8 + ndigits * 2 {
        return Err(format!("numeric payload has {} bytes for {} digits", buf.len(), ndigits).into());
    }
    let digits: Vec<i16> = buf[8..]
        .chunks_exact(2)
        .map(|c| i16::from_be_bytes([c[0], c[1]]))
        .collect();
    if digits.iter().any(|d| !(0..10000).contains(d)) {
        return Err("numeric digit out of range".into());
    }
    let digit_at = |i: i32| -> i16 {
        usize::try_from(i)
            .ok()
            .and_then(|i| digits.get(i).copied())
            .unwrap_or(0)
    };

    let mut out = String::new();
    if sign == NUMERIC_NEG {
        out.push('-');
    }
    if weight < 0 {
        out.push('0');
    } else {
        for i in 0..=weight {
            if i == 0 {
                write!(out, "{}", digit_at(i))?;
            } else {
                write!(out, "{:04}", digit_at(i))?;
            }
        }
    }
    if dscale > 0 {
        let mut frac = String::with_capacity(dscale + 4);
        let mut i = weight + 1;
        while frac.len() < dscale {
            write!(frac, "{:04}", digit_at(i))?;
            i += 1;
        }
        frac.truncate(dscale);
        out.push('.');
        out.push_str(&frac);
    }
    Ok(out)
}

/// INET/CIDR in binary form: family, prefix bits, cidr flag, address length, address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgInet {
    pub bytes: Vec<u8>,
    pub text: bool,
}

impl DriverValue for PgInet {
    fn type_name(&self) -> &str {
        "INET"
    }

    fn driver_value(&self) -> Result<CellValue, BoxDynError> {
        if self.text {
            return Ok(CellValue::Text(String::from_utf8(self.bytes.clone())?));
        }
        Ok(CellValue::Text(decode_inet(&self.bytes)?))
    }

    fn raw(&self) -> CellValue {
        opaque_bytes(&self.bytes, self.text)
    }
}

pub fn decode_inet(buf: &[u8]) -> Result<String, BoxDynError> {
    if buf.len() < 4 {
        return Err(format!("inet payload too short: {} bytes", buf.len()).into());
    }
    let (family, bits, is_cidr, len) = (buf[0], buf[1], buf[2] != 0, usize::from(buf[3]));
    let addr = &buf[4..];
    if addr.len() != len {
        return Err(format!("inet payload has {} address bytes, expected {}", addr.len(), len).into());
    }
    let (text, max_bits) = match family {
        PGSQL_AF_INET => {
            let octets: [u8; 4] = addr.try_into().map_err(|_| "ipv4 address must be 4 bytes")?;
            (Ipv4Addr::from(octets).to_string(), 32)
        }
        PGSQL_AF_INET6 => {
            let octets: [u8; 16] = addr.try_into().map_err(|_| "ipv6 address must be 16 bytes")?;
            (Ipv6Addr::from(octets).to_string(), 128)
        }
        other => return Err(format!("unknown inet family: {}", other).into()),
    };
    if is_cidr || bits != max_bits {
        return Ok(format!("{}/{}", text, bits));
    }
    Ok(text)
}

/// Any other type. Enums and text-like types (citext, xml, domains over text) extract as
/// UTF-8 text. Binary payloads of types with no decoder have no text form: extraction
/// fails and the raw value is the bytea-style hex escape (`\x...`), so the binary format
/// setting decides how it is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgUnknown {
    pub type_name: String,
    pub bytes: Vec<u8>,
    pub textual: bool,
}

impl DriverValue for PgUnknown {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn driver_value(&self) -> Result<CellValue, BoxDynError> {
        if !self.textual {
            return Err(format!("no text form for binary {} value", self.type_name).into());
        }
        Ok(CellValue::Text(String::from_utf8(self.bytes.clone())?))
    }

    fn raw(&self) -> CellValue {
        opaque_bytes(&self.bytes, self.textual)
    }
}

fn opaque_bytes(bytes: &[u8], textual: bool) -> CellValue {
    if textual {
        return CellValue::Bytes(bytes.to_vec());
    }
    let mut hex = String::with_capacity(2 + bytes.len() * 2);
    hex.push_str("\\x");
    for b in bytes {
        let _ = write!(hex, "{:02x}", b);
    }
    CellValue::Bytes(hex.into_bytes())
}
