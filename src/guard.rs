//! Table allow-list. The only authorization a table query goes through; checked
//! before any statement touches the requested table.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::error::{AppError, ConfigError};

/// `name` or `schema.name`, unquoted SQL identifiers.
fn table_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_$]*(\.[A-Za-z_][A-Za-z0-9_$]*)?$").expect("static regex")
    })
}

#[derive(Debug, Clone, Default)]
pub struct TableGuard {
    allowed: HashSet<String>,
}

impl TableGuard {
    pub fn new<I, S>(tables: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut allowed = HashSet::new();
        for table in tables {
            let table = table.into();
            let table = table.trim();
            if table.is_empty() {
                continue;
            }
            if !table_name_re().is_match(table) {
                return Err(ConfigError::InvalidTableName(table.to_string()));
            }
            allowed.insert(table.to_string());
        }
        if allowed.is_empty() {
            tracing::warn!("table allow-list is empty; every table request will be rejected");
        }
        Ok(TableGuard { allowed })
    }

    /// Empty names and stray browser requests (favicon) are not found; well-formed
    /// names outside the allow-list are a bad request.
    pub fn check<'a>(&self, table: &'a str) -> Result<&'a str, AppError> {
        if table.is_empty() || table.contains("favicon") {
            return Err(AppError::NotFound(format!("table '{}'", table)));
        }
        if !self.allowed.contains(table) {
            return Err(AppError::BadRequest("table not found".into()));
        }
        Ok(table)
    }

    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.allowed.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.allowed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}
