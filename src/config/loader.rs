//! Load service settings from the environment (and `.env`), plus an optional allow-list file.

use std::path::Path;

use crate::case::ColumnCase;
use crate::config::types::*;
use crate::error::ConfigError;
use crate::projector::Projection;
use crate::routes::TableQueryMode;
use crate::value::BinaryFormat;

/// Read `.env` if present, then the process environment, then `ALLOWED_TABLES_PATH`.
pub async fn load_from_env() -> Result<ServiceConfig, ConfigError> {
    dotenvy::dotenv().ok();
    let mut config = from_lookup(|key| std::env::var(key).ok())?;
    if let Ok(path) = std::env::var("ALLOWED_TABLES_PATH") {
        let file = load_tables_file(&path).await?;
        config.allowed_tables.extend(file.tables);
    }
    tracing::info!(
        tables = config.allowed_tables.len(),
        mode = ?config.mode,
        "configuration loaded"
    );
    Ok(config)
}

/// Build settings from a key lookup. Unset keys take their defaults; set but invalid
/// values are errors.
pub fn from_lookup<F>(lookup: F) -> Result<ServiceConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
    let bind_addr = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
    let max_connections = match get("DB_MAX_CONNECTIONS") {
        Some(v) => v.trim().parse::<u32>().ok().filter(|n| *n > 0).ok_or(ConfigError::InvalidValue {
            key: "DB_MAX_CONNECTIONS",
            value: v,
        })?,
        None => DEFAULT_MAX_CONNECTIONS,
    };
    let allowed_tables = get("ALLOWED_TABLES")
        .map(|v| parse_table_list(&v))
        .unwrap_or_default();
    let mode: TableQueryMode = get("TABLE_QUERY_MODE").map(|v| v.parse()).transpose()?.unwrap_or_default();
    let binary: BinaryFormat = get("BINARY_FORMAT").map(|v| v.parse()).transpose()?.unwrap_or_default();
    let column_case: ColumnCase = get("COLUMN_CASE").map(|v| v.parse()).transpose()?.unwrap_or_default();

    Ok(ServiceConfig {
        database_url,
        bind_addr,
        max_connections,
        allowed_tables,
        mode,
        projection: Projection { column_case, binary },
    })
}

/// Comma separated table names; blanks dropped.
pub fn parse_table_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

pub async fn load_tables_file(path: impl AsRef<Path>) -> Result<TablesFile, ConfigError> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&text).map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults() {
        let c = from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/app")])).unwrap();
        assert_eq!(c.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(c.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert!(c.allowed_tables.is_empty());
        assert_eq!(c.mode, TableQueryMode::Paged);
        assert_eq!(c.projection, Projection::default());
    }

    #[test]
    fn reads_every_setting() {
        let c = from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/app"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("DB_MAX_CONNECTIONS", "12"),
            ("ALLOWED_TABLES", "users, sales.orders,,"),
            ("TABLE_QUERY_MODE", "limit_offset"),
            ("BINARY_FORMAT", "raw_json"),
            ("COLUMN_CASE", "camel"),
        ]))
        .unwrap();
        assert_eq!(c.bind_addr, "127.0.0.1:8080");
        assert_eq!(c.max_connections, 12);
        assert_eq!(c.allowed_tables, vec!["users", "sales.orders"]);
        assert_eq!(c.mode, TableQueryMode::LimitOffset);
        assert_eq!(c.projection.binary, BinaryFormat::RawJson);
        assert_eq!(c.projection.column_case, ColumnCase::Camel);
    }

    #[test]
    fn missing_database_url() {
        assert!(matches!(from_lookup(lookup(&[])), Err(ConfigError::Missing("DATABASE_URL"))));
    }

    #[test]
    fn invalid_values_fail() {
        let base = [("DATABASE_URL", "postgres://db/app")];
        for (key, value) in [
            ("DB_MAX_CONNECTIONS", "0"),
            ("TABLE_QUERY_MODE", "cursor"),
            ("BINARY_FORMAT", "base64"),
            ("COLUMN_CASE", "kebab"),
        ] {
            let mut pairs = base.to_vec();
            pairs.push((key, value));
            assert!(
                matches!(from_lookup(lookup(&pairs)), Err(ConfigError::InvalidValue { .. })),
                "{key}={value}"
            );
        }
    }

    #[tokio::test]
    async fn tables_file() {
        let path = std::env::temp_dir().join(format!("tables-{}.json", std::process::id()));
        tokio::fs::write(&path, r#"{"tables": ["users", "audit.events"]}"#).await.unwrap();
        let file = load_tables_file(&path).await.unwrap();
        assert_eq!(file.tables, vec!["users", "audit.events"]);
        tokio::fs::remove_file(&path).await.unwrap();

        assert!(matches!(load_tables_file(&path).await, Err(ConfigError::Load(_))));
    }
}
