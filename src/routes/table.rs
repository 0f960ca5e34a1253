//! Table query route. One handler variant is bound to `GET /table/:table`; a request
//! without a table name gets the structured not-found error.

use crate::error::ConfigError;
use crate::handlers::table::{first_row, list_all, list_limit_offset, list_paged, missing_table};
use crate::state::AppState;
use axum::{routing::get, Router};
use std::str::FromStr;

/// Which response shape `GET /table/:table` produces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TableQueryMode {
    /// `?page=&perPage=`, with total count.
    #[default]
    Paged,
    /// `?limit=&offset=`, with total count.
    LimitOffset,
    /// First row only, 404 when the table is empty.
    First,
    /// Every row, no count.
    All,
}

impl FromStr for TableQueryMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paged" | "page" => Ok(TableQueryMode::Paged),
            "limit_offset" | "limit-offset" => Ok(TableQueryMode::LimitOffset),
            "first" | "one" => Ok(TableQueryMode::First),
            "all" | "unpaged" => Ok(TableQueryMode::All),
            _ => Err(ConfigError::InvalidValue {
                key: "TABLE_QUERY_MODE",
                value: s.to_string(),
            }),
        }
    }
}

pub fn table_routes(state: AppState, mode: TableQueryMode) -> Router {
    let route = match mode {
        TableQueryMode::Paged => get(list_paged),
        TableQueryMode::LimitOffset => get(list_limit_offset),
        TableQueryMode::First => get(first_row),
        TableQueryMode::All => get(list_all),
    };
    Router::new()
        .route("/table/:table", route)
        .route("/table/", get(missing_table))
        .with_state(state)
}

/// Add the table route to an existing router. To mount under a prefix, nest the
/// result: `Router::new().nest("/api", register(Router::new(), state, mode))`.
pub fn register(router: Router, state: AppState, mode: TableQueryMode) -> Router {
    router.merge(table_routes(state, mode))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_modes() {
        assert_eq!("paged".parse::<TableQueryMode>().unwrap(), TableQueryMode::Paged);
        assert_eq!("LIMIT_OFFSET".parse::<TableQueryMode>().unwrap(), TableQueryMode::LimitOffset);
        assert_eq!("first".parse::<TableQueryMode>().unwrap(), TableQueryMode::First);
        assert_eq!("all".parse::<TableQueryMode>().unwrap(), TableQueryMode::All);
        assert!("cursor".parse::<TableQueryMode>().is_err());
    }
}
