//! Column name normalization: maps raw cursor column names to the JSON keys of a record.

use std::str::FromStr;

use crate::error::ConfigError;

/// Key style applied to column names before they become record keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColumnCase {
    /// Column names as returned by the store.
    #[default]
    Verbatim,
    /// snake_case -> camelCase, e.g. "created_at" -> "createdAt".
    Camel,
    /// camelCase -> snake_case, e.g. "userId" -> "user_id".
    Snake,
}

impl ColumnCase {
    pub fn apply(self, column: &str) -> String {
        match self {
            ColumnCase::Verbatim => column.to_string(),
            ColumnCase::Camel => to_camel_case(column),
            ColumnCase::Snake => to_snake_case(column),
        }
    }
}

impl FromStr for ColumnCase {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "verbatim" | "none" | "" => Ok(ColumnCase::Verbatim),
            "camel" | "camelcase" => Ok(ColumnCase::Camel),
            "snake" | "snake_case" => Ok(ColumnCase::Snake),
            _ => Err(ConfigError::InvalidValue {
                key: "COLUMN_CASE",
                value: s.to_string(),
            }),
        }
    }
}

/// Normalize every column name of a result set. Output has the same length and order.
/// Names that collide after normalization are left colliding; the record keeps the last value.
pub fn normalize_columns(columns: &[String], case: ColumnCase) -> Vec<String> {
    columns.iter().map(|c| case.apply(c)).collect()
}

pub fn to_camel_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut capitalize_next = false;
    for c in s.chars() {
        if c == '_' {
            capitalize_next = !out.is_empty();
        } else if capitalize_next {
            out.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

pub fn to_snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_and_snake() {
        assert_eq!(to_camel_case("user_id"), "userId");
        assert_eq!(to_camel_case("created_at"), "createdAt");
        assert_eq!(to_camel_case("_private"), "private");
        assert_eq!(to_snake_case("userId"), "user_id");
        assert_eq!(to_snake_case("HTTPCode"), "h_t_t_p_code");
        assert_eq!(to_snake_case("already_snake"), "already_snake");
    }

    #[test]
    fn verbatim_is_pass_through() {
        let cols = vec!["Id".to_string(), "first_name".to_string(), "Id".to_string()];
        assert_eq!(normalize_columns(&cols, ColumnCase::Verbatim), cols);
    }

    #[test]
    fn normalization_can_collide() {
        let cols = vec!["user_id".to_string(), "userId".to_string()];
        assert_eq!(normalize_columns(&cols, ColumnCase::Camel), vec!["userId", "userId"]);
    }

    #[test]
    fn parses_setting() {
        assert_eq!("camel".parse::<ColumnCase>().unwrap(), ColumnCase::Camel);
        assert_eq!("".parse::<ColumnCase>().unwrap(), ColumnCase::Verbatim);
        assert!("kebab".parse::<ColumnCase>().is_err());
    }
}
