//! Builds the read-only COUNT and SELECT statements for an allow-listed table.

use crate::pagination::Window;

/// Quote identifier for PostgreSQL.
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// `table` or `schema.table`, each part quoted.
pub fn qualified_table(table: &str) -> String {
    match table.split_once('.') {
        Some((schema, name)) => format!("{}.{}", quoted(schema), quoted(name)),
        None => quoted(table),
    }
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<i64>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: i64) -> u32 {
        let n = self.params.len() as u32 + 1;
        self.params.push(v);
        n
    }
}

/// SELECT COUNT(*) over the whole table.
pub fn count_rows(table: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!("SELECT COUNT(*) FROM {}", qualified_table(table));
    q
}

/// SELECT * with optional LIMIT/OFFSET bound as parameters.
pub fn select_rows(table: &str, window: Option<Window>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let table = qualified_table(table);
    q.sql = match window {
        Some(w) => {
            let limit = q.push_param(w.limit);
            let offset = q.push_param(w.offset);
            format!("SELECT * FROM {} LIMIT ${} OFFSET ${}", table, limit, offset)
        }
        None => format!("SELECT * FROM {}", table),
    };
    q
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_plain_and_qualified_names() {
        assert_eq!(qualified_table("users"), "\"users\"");
        assert_eq!(qualified_table("sales.orders"), "\"sales\".\"orders\"");
        assert_eq!(qualified_table("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn count_statement() {
        let q = count_rows("users");
        assert_eq!(q.sql, "SELECT COUNT(*) FROM \"users\"");
        assert!(q.params.is_empty());
    }

    #[test]
    fn select_with_and_without_window() {
        let q = select_rows("users", Some(Window { offset: 20, limit: 10 }));
        assert_eq!(q.sql, "SELECT * FROM \"users\" LIMIT $1 OFFSET $2");
        assert_eq!(q.params, vec![10, 20]);

        let q = select_rows("users", None);
        assert_eq!(q.sql, "SELECT * FROM \"users\"");
        assert!(q.params.is_empty());
    }
}
