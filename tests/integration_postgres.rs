//! Live PostgreSQL checks. Run with `DATABASE_URL=... cargo test -- --ignored`.

use sqlx::postgres::{PgPool, PgPoolOptions};
use table_query_sdk::{
    LimitOffset, PageRequest, PgTableSource, Projection, TableQueryService, TableSource,
};

async fn pool() -> Option<PgPool> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("DATABASE_URL not set; skipping");
            return None;
        }
    };
    Some(PgPoolOptions::new().max_connections(2).connect(&url).await.expect("connect"))
}

/// Creates `table` with three rows covering text, numeric, bytea, jsonb and timestamptz.
async fn source(table: &str) -> Option<PgTableSource> {
    let pool = pool().await?;
    sqlx::query(&format!("DROP TABLE IF EXISTS {}", table)).execute(&pool).await.unwrap();
    sqlx::query(&format!(
        "CREATE TABLE {} (
            id INT PRIMARY KEY,
            label TEXT,
            price NUMERIC(10, 2),
            data BYTEA,
            meta JSONB,
            seen_at TIMESTAMPTZ
        )",
        table
    ))
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(&format!(
        "INSERT INTO {} VALUES
            (1, 'one', 12.50, '\\x7b7d', '{{\"k\": 1}}', '2024-01-02T03:04:05Z'),
            (2, NULL, -0.01, NULL, NULL, NULL),
            (3, 'three', 1000000, 'abc', '[]', NULL)",
        table
    ))
    .execute(&pool)
    .await
    .unwrap();
    Some(PgTableSource::new(pool))
}

#[tokio::test]
#[ignore]
async fn paged_query_live() {
    let Some(s) = source("tq_live_paged").await else { return };
    assert_eq!(s.count("tq_live_paged").await.unwrap(), 3);
    let out = TableQueryService::paged(
        &s,
        &Projection::default(),
        "tq_live_paged",
        PageRequest { page: 1, per_page: 2 },
    )
    .await
    .expect("paged query failed");
    assert_eq!(out.total_count, 3);
    assert!(out.items.len() <= 2);
    let names: Vec<&str> = out.items[0].names().collect();
    assert_eq!(names, vec!["id", "label", "price", "data", "meta", "seen_at"]);
}

#[tokio::test]
#[ignore]
async fn values_project_live() {
    let Some(s) = source("tq_live_values").await else { return };
    let items = TableQueryService::all(&s, &Projection::default(), "tq_live_values")
        .await
        .expect("query failed");
    let json = serde_json::to_value(&items).unwrap();
    let row = json
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["id"] == 1)
        .expect("row 1");
    assert_eq!(row["label"], "one");
    assert_eq!(row["price"], "12.50");
    assert_eq!(row["data"], "{}");
    assert_eq!(row["meta"]["k"], 1);
    assert_eq!(row["seen_at"], "2024-01-02T03:04:05+00:00");

    let row2 = json.as_array().unwrap().iter().find(|r| r["id"] == 2).expect("row 2");
    assert!(row2["label"].is_null());
    assert_eq!(row2["price"], "-0.01");
}

#[tokio::test]
#[ignore]
async fn limit_offset_live() {
    let Some(s) = source("tq_live_window").await else { return };
    let out = TableQueryService::limit_offset(
        &s,
        &Projection::default(),
        "tq_live_window",
        LimitOffset { limit: 0, offset: 0 },
    )
    .await
    .expect("query failed");
    assert_eq!(out.total_count, 3);
    assert!(out.items.is_empty());
}

#[tokio::test]
#[ignore]
async fn arrays_and_intervals_live() {
    let Some(pool) = pool().await else { return };
    for stmt in [
        "DROP TABLE IF EXISTS tq_live_extended",
        "DROP TYPE IF EXISTS tq_mood",
        "CREATE TYPE tq_mood AS ENUM ('happy', 'sad')",
        "CREATE TABLE tq_live_extended (
            id INT PRIMARY KEY,
            scores INT4[],
            tags TEXT[],
            grid INT4[][],
            wait INTERVAL,
            cost MONEY,
            opens TIMETZ,
            addr INET,
            mood tq_mood,
            spot POINT
        )",
        "INSERT INTO tq_live_extended VALUES
            (1, '{1,NULL,2}', '{a,\"b c\"}', '{{1,2},{3,4}}', '1 day 02:00:00.5',
             12.34, '10:30:00+02', '192.168.0.1', 'happy', '(1,2)')",
    ] {
        sqlx::query(stmt).execute(&pool).await.unwrap();
    }
    let s = PgTableSource::new(pool);
    let items = TableQueryService::all(&s, &Projection::default(), "tq_live_extended")
        .await
        .expect("query failed");
    let json = serde_json::to_value(&items).unwrap();
    let row = &json[0];
    assert_eq!(row["scores"], serde_json::json!([1, null, 2]));
    assert_eq!(row["tags"], serde_json::json!(["a", "b c"]));
    assert_eq!(row["wait"], "P1DT2H0.5S");
    assert_eq!(row["cost"], "12.34");
    assert_eq!(row["opens"], "10:30:00+02:00");
    assert_eq!(row["addr"], "192.168.0.1");
    assert_eq!(row["mood"], "happy");
    // No decoder: written as a hex escape, never as control characters.
    for col in ["grid", "spot"] {
        let text = row[col].as_str().expect("string");
        assert!(text.starts_with("\\x"), "{}: {}", col, text);
        assert!(!text.contains('\0'), "{}: {}", col, text);
    }
}
