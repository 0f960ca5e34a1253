#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use table_query_sdk::{
    app, AppState, BinaryFormat, ColumnCase, MemoryTable, MemoryTableSource, Projection, TableGuard, TableQueryMode,
};
use tower::ServiceExt;

/// `users` (5 rows), `empty` (no rows), `blobs` (bytes and JSON), `dupes` (repeated column);
/// `secrets` exists in the store but is not allow-listed.
pub fn source() -> MemoryTableSource {
    let mut users = MemoryTable::new(["id", "name", "email", "active"]);
    for i in 1..=5 {
        users = users.row(vec![
            json!(i),
            json!(format!("user {}", i)),
            if i == 3 { Value::Null } else { json!(format!("u{}@example.com", i)) },
            json!(i % 2 == 1),
        ]);
    }
    let blobs = MemoryTable::new(["id", "payload", "doc"])
        // 0x7b2261223a317d = {"a":1}
        .row(vec![json!(1), json!("0x7b2261223a317d"), json!({"nested": [1, 2]})])
        .row(vec![json!(2), json!("0x6869"), Value::Null]);
    let dupes = MemoryTable::new(["id", "value", "value"]).row(vec![json!(1), json!("first"), json!("second")]);
    let secrets = MemoryTable::new(["id"]).row(vec![json!(1)]);
    MemoryTableSource::new([
        ("users".to_string(), users),
        ("empty".to_string(), MemoryTable::new(["id", "name"])),
        ("blobs".to_string(), blobs),
        ("dupes".to_string(), dupes),
        ("secrets".to_string(), secrets),
    ])
}

pub fn guard() -> TableGuard {
    TableGuard::new(["users", "empty", "blobs", "dupes", "ghost"]).unwrap()
}

pub fn router(source: MemoryTableSource, mode: TableQueryMode) -> Router {
    router_with(source, mode, Projection::default())
}

pub fn router_with(source: MemoryTableSource, mode: TableQueryMode, projection: Projection) -> Router {
    app(AppState::new(source, guard(), projection), mode)
}

pub fn raw_json_projection() -> Projection {
    Projection {
        column_case: ColumnCase::Verbatim,
        binary: BinaryFormat::RawJson,
    }
}

/// Send a GET and return status plus the raw body text.
pub async fn get(router: Router, uri: &str) -> (StatusCode, String) {
    let resp = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

pub async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(router, uri).await;
    (status, serde_json::from_str(&body).unwrap())
}
