//! Example consumer: serves allow-listed PostgreSQL tables with table-query-sdk.
//!
//! Run from repo root: `cargo run -p example-consumer`
//! Settings come from the environment or `.env`, e.g.
//! `DATABASE_URL=postgres://localhost/app ALLOWED_TABLES=users,orders`.

use table_query_sdk::{app, connect, init_tracing, load_from_env, missing_tables, AppState, PgTableSource, TableGuard};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing("table_query_sdk=info,example_consumer=info,tower_http=info");

    let config = load_from_env().await?;
    let guard = TableGuard::new(config.allowed_tables.iter().cloned())?;
    let pool = connect(&config).await?;
    let missing = missing_tables(&pool, &guard).await?;
    if !missing.is_empty() {
        tracing::warn!(?missing, "some allow-listed tables are missing");
    }

    let state = AppState::new(PgTableSource::new(pool), guard, config.projection);
    let router = app(state, config.mode);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}
