//! Table query handlers: paged, limit/offset, first row, and unpaged.
//!
//! Each resolves the table through the allow-list before any statement runs. An empty
//! name never passes the allow-list, so `missing_table` always answers not found.

use crate::error::AppError;
use crate::pagination::{LimitOffset, PageRequest};
use crate::response::{success_limit_offset, success_many, success_one, success_page};
use crate::service::TableQueryService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use std::collections::HashMap;

/// GET /table/:table?page=&perPage=
pub async fn list_paged(
    State(state): State<AppState>,
    Path(table): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let table = state.guard.check(&table)?;
    let page = PageRequest::from_query(&params);
    let out = TableQueryService::paged(state.source.as_ref(), &state.projection, table, page).await?;
    Ok(success_page(page, out.total_count, out.items))
}

/// GET /table/:table?limit=&offset=
pub async fn list_limit_offset(
    State(state): State<AppState>,
    Path(table): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let table = state.guard.check(&table)?;
    let window = LimitOffset::from_query(&params);
    let out = TableQueryService::limit_offset(state.source.as_ref(), &state.projection, table, window).await?;
    Ok(success_limit_offset(window, out.total_count, out.items))
}

/// GET /table/:table, first row only.
pub async fn first_row(
    State(state): State<AppState>,
    Path(table): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let table = state.guard.check(&table)?;
    let record = TableQueryService::first(state.source.as_ref(), &state.projection, table).await?;
    Ok(success_one(record))
}

/// GET /table/:table, every row.
pub async fn list_all(
    State(state): State<AppState>,
    Path(table): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let table = state.guard.check(&table)?;
    let records = TableQueryService::all(state.source.as_ref(), &state.projection, table).await?;
    Ok(success_many(records))
}

/// GET /table/ with no table name.
pub async fn missing_table(State(state): State<AppState>) -> Result<(), AppError> {
    state.guard.check("").map(|_| ())
}
