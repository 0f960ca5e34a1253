//! Response envelopes for the table query variants.

use axum::{http::StatusCode, Json};
use serde::Serialize;

use crate::pagination::{LimitOffset, PageRequest};

#[derive(Debug, Serialize)]
pub struct PagedEnvelope<T> {
    pub page: i64,
    #[serde(rename = "perPage")]
    pub per_page: i64,
    pub total_count: i64,
    pub items: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct LimitOffsetEnvelope<T> {
    pub limit: i64,
    pub offset: i64,
    pub total_count: i64,
    pub items: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct ItemsEnvelope<T> {
    pub items: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct ItemEnvelope<T> {
    pub item: T,
}

pub fn success_page<T: Serialize>(
    page: PageRequest,
    total_count: i64,
    items: Vec<T>,
) -> (StatusCode, Json<PagedEnvelope<T>>) {
    (
        StatusCode::OK,
        Json(PagedEnvelope {
            page: page.page,
            per_page: page.per_page,
            total_count,
            items,
        }),
    )
}

pub fn success_limit_offset<T: Serialize>(
    window: LimitOffset,
    total_count: i64,
    items: Vec<T>,
) -> (StatusCode, Json<LimitOffsetEnvelope<T>>) {
    (
        StatusCode::OK,
        Json(LimitOffsetEnvelope {
            limit: window.limit,
            offset: window.offset,
            total_count,
            items,
        }),
    )
}

pub fn success_many<T: Serialize>(items: Vec<T>) -> (StatusCode, Json<ItemsEnvelope<T>>) {
    (StatusCode::OK, Json(ItemsEnvelope { items }))
}

pub fn success_one<T: Serialize>(item: T) -> (StatusCode, Json<ItemEnvelope<T>>) {
    (StatusCode::OK, Json(ItemEnvelope { item }))
}
