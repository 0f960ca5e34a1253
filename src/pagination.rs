//! Page/perPage and limit/offset query parameters to a bounded offset + limit window.
//!
//! Malformed input never fails a request: it is corrected to defaults and logged.

use std::collections::HashMap;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PER_PAGE: i64 = 10;
pub const MAX_PER_PAGE: i64 = 1000;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 1000;
/// Limit used when either limit or offset fails to parse.
pub const FALLBACK_LIMIT: i64 = 1;

/// Rows to skip and rows to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: i64,
    pub limit: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    pub fn from_query(params: &HashMap<String, String>) -> Self {
        let page = match param(params, "page").map(str::parse::<i64>) {
            None => DEFAULT_PAGE,
            Some(Ok(p)) if p >= 1 => p,
            Some(Ok(p)) => {
                tracing::warn!(page = p, "page below 1, using {}", DEFAULT_PAGE);
                DEFAULT_PAGE
            }
            Some(Err(e)) => {
                tracing::warn!(error = %e, "invalid page, using {}", DEFAULT_PAGE);
                DEFAULT_PAGE
            }
        };
        let per_page = match param(params, "perPage").map(str::parse::<i64>) {
            None => DEFAULT_PER_PAGE,
            Some(Ok(pp)) if pp >= 1 => pp.min(MAX_PER_PAGE),
            Some(Ok(pp)) => {
                tracing::warn!(per_page = pp, "perPage below 1, using {}", DEFAULT_PER_PAGE);
                DEFAULT_PER_PAGE
            }
            Some(Err(e)) => {
                tracing::warn!(error = %e, "invalid perPage, using {}", DEFAULT_PER_PAGE);
                DEFAULT_PER_PAGE
            }
        };
        PageRequest { page, per_page }
    }

    pub fn window(&self) -> Window {
        Window {
            offset: (self.page - 1).saturating_mul(self.per_page),
            limit: self.per_page,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitOffset {
    pub limit: i64,
    pub offset: i64,
}

impl LimitOffset {
    /// A parse failure on either parameter drops the limit to [`FALLBACK_LIMIT`]
    /// while the offset keeps whatever parsed (or its default).
    pub fn from_query(params: &HashMap<String, String>) -> Self {
        let mut limit = DEFAULT_LIMIT;
        let mut offset = 0;
        let mut malformed = false;
        if let Some(l) = param(params, "limit") {
            match l.parse::<i64>() {
                Ok(n) => limit = n,
                Err(e) => {
                    tracing::warn!(error = %e, "invalid limit");
                    malformed = true;
                }
            }
        }
        if let Some(o) = param(params, "offset") {
            match o.parse::<i64>() {
                Ok(n) => offset = n,
                Err(e) => {
                    tracing::warn!(error = %e, "invalid offset");
                    malformed = true;
                }
            }
        }
        if malformed {
            limit = FALLBACK_LIMIT;
        }
        LimitOffset {
            limit: limit.clamp(0, MAX_LIMIT),
            offset: offset.max(0),
        }
    }

    pub fn window(&self) -> Window {
        Window {
            offset: self.offset,
            limit: self.limit,
        }
    }
}

impl Default for LimitOffset {
    fn default() -> Self {
        LimitOffset {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// Empty values count as absent.
fn param<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    params.get(key).map(String::as_str).filter(|v| !v.is_empty())
}
