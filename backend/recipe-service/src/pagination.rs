//! Page-number pagination for list endpoints
//!
//! Clients select a page with `?<page_query_param>=N` (or `last`) and a page
//! size with `?<page_size_query_param>=M`. Responses are wrapped in [`Page`]:
//!
//! ```json
//! {"count": 42, "next": "http://host/api/v1/recipes?page=3", "previous": "http://host/api/v1/recipes", "results": [...]}
//! ```

use crate::error::{AppError, Result};
use db_pool::parse_env_with_default;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;

pub const INVALID_PAGE: &str = "Invalid page.";

/// Page value that always selects the final page
const LAST_PAGE: &str = "last";

/// Pagination settings shared by every list endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Page size used when the client does not ask for one
    pub default_page_size: u32,
    /// Hard cap on client-requested page sizes
    pub max_page_size: u32,
    /// Query parameter carrying the page number
    pub page_query_param: String,
    /// Query parameter carrying the requested page size
    pub page_size_query_param: String,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: 6,
            max_page_size: 100,
            page_query_param: "page".to_string(),
            page_size_query_param: "limit".to_string(),
        }
    }
}

impl PaginationConfig {
    pub fn from_env() -> std::result::Result<Self, String> {
        let defaults = Self::default();
        let config = Self {
            default_page_size: parse_env_with_default("PAGE_SIZE", defaults.default_page_size),
            max_page_size: parse_env_with_default("MAX_PAGE_SIZE", defaults.max_page_size),
            page_query_param: std::env::var("PAGE_QUERY_PARAM")
                .unwrap_or(defaults.page_query_param),
            page_size_query_param: std::env::var("PAGE_SIZE_QUERY_PARAM")
                .unwrap_or(defaults.page_size_query_param),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.default_page_size == 0 || self.max_page_size == 0 {
            return Err("page sizes must be greater than zero".to_string());
        }
        if self.default_page_size > self.max_page_size {
            return Err(format!(
                "PAGE_SIZE ({}) cannot exceed MAX_PAGE_SIZE ({})",
                self.default_page_size, self.max_page_size
            ));
        }
        if self.page_query_param.trim().is_empty() || self.page_size_query_param.trim().is_empty()
        {
            return Err("pagination query parameter names cannot be empty".to_string());
        }
        if self.page_query_param == self.page_size_query_param {
            return Err("page and page size query parameters must differ".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNumber {
    Number(u64),
    Last,
}

/// Page selection parsed from the query string, before the total is known
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: PageNumber,
    pub page_size: u32,
}

impl PageRequest {
    /// Parse pagination parameters from a decoded query string
    ///
    /// A page size that is missing, non-numeric or not strictly positive
    /// falls back to the default; larger sizes are capped at the maximum.
    /// A page that is not a number (and not `last`) is rejected.
    pub fn from_query(query: &HashMap<String, String>, config: &PaginationConfig) -> Result<Self> {
        let page_size = query
            .get(&config.page_size_query_param)
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|size| *size > 0)
            .map(|size| size.min(config.max_page_size))
            .unwrap_or(config.default_page_size);

        let page = match query.get(&config.page_query_param).map(|raw| raw.trim()) {
            None | Some("") => PageNumber::Number(1),
            Some(LAST_PAGE) => PageNumber::Last,
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|n| *n >= 1)
                .map(|n| PageNumber::Number(n as u64))
                .ok_or_else(|| AppError::NotFound(INVALID_PAGE.to_string()))?,
        };

        Ok(Self { page, page_size })
    }

    /// Resolve the request against the total number of rows
    ///
    /// There is always at least one page, so an empty collection still
    /// yields a valid (empty) first page.
    pub fn resolve(&self, count: u64) -> Result<PageWindow> {
        let size = u64::from(self.page_size.max(1));
        let num_pages = count.div_ceil(size).max(1);

        let number = match self.page {
            PageNumber::Last => num_pages,
            PageNumber::Number(n) if (1..=num_pages).contains(&n) => n,
            PageNumber::Number(_) => return Err(AppError::NotFound(INVALID_PAGE.to_string())),
        };

        Ok(PageWindow {
            number,
            size: self.page_size.max(1),
            num_pages,
        })
    }
}

/// A concrete page within a known total
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: u64,
    pub size: u32,
    pub num_pages: u64,
}

impl PageWindow {
    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }

    pub fn offset(&self) -> i64 {
        ((self.number - 1) * u64::from(self.size)) as i64
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }
}

/// One page of rows together with the total and the window it was read from
#[derive(Debug, Clone)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub count: u64,
    pub window: PageWindow,
}

impl<T> Paginated<T> {
    /// Render the response envelope, linking neighbours relative to `request_url`
    pub fn into_page(self, request_url: &Url, page_query_param: &str) -> Page<T> {
        let next = self.window.has_next().then(|| {
            replace_query_param(
                request_url,
                page_query_param,
                Some(&(self.window.number + 1).to_string()),
            )
        });

        let previous = self.window.has_previous().then(|| {
            let previous = self.window.number - 1;
            if previous == 1 {
                replace_query_param(request_url, page_query_param, None)
            } else {
                replace_query_param(request_url, page_query_param, Some(&previous.to_string()))
            }
        });

        Page {
            count: self.count,
            next,
            previous,
            results: self.items,
        }
    }
}

/// Paginated response envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// Set (or with `None`, remove) a query parameter, keeping the others
///
/// Parameters are emitted sorted by name so links are stable regardless of
/// the order the client used.
pub fn replace_query_param(url: &Url, key: &str, value: Option<&str>) -> String {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != key)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if let Some(value) = value {
        pairs.push((key.to_string(), value.to_string()));
    }
    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    let mut url = url.clone();
    if pairs.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(pairs.iter());
    }
    url.to_string()
}
