/// HTTP request handlers
pub mod favorites;
pub mod health;
pub mod recipes;
pub mod users;

pub use favorites::*;
pub use health::*;
pub use recipes::*;
pub use users::*;

use crate::pagination::{Page, Paginated};
use actix_web::HttpRequest;

/// Wrap a page of results in the `{count, next, previous, results}` envelope
pub(crate) fn page_response<T>(req: &HttpRequest, page: Paginated<T>, page_query_param: &str) -> Page<T> {
    page.into_page(&req.full_url(), page_query_param)
}
