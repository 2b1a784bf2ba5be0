/// Recipe Service Library
///
/// Recipes and per-user favorites behind a paginated JSON API.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers
/// - `services`: Business logic layer
/// - `db`: Repositories and embedded migrations
/// - `pagination`: Page-number pagination and response envelope
/// - `middleware`: JWT authentication
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `metrics`: Prometheus counters
pub mod app_state;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod routes;
pub mod security;
pub mod services;

pub use app_state::AppState;
pub use config::Config;
pub use error::{AppError, Result};
