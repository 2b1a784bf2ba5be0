/// Prometheus metrics for recipe-service
use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

lazy_static! {
    /// Favorite mutations (labels: action=add|remove, outcome=success|rejected)
    pub static ref FAVORITE_OPERATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "recipe_favorite_operations_total",
        "Total number of favorite add/remove operations",
        &["action", "outcome"]
    )
    .expect("Prometheus metrics registration should succeed at startup");

    /// Recipes created or deleted (labels: action=create|delete)
    pub static ref RECIPE_OPERATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "recipe_operations_total",
        "Total number of recipe create/delete operations",
        &["action"]
    )
    .expect("Prometheus metrics registration should succeed at startup");
}

pub fn record_favorite(action: &str, outcome: &str) {
    FAVORITE_OPERATIONS_TOTAL
        .with_label_values(&[action, outcome])
        .inc();
}

pub fn record_recipe(action: &str) {
    RECIPE_OPERATIONS_TOTAL.with_label_values(&[action]).inc();
}

/// Render every registered metric in the Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
        tracing::error!("failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
