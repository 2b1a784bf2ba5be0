use actix_web::{web, HttpResponse};
use sqlx::PgPool;

const SERVICE_NAME: &str = "recipe-service";

/// Health check including a database round trip
/// GET /api/v1/health
pub async fn health_check(pool: web::Data<PgPool>) -> HttpResponse {
    let result = match db_pool::acquire_with_metrics(pool.get_ref(), SERVICE_NAME).await {
        Ok(mut conn) => sqlx::query("SELECT 1").execute(&mut *conn).await.map(|_| ()),
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": SERVICE_NAME,
            "version": env!("CARGO_PKG_VERSION"),
        })),
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "unhealthy",
                "service": SERVICE_NAME,
                "error": "database unavailable",
            }))
        }
    }
}

/// GET /api/v1/health/live
pub async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}

/// GET /metrics
pub async fn metrics_handler() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(crate::metrics::gather_metrics())
}
