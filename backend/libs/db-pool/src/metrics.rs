//! Prometheus metrics for the PostgreSQL pool
//!
//! Gauges are refreshed from a background task; acquisition latency and
//! failures are recorded by [`acquire_with_metrics`].

use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge_vec, HistogramVec,
    IntCounterVec, IntGaugeVec,
};
use sqlx::{pool::PoolConnection, PgPool, Postgres};
use std::time::Instant;

lazy_static::lazy_static! {
    /// Pool connections by state (idle/in_use/max)
    static ref POOL_CONNECTIONS: IntGaugeVec = register_int_gauge_vec!(
        "db_pool_connections",
        "PostgreSQL pool connections by state",
        &["service", "state"]
    ).expect("Prometheus metrics registration should succeed at startup");

    static ref POOL_ACQUIRE_SECONDS: HistogramVec = register_histogram_vec!(
        "db_pool_acquire_duration_seconds",
        "Time spent waiting for a pooled connection",
        &["service"],
        vec![0.001, 0.005, 0.025, 0.1, 0.5, 2.5, 10.0]
    ).expect("Prometheus metrics registration should succeed at startup");

    static ref POOL_ACQUIRE_FAILURES: IntCounterVec = register_int_counter_vec!(
        "db_pool_acquire_failures_total",
        "Failed attempts to take a connection from the pool",
        &["service", "reason"]
    ).expect("Prometheus metrics registration should succeed at startup");
}

/// Point-in-time view of a pool's occupancy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PoolStats {
    pub idle: i64,
    pub in_use: i64,
    pub max: i64,
}

impl PoolStats {
    pub fn of(pool: &PgPool) -> Self {
        let size = i64::from(pool.size());
        let idle = pool.num_idle() as i64;
        Self {
            idle,
            in_use: (size - idle).max(0),
            max: i64::from(pool.options().get_max_connections()),
        }
    }

    pub fn publish(&self, service: &str) {
        for (state, value) in [("idle", self.idle), ("in_use", self.in_use), ("max", self.max)] {
            POOL_CONNECTIONS
                .with_label_values(&[service, state])
                .set(value);
        }
    }
}

fn failure_reason(err: &sqlx::Error) -> &'static str {
    match err {
        sqlx::Error::PoolTimedOut => "timeout",
        sqlx::Error::PoolClosed => "closed",
        sqlx::Error::Io(_) => "io",
        _ => "other",
    }
}

/// `pool.acquire()` that records wait time and failures under `service`
pub async fn acquire_with_metrics(
    pool: &PgPool,
    service: &str,
) -> Result<PoolConnection<Postgres>, sqlx::Error> {
    let started = Instant::now();
    let acquired = pool.acquire().await;

    POOL_ACQUIRE_SECONDS
        .with_label_values(&[service])
        .observe(started.elapsed().as_secs_f64());

    if let Err(e) = &acquired {
        POOL_ACQUIRE_FAILURES
            .with_label_values(&[service, failure_reason(e)])
            .inc();
    }

    acquired
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_reasons() {
        assert_eq!(failure_reason(&sqlx::Error::PoolTimedOut), "timeout");
        assert_eq!(failure_reason(&sqlx::Error::PoolClosed), "closed");
        assert_eq!(failure_reason(&sqlx::Error::RowNotFound), "other");
    }

    #[test]
    fn test_publish_sets_gauges() {
        PoolStats {
            idle: 3,
            in_use: 2,
            max: 10,
        }
        .publish("db-pool-test");

        let idle = POOL_CONNECTIONS.with_label_values(&["db-pool-test", "idle"]).get();
        let max = POOL_CONNECTIONS.with_label_values(&["db-pool-test", "max"]).get();
        assert_eq!(idle, 3);
        assert_eq!(max, 10);
    }
}
