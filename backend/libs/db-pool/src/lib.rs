//! Database connection pool management
//!
//! Provides PostgreSQL pool creation, migration running and pool metrics
//! for the recipe backend services.

mod env_utils;
mod metrics;

pub use env_utils::{parse_env_optional, parse_env_with_default};
pub use metrics::acquire_with_metrics;
use metrics::PoolStats;

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Upper bound applied to any configured pool size
pub const MAX_POOL_CONNECTIONS: u32 = 100;

/// Pool sizing and timeouts for one service
#[derive(Clone)]
pub struct DbConfig {
    /// Label attached to every pool metric
    pub service_name: String,
    pub database_url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Deadline for the startup probe query
    pub connect_timeout: Duration,
    /// How long a request may wait for a free connection
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("service_name", &self.service_name)
            .field("database_url", &"[REDACTED]")
            .field("connections", &(self.min_connections..=self.max_connections))
            .field("connect_timeout", &self.connect_timeout)
            .field("acquire_timeout", &self.acquire_timeout)
            .field("idle_timeout", &self.idle_timeout)
            .field("max_lifetime", &self.max_lifetime)
            .finish()
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            service_name: "unknown".to_string(),
            database_url: String::new(),
            max_connections: 20,
            min_connections: 2,
            connect_timeout: Duration::from_secs(5),
            acquire_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(1800),
        }
    }
}

fn env_secs(key: &str, default: Duration) -> Duration {
    Duration::from_secs(parse_env_with_default(key, default.as_secs()))
}

impl DbConfig {
    /// Read pool settings from `DATABASE_URL` and the `DB_*` variables
    ///
    /// Only `DATABASE_URL` is required. Pool sizes are clamped to
    /// `1..=MAX_POOL_CONNECTIONS` and the minimum never exceeds the maximum.
    pub fn from_env(service_name: &str) -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL environment variable not set".to_string())?;

        let defaults = Self::default();
        let max_connections = parse_env_with_default("DB_MAX_CONNECTIONS", defaults.max_connections)
            .clamp(1, MAX_POOL_CONNECTIONS);
        let min_connections =
            parse_env_with_default("DB_MIN_CONNECTIONS", defaults.min_connections).min(max_connections);

        Ok(Self {
            service_name: service_name.to_string(),
            database_url,
            max_connections,
            min_connections,
            connect_timeout: env_secs("DB_CONNECT_TIMEOUT_SECS", defaults.connect_timeout),
            acquire_timeout: env_secs("DB_ACQUIRE_TIMEOUT_SECS", defaults.acquire_timeout),
            idle_timeout: env_secs("DB_IDLE_TIMEOUT_SECS", defaults.idle_timeout),
            max_lifetime: env_secs("DB_MAX_LIFETIME_SECS", defaults.max_lifetime),
        })
    }

    pub fn log_config(&self) {
        info!(
            service = %self.service_name,
            max_connections = self.max_connections,
            min_connections = self.min_connections,
            acquire_timeout_secs = self.acquire_timeout.as_secs(),
            idle_timeout_secs = self.idle_timeout.as_secs(),
            max_lifetime_secs = self.max_lifetime.as_secs(),
            "database pool configuration"
        );
    }
}

/// Interval between pool gauge refreshes
const STATS_INTERVAL: Duration = Duration::from_secs(30);

/// Build the pool, check it answers a query, then start publishing gauges
pub async fn create_pool(config: DbConfig) -> Result<PgPool, sqlx::Error> {
    debug!(service = %config.service_name, ?config, "creating database pool");

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .max_lifetime(config.max_lifetime)
        .test_before_acquire(true)
        .connect(&config.database_url)
        .await?;

    verify_pool(&pool, &config).await?;
    info!(service = %config.service_name, "database pool ready");

    spawn_stats_publisher(pool.clone(), config.service_name);
    Ok(pool)
}

async fn verify_pool(pool: &PgPool, config: &DbConfig) -> Result<(), sqlx::Error> {
    let probe = sqlx::query("SELECT 1").execute(pool);
    match tokio::time::timeout(config.connect_timeout, probe).await {
        Ok(Ok(_)) => Ok(()),
        Ok(Err(e)) => {
            error!(service = %config.service_name, error = %e, "database probe failed");
            Err(e)
        }
        Err(_) => {
            error!(
                service = %config.service_name,
                timeout_secs = config.connect_timeout.as_secs(),
                "database probe timed out"
            );
            Err(sqlx::Error::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "database probe timed out",
            )))
        }
    }
}

/// Publish pool gauges until the pool is closed
fn spawn_stats_publisher(pool: PgPool, service: String) {
    PoolStats::of(&pool).publish(&service);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(STATS_INTERVAL);
        loop {
            ticker.tick().await;
            if pool.is_closed() {
                warn!(service = %service, "pool closed, stopping stats publisher");
                break;
            }
            PoolStats::of(&pool).publish(&service);
        }
    });
}

/// Apply the given embedded migrations
///
/// The migrator is built by the calling crate with `sqlx::migrate!` so the
/// migration directory stays next to the service that owns the schema.
pub async fn run_migrations(pool: &PgPool, migrator: &Migrator) -> Result<(), MigrateError> {
    debug!("Running {} database migrations", migrator.iter().count());

    migrator.run(pool).await?;

    info!("Database migrations completed successfully");
    Ok(())
}
