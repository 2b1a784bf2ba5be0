/// Configuration management for Recipe Service
///
/// All settings come from environment variables (a `.env` file is loaded by
/// the binary before this runs).
use crate::pagination::PaginationConfig;
use db_pool::{parse_env_optional, parse_env_with_default, DbConfig};
use serde::{Deserialize, Serialize};

const SERVICE_NAME: &str = "recipe-service";
const DEV_JWT_SECRET: &str = "dev-only-recipe-service-secret-change-me";
const MIN_JWT_SECRET_LEN: usize = 32;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub cors: CorsConfig,
    pub database: DbConfig,
    pub jwt: JwtConfig,
    pub pagination: PaginationConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    pub host: String,
    pub port: u16,
    /// Apply embedded migrations on startup
    pub run_migrations: bool,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

#[derive(Clone, Deserialize)]
pub struct JwtConfig {
    /// HS256 shared secret used to verify access tokens
    pub secret: String,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let production = app_env.eq_ignore_ascii_case("production");

        let app = AppConfig {
            env: app_env,
            host: std::env::var("RECIPE_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_env_with_default("RECIPE_SERVICE_PORT", 8080),
            run_migrations: parse_env_optional::<String>("RUN_MIGRATIONS")
                .map(|v| v != "false")
                .unwrap_or(true),
        };

        let cors = {
            let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                Ok(value) => value,
                Err(_) if production => {
                    return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                }
                Err(_) => "http://localhost:3000".to_string(),
            };

            if production && allowed_origins.split(',').any(|o| o.trim() == "*") {
                return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
            }

            CorsConfig { allowed_origins }
        };

        let jwt = {
            let secret = match std::env::var("JWT_SECRET") {
                Ok(secret) => secret,
                Err(_) if production => return Err("JWT_SECRET must be set in production".to_string()),
                Err(_) => {
                    tracing::warn!("JWT_SECRET not set; using the development secret");
                    DEV_JWT_SECRET.to_string()
                }
            };

            if production && secret.len() < MIN_JWT_SECRET_LEN {
                return Err(format!(
                    "JWT_SECRET must be at least {} bytes in production",
                    MIN_JWT_SECRET_LEN
                ));
            }

            JwtConfig { secret }
        };

        Ok(Config {
            app,
            cors,
            database: DbConfig::from_env(SERVICE_NAME)?,
            jwt,
            pagination: PaginationConfig::from_env()?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.app.host, self.app.port)
    }
}
