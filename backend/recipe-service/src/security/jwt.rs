/// JWT access token handling (HS256, shared secret)
///
/// Tokens are issued by the identity provider; this service only needs to
/// validate them. `generate_access_token` exists for tooling and tests.
use anyhow::{anyhow, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const ACCESS_TOKEN_TYPE: &str = "access";

const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token type: "access" or "refresh"
    pub token_type: String,
}

/// Signing and verification keys derived from one secret
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtKeys {
    pub fn from_secret(secret: &str) -> Self {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.leeway = 30;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Generate a new access token
    pub fn generate_access_token(&self, user_id: Uuid, ttl: Duration) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.encoding)
            .map_err(|e| anyhow!("Failed to generate access token: {}", e))
    }

    /// Validate and decode a token
    pub fn validate_token(&self, token: &str) -> Result<TokenData<Claims>> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| anyhow!("Token validation failed: {}", e))
    }

    /// Extract the user ID from a valid access token
    pub fn user_id_from_access_token(&self, token: &str) -> Result<Uuid> {
        let token_data = self.validate_token(token)?;
        if token_data.claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(anyhow!(
                "Expected an access token, got '{}'",
                token_data.claims.token_type
            ));
        }
        Uuid::parse_str(&token_data.claims.sub)
            .map_err(|e| anyhow!("Invalid user ID in token: {}", e))
    }
}
