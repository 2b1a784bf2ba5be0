/// Middleware implementations
///
/// - jwt_auth: JWT Bearer token validation and user_id extraction
/// - Request logging: handled by actix_web::middleware::Logger and TracingLogger
/// - CORS: handled by actix_cors::Cors
pub mod jwt_auth;

pub use jwt_auth::{JwtAuthMiddleware, UserId};
