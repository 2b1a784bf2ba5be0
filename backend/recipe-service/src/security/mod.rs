/// Security utilities (JWT handling)
pub mod jwt;

pub use jwt::{Claims, JwtKeys};
