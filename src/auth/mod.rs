//! Token validation and role gating. Account/session management lives in an
//! external identity service; only the verification side exists here.

pub mod jwt;
pub mod middleware;
pub mod models;

pub use jwt::JwtHandler;
pub use middleware::{auth_middleware, require_admin, AuthError};
pub use models::{Claims, Role};
