//! Authentication and authorization
//!
//! - [`JwtService`] - token issue/validation
//! - [`CurrentUser`] - caller context
//! - [`require_auth`] / [`require_admin`] - route middleware

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth};
pub use password::{hash_password, verify_dummy, verify_password};
