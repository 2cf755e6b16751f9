//! Ceylon Travels API server
//!
//! # Module layout
//!
//! ```text
//! ceylon-server/src/
//! ├── core/          # config, state, server, startup errors
//! ├── auth/          # JWT, password hashing, auth/admin middleware
//! ├── services/      # chat proxy backend, image store
//! ├── api/           # HTTP handlers, one module per resource
//! ├── routes/        # router assembly and tower-http layers
//! ├── utils/         # logging, validation helpers, error re-exports
//! └── db/            # SQLite pool, migrations, repositories
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod routes;
pub mod services;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use db::DbService;
pub use routes::build_app;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger setup
pub use utils::logger::init_logger_with_file;

/// Security event logging under the `security` target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}
