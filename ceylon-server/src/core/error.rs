//! Startup errors
//!
//! Request handlers use [`crate::utils::AppError`]; this type only covers
//! what can stop the process from coming up.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Chat backend error: {0}")]
    Chat(#[from] crate::services::ChatError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<crate::utils::AppError> for ServerError {
    fn from(err: crate::utils::AppError) -> Self {
        ServerError::Database(err.message)
    }
}

impl From<crate::db::repository::RepoError> for ServerError {
    fn from(err: crate::db::repository::RepoError) -> Self {
        ServerError::Database(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
