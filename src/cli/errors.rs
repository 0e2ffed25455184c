use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid log filter: {0}")]
    LogFilter(String),

    #[error(transparent)]
    Library(#[from] crscheck::Error),
}
