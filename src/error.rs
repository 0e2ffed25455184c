//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Converts underlying I/O, GDAL, SQLite table and JSON errors, and provides the
//! `Import` variant raised for declared-CRS import failures in strict mode.
use thiserror::Error;

use crate::types::InputKind;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GDAL error: {0}")]
    Gdal(#[from] crate::io::GdalError),

    #[error("Conversion table error: {0}")]
    Table(#[from] crate::io::TableError),

    #[error("Failed to import {kind} definition: {source}")]
    Import {
        kind: InputKind,
        #[source]
        source: crate::io::GdalError,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
