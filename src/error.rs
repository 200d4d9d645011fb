//! Error types for the sparse-agent crate

use thiserror::Error;

/// Main error type for the sparse-agent crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("action index {index} is outside the catalog (size {catalog_size})")]
    UnknownAction { index: usize, catalog_size: usize },

    #[error("unrecognised action identifier '{identifier}'")]
    UnknownActionIdentifier { identifier: String },

    #[error("table uses a different action catalog: expected {expected:?}, found {found:?}")]
    CatalogMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("row for state '{state}' has {found} estimates, expected {expected}")]
    RowWidthMismatch {
        state: String,
        expected: usize,
        found: usize,
    },

    #[error("unsupported table format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("feature map is {width}x{height} but holds {len} cells")]
    InvalidFeatureMap {
        width: usize,
        height: usize,
        len: usize,
    },

    #[error("failed to export table to {path}: {message}")]
    Persistence { path: String, message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("environment error: {message}")]
    Environment { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
