//! Error types for catalog loading

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that prevent a catalog source from being read at all.
///
/// Individual malformed items are not errors; the loader skips them
/// and counts them in [`crate::catalog::LoadStats`].
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Catalog must be an array of items or an object with an \"items\" array")]
    UnexpectedShape,

    #[error("Failed to walk catalog directory {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

pub type CatalogResult<T> = Result<T, CatalogError>;
