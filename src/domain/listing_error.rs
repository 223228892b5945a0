use std::path::PathBuf;
use thiserror::Error;

/// Per-query failures of the listing engine.
#[derive(Debug, Error, PartialEq)]
pub enum ListingError {
    #[error("listing {0} not found")]
    NotFound(i64),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// The listing source could not be turned into a collection.
/// Fatal at startup; a failed reload keeps the previous collection.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("listings file {} does not exist", .0.display())]
    Missing(PathBuf),
    #[error("failed to read listings file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse listings file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("store was built from fixtures and has no source to reload")]
    NoSource,
}
