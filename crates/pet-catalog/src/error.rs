//! Error types for catalog loading and lookup.

/// Errors produced by the model catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("model not found: {0}")]
    ModelNotFound(String),

    #[error("catalog has no models")]
    Empty,

    #[error("duplicate model key: {0}")]
    DuplicateKey(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
