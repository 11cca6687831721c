//! Shared domain error type.

/// Domain-level error used across the core crate and its consumers.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A field-level validation failure, surfaced before any artifact
    /// work begins.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// An entity lookup came up empty.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// An unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}
