//! Error types for resource construction and schema loading.

use thiserror::Error;

/// Errors raised while building resources or their supporting registries.
#[derive(Debug, Error)]
pub enum Error {
    /// A raw resource carried no usable identifier
    #[error("{ty} resource has no id attribute")]
    MissingId {
        /// Resource type being deserialized
        ty: String,
    },

    /// A raw resource was not an attribute object
    #[error("{ty} resource must be an object, got {found}")]
    NotAnObject {
        /// Resource type being deserialized
        ty: String,
        /// JSON kind that was found instead
        found: &'static str,
    },

    /// Schemas for this provider were already registered
    #[error("provider {provider} is already initialized at version {version}")]
    ProviderAlreadyInitialized {
        /// Provider name
        provider: String,
        /// Version it was initialized with
        version: String,
    },

    /// The schema document does not describe the requested provider
    #[error("provider {provider} not found in schema document")]
    ProviderNotInSchema {
        /// Provider name
        provider: String,
    },

    /// Invalid line in an ignore file
    #[error("invalid ignore rule on line {line}: {message}")]
    IgnoreRule {
        /// Line number (1-indexed)
        line: usize,
        /// What is wrong with it
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for resource operations.
pub type Result<T> = std::result::Result<T, Error>;
