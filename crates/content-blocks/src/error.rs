//! Registry error types.

use thiserror::Error;

use crate::block::ValidationErrors;

/// Errors raised while registering content blocks.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Two modules claimed the same block name.
    #[error("There's a block already registered with the name '{name}', must be unique")]
    ContentBlockAlreadyRegistered { name: String },

    /// The setup closure left the block in an invalid state (strict mode only).
    #[error("content block '{name}' is invalid: {errors}")]
    InvalidContentBlock {
        name: String,
        errors: ValidationErrors,
    },

    #[error("failed to serialize content blocks")]
    Serialize(#[from] serde_json::Error),
}

impl RegistryError {
    /// Create an already-registered error.
    pub fn already_registered(name: impl Into<String>) -> Self {
        Self::ContentBlockAlreadyRegistered { name: name.into() }
    }
}

/// Result type alias using RegistryError.
pub type RegistryResult<T> = Result<T, RegistryError>;
