//! Error types for value conversion.

use thiserror::Error;

/// Errors produced while resolving shapes or converting literals.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// No converter exists for the shape (unregistered custom key or an
    /// unsupported nesting). Detected at resolution time, never mid-parse.
    #[error("unsupported value shape: {0}")]
    UnsupportedShape(String),

    /// A converter rejected the literal text.
    #[error("invalid {shape} literal '{text}': {reason}")]
    InvalidLiteral {
        shape: String,
        text: String,
        reason: String,
    },

    /// A unique-keyed collection received a second copy of a key.
    #[error("duplicate element '{key}' in {shape}")]
    DuplicateElement { shape: String, key: String },
}

impl ConvertError {
    /// Shorthand for [`ConvertError::InvalidLiteral`].
    pub fn invalid(shape: &str, text: &str, reason: &str) -> Self {
        Self::InvalidLiteral {
            shape: shape.to_string(),
            text: text.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Convenience alias for results with [`ConvertError`].
pub type Result<T> = std::result::Result<T, ConvertError>;
