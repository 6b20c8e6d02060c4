//! Error types for the specification pipeline.
//!
//! Decoding, validation and reference resolution each fail with their own
//! variant. Validation is the only stage that accumulates: its variant
//! carries every path-tagged message found in the tree.

use thiserror::Error;

use crate::FieldError;

/// Errors that can occur while turning a specification into a [`Document`](crate::Document).
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The input stream could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input is not a well-formed specification.
    #[error("decode error: {0}")]
    Decode(#[from] serde_yaml::Error),

    /// One or more structural invariants do not hold.
    #[error("failed to validate optionapi spec")]
    Validation(Vec<FieldError>),

    /// A `$ref` points at a component that does not exist.
    #[error("undefined reference: '{0}'")]
    UndefinedReference(String),
}

impl SchemaError {
    /// The individual validation messages, if this is a validation failure.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            SchemaError::Validation(errors) => errors,
            _ => &[],
        }
    }
}

/// Convenience alias for results with [`SchemaError`].
pub type Result<T> = std::result::Result<T, SchemaError>;
