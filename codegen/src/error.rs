//! Error types for code generation.

use thiserror::Error;

/// Errors that can occur while generating bindings.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// An option's type tag has no Rust mapping.
    #[error("unsupported option type: \"{tag}\"")]
    UnsupportedOptionType { tag: String },

    /// An option is both required and defaulted.
    #[error("option at \"{path}\" cannot have a default value and also be required")]
    RequiredWithDefault { path: String },

    /// An option has no name to derive a field from.
    #[error("option at \"{path}\" has no name")]
    UnnamedOption { path: String },

    /// Two commands derive the same generated name.
    #[error("generated name \"{name}\" is produced by both \"{first}\" and \"{second}\"")]
    DuplicateName {
        name: String,
        first: String,
        second: String,
    },

    /// Generator configuration could not be parsed or written.
    #[error("config error: {0}")]
    Config(#[from] serde_yaml::Error),

    /// The output sink rejected a write.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for results with [`GenerateError`].
pub type Result<T> = std::result::Result<T, GenerateError>;
