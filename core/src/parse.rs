//! Decoding and the parse pipeline.
//!
//! [`decode`] turns YAML text into a [`Document`] and nothing more. [`parse`]
//! runs the full front end: decode, validate the whole tree, then resolve
//! references. A decode failure never yields a partial document.

use std::io::Read;

use tracing::info;

use crate::error::Result;
use crate::resolve::resolve_references;
use crate::validate::validate_document;
use crate::Document;

/// Decodes a specification from `reader` without validating it.
///
/// Unknown fields are ignored and absent fields take their zero values. An
/// input holding no YAML content at all decodes as an empty document.
///
/// # Errors
///
/// Returns [`Io`](crate::SchemaError::Io) if the reader fails, or
/// [`Decode`](crate::SchemaError::Decode) if the text is not a well-formed
/// specification.
pub fn decode<R: Read>(mut reader: R) -> Result<Document> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    decode_str(&text)
}

/// Decodes a specification held in memory. See [`decode`].
///
/// # Examples
///
/// ```
/// use optionapi_core::decode_str;
///
/// let doc = decode_str("").unwrap();
/// assert_eq!(doc, Default::default());
///
/// let doc = decode_str("optionapi:\n  version: 4\n").unwrap();
/// assert_eq!(doc.option_api.version.as_deref(), Some("4"));
/// ```
pub fn decode_str(text: &str) -> Result<Document> {
    if is_blank_document(text) {
        return Ok(Document::default());
    }
    Ok(serde_yaml::from_str(text)?)
}

/// Decodes, validates and resolves a specification from `reader`.
///
/// # Errors
///
/// Fails with the first stage that fails: a decode error, a
/// [`Validation`](crate::SchemaError::Validation) error carrying every
/// violation, or an [`UndefinedReference`](crate::SchemaError::UndefinedReference).
///
/// # Examples
///
/// ```
/// use optionapi_core::{parse, SchemaError};
///
/// let yaml = "minArgs: 3\nmaxArgs: 1\n";
/// let err = parse(yaml.as_bytes()).unwrap_err();
/// assert!(matches!(err, SchemaError::Validation(ref errors) if errors.len() == 1));
/// ```
pub fn parse<R: Read>(reader: R) -> Result<Document> {
    let document = decode(reader)?;
    validate_document(&document)?;
    let document = resolve_references(document)?;
    info!(
        commands = document.commands.len(),
        components = document.components.options.len(),
        "Parsed specification"
    );
    Ok(document)
}

/// [`parse`] for a specification held in memory.
pub fn parse_str(text: &str) -> Result<Document> {
    parse(text.as_bytes())
}

// Comment-only input and bare document markers carry no content; serde_yaml
// rejects them rather than producing an empty document.
fn is_blank_document(text: &str) -> bool {
    text.lines().map(str::trim).all(|line| {
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}
