//! Rust binding generator for optionapi CLI specifications.
//!
//! Given a parsed, validated and resolved [`Document`], this crate emits a
//! Rust module containing:
//!
//! - a trait with before/after hooks for the root and every branch command
//!   and one action method per leaf command,
//! - an option record per command that declares options, embedding the
//!   record of its nearest ancestor,
//! - a default implementation whose commands report "not implemented".
//!
//! Naming is deterministic: sibling commands are emitted in lexicographic
//! order, so the same document always produces the same bytes.
//!
//! # Example
//!
//! ```
//! use optionapi_codegen::{GeneratorConfig, generate_to_string};
//!
//! let doc = optionapi_core::parse_str(
//!     r#"
//! commands:
//!   server:
//!     options:
//!       - name: port
//!         type: uint16
//!         default: 8080
//!     commands:
//!       start: {}
//! "#,
//! )
//! .unwrap();
//!
//! let source = generate_to_string(&doc, &GeneratorConfig::default()).unwrap();
//! assert!(source.contains("pub struct ServerOptions {"));
//! assert!(source.contains("pub port: u16,"));
//! assert!(source.contains("fn server_start(&self, ctx: &Context, opts: &ServerOptions)"));
//! ```

mod config;
mod error;
pub mod naming;
mod option_types;
mod plan;
mod rust;
mod walk;
mod writer;

use optionapi_core::Document;

pub use config::{
    DEFAULT_GLOBAL_OPTIONS_NAME, DEFAULT_MODULE_NAME, DEFAULT_RUNTIME_CRATE, DEFAULT_STRUCT_NAME,
    DEFAULT_TRAIT_NAME, GeneratorConfig,
};
pub use error::{GenerateError, Result};
pub use option_types::{FieldKind, FieldType, ScalarType, field_kind, field_type};
pub use plan::{
    COMMAND_ENTRY_TYPE, CommandEntryPlan, EmbeddedRecord, InterfacePlan, MethodKind, MethodPlan,
    OptionRecord, RecordField,
};
pub use rust::{Generator, HEADER, RustGenerator};
pub use walk::walk_commands;
pub use writer::{ByteCounter, CodeWriter};

/// Generates Rust bindings for `document` into a string.
///
/// # Errors
///
/// See [`Generator::generate`].
pub fn generate_to_string(document: &Document, config: &GeneratorConfig) -> Result<String> {
    let mut buf = Vec::new();
    RustGenerator::new(config.clone()).generate(document, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
