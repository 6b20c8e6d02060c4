//! Specification model and front end for optionapi CLI specifications.
//!
//! An optionapi specification declares global options, a tree of named
//! commands and reusable option components. This crate handles everything
//! up to code generation:
//!
//! - [`Document`], [`CommandSchema`], [`OptionSchema`] and
//!   [`OptionOrReference`] model the specification.
//! - [`decode`] reads YAML into a [`Document`].
//! - [`validate`] checks argument bounds across the whole tree, reporting
//!   through a path-tracked [`Emitter`].
//! - [`resolve_references`] replaces `$ref` entries with copies of the
//!   component options they name.
//! - [`parse`] runs all three in order.
//!
//! # Example
//!
//! ```
//! use optionapi_core::*;
//!
//! let yaml = r##"
//! optionapi:
//!   version: 1
//! commands:
//!   server:
//!     commands:
//!       start:
//!         options:
//!           - $ref: "#/components/options/Port"
//!         maxArgs: 1
//! components:
//!   options:
//!     Port:
//!       name: port
//!       type: uint16
//!       default: 8080
//! "##;
//!
//! let doc = parse_str(yaml).unwrap();
//! let start = doc.commands.get("server").unwrap().commands.get("start").unwrap();
//! let port = start.options.0[0].as_option().unwrap();
//! assert_eq!(port.name, "port");
//! assert_eq!(port.default.as_deref(), Some("8080"));
//! ```

mod emitter;
mod error;
mod parse;
mod resolve;
mod types;
mod validate;

pub use emitter::{Emitter, ErrorCollection, FieldError, TrackedEmitter};
pub use error::{Result, SchemaError};
pub use parse::{decode, decode_str, parse, parse_str};
pub use resolve::{LIKELY_MAX_NESTING_DEPTH, resolve_references};
pub use types::*;
pub use validate::{
    MAX_ARGS_WITH_SUB_COMMANDS, MIN_GREATER_THAN_MAX, validate, validate_document,
};
