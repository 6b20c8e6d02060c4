//! Structural validation of a decoded [`Document`].
//!
//! The validator walks the whole command tree and never stops early: every
//! violation is reported through the supplied [`Emitter`], scoped to the
//! path of the offending command.
//!
//! Checked at every node, the root included:
//!
//! - `minArgs` must not exceed `maxArgs`.
//! - A node with sub-commands must have `maxArgs: 0`, since sub-commands
//!   occupy the argument position.
//!
//! # Examples
//!
//! ```
//! use optionapi_core::*;
//!
//! let mut doc = Document::default();
//! doc.commands.insert("server", CommandSchema::new().with_args(3, 1));
//!
//! let errors = validate_document(&doc).unwrap_err();
//! assert_eq!(errors.field_errors()[0].to_string(), "server: minArgs must be less than maxArgs");
//! ```

use tracing::debug;

use crate::emitter::{Emitter, ErrorCollection, TrackedEmitter};
use crate::error::{Result, SchemaError};
use crate::{CommandSchema, Document, NamedCommands};

pub const MIN_GREATER_THAN_MAX: &str = "minArgs must be less than maxArgs";
pub const MAX_ARGS_WITH_SUB_COMMANDS: &str = "when sub-commands are specified, maxArgs must be 0";

/// Validates `document`, reporting every violation through `emitter`.
pub fn validate(document: &Document, emitter: &dyn Emitter) {
    validate_node(
        document.min_args,
        document.max_args,
        &document.commands,
        emitter,
    );
}

/// Validates `document` and returns every violation as one error.
///
/// # Errors
///
/// Returns [`SchemaError::Validation`] carrying all path-tagged messages
/// when at least one invariant is violated.
pub fn validate_document(document: &Document) -> Result<()> {
    let errors = ErrorCollection::new();
    let invalid = {
        let tracked = TrackedEmitter::new(&errors);
        validate(document, &tracked);
        tracked.is_invalid()
    };
    if invalid {
        let errors = errors.into_errors();
        debug!(count = errors.len(), "Validation failed");
        return Err(SchemaError::Validation(errors));
    }
    Ok(())
}

fn validate_command(command: &CommandSchema, emitter: &dyn Emitter) {
    validate_node(
        command.min_args,
        command.max_args,
        &command.commands,
        emitter,
    );
}

fn validate_node(min_args: u32, max_args: u32, commands: &NamedCommands, emitter: &dyn Emitter) {
    validate_min_max_args(min_args, max_args, emitter);
    validate_max_args_with_sub_commands(max_args, commands, emitter);
    for (name, command) in commands {
        let scoped = emitter.into_field(name);
        validate_command(command, scoped.as_ref());
    }
}

fn validate_min_max_args(min_args: u32, max_args: u32, emitter: &dyn Emitter) {
    if min_args > max_args {
        emitter.emit(MIN_GREATER_THAN_MAX);
    }
}

fn validate_max_args_with_sub_commands(
    max_args: u32,
    commands: &NamedCommands,
    emitter: &dyn Emitter,
) {
    if commands.has_any() && max_args != 0 {
        emitter.emit(MAX_ARGS_WITH_SUB_COMMANDS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldError;

    fn errors_for(document: &Document) -> Vec<FieldError> {
        match validate_document(document) {
            Ok(()) => Vec::new(),
            Err(err) => err.field_errors().to_vec(),
        }
    }

    #[test]
    fn test_root_min_greater_than_max() {
        let doc = Document {
            min_args: 3,
            max_args: 1,
            ..Document::default()
        };
        assert_eq!(
            errors_for(&doc),
            vec![FieldError::new(vec![], MIN_GREATER_THAN_MAX)]
        );
    }

    #[test]
    fn test_nested_min_greater_than_max() {
        let mut doc = Document::default();
        doc.commands.insert(
            "server",
            CommandSchema::new().with_command("start", CommandSchema::new().with_args(3, 1)),
        );
        assert_eq!(
            errors_for(&doc),
            vec![FieldError::new(
                vec!["server".into(), "start".into()],
                MIN_GREATER_THAN_MAX
            )]
        );
    }

    #[test]
    fn test_sub_commands_require_zero_max_args() {
        let mut doc = Document {
            max_args: 2,
            ..Document::default()
        };
        doc.commands.insert("server", CommandSchema::new());
        assert_eq!(
            errors_for(&doc),
            vec![FieldError::new(vec![], MAX_ARGS_WITH_SUB_COMMANDS)]
        );
    }

    #[test]
    fn test_accumulates_errors_across_tree() {
        let mut doc = Document {
            min_args: 5,
            max_args: 2,
            ..Document::default()
        };
        doc.commands
            .insert("alpha", CommandSchema::new().with_args(2, 1));
        doc.commands.insert(
            "beta",
            CommandSchema::new()
                .with_args(0, 1)
                .with_command("gamma", CommandSchema::new().with_args(4, 0)),
        );

        let messages: Vec<String> = errors_for(&doc).iter().map(|e| e.to_string()).collect();
        assert_eq!(
            messages,
            vec![
                "minArgs must be less than maxArgs",
                "when sub-commands are specified, maxArgs must be 0",
                "alpha: minArgs must be less than maxArgs",
                "beta: when sub-commands are specified, maxArgs must be 0",
                "beta.gamma: minArgs must be less than maxArgs",
            ]
        );
    }

    #[test]
    fn test_valid_document_passes() {
        let mut doc = Document::default();
        doc.commands.insert(
            "server",
            CommandSchema::new()
                .with_command("start", CommandSchema::new().with_args(1, 2))
                .with_command("stop", CommandSchema::new()),
        );
        assert!(validate_document(&doc).is_ok());
    }
}
