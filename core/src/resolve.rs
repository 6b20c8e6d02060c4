//! Reference resolution.
//!
//! Replaces every `$ref` entry with a copy of the component option it names.
//! Resolution is fail-fast: the first reference that does not resolve aborts
//! the walk with [`SchemaError::UndefinedReference`], since the rest of the
//! tree is meaningless to generate from.
//!
//! Global options are resolved first, then the command tree depth-first in
//! lexicographic order. The walk recurses once per nesting level; command
//! trees are human-authored and rarely deeper than
//! [`LIKELY_MAX_NESTING_DEPTH`], though no limit is enforced.
//!
//! # Examples
//!
//! ```
//! use optionapi_core::*;
//!
//! let mut doc = Document::default();
//! doc.components
//!     .options
//!     .insert("Timeout", OptionSchema::new("timeout", "duration").with_default("30s"));
//! doc.commands.insert(
//!     "server",
//!     CommandSchema::new().with_reference("#/components/options/Timeout"),
//! );
//!
//! let doc = resolve_references(doc).unwrap();
//! let option = doc.commands.get("server").unwrap().options.0[0].as_option().unwrap();
//! assert_eq!(option.default.as_deref(), Some("30s"));
//! ```

use std::collections::HashMap;

use tracing::debug;

use crate::error::{Result, SchemaError};
use crate::{Document, NamedCommands, NamedOptions, OptionList, OptionOrReference, OptionSchema};

/// Typical upper bound on command nesting; used to size path buffers.
pub const LIKELY_MAX_NESTING_DEPTH: usize = 10;

type ReferenceLookup<'a> = HashMap<String, &'a OptionSchema>;

/// Resolves every reference in `document`, returning the resolved document.
///
/// # Errors
///
/// Returns [`SchemaError::UndefinedReference`] naming the first reference
/// key with no matching component.
pub fn resolve_references(mut document: Document) -> Result<Document> {
    let Document {
        options,
        commands,
        components,
        ..
    } = &mut document;

    let lookup = build_lookup(&components.options);
    let mut resolved = resolve_list(options, &lookup, &[])?;
    let mut path = Vec::with_capacity(LIKELY_MAX_NESTING_DEPTH);
    resolved += resolve_commands(commands, &lookup, &mut path)?;

    debug!(resolved, "Resolved option references");
    Ok(document)
}

fn build_lookup(components: &NamedOptions) -> ReferenceLookup<'_> {
    components
        .iter()
        .map(|(name, option)| (crate::reference_key(name), option))
        .collect()
}

fn resolve_commands(
    commands: &mut NamedCommands,
    lookup: &ReferenceLookup<'_>,
    path: &mut Vec<String>,
) -> Result<usize> {
    let mut resolved = 0;
    for (name, command) in commands.iter_mut() {
        path.push(name.clone());
        resolved += resolve_list(&mut command.options, lookup, path)?;
        resolved += resolve_commands(&mut command.commands, lookup, path)?;
        path.pop();
    }
    Ok(resolved)
}

fn resolve_list(
    options: &mut OptionList,
    lookup: &ReferenceLookup<'_>,
    path: &[String],
) -> Result<usize> {
    let mut resolved = 0;
    for entry in options.iter_mut() {
        let OptionOrReference::Reference(key) = entry else {
            continue;
        };
        let Some(option) = lookup.get(key.as_str()) else {
            return Err(SchemaError::UndefinedReference(key.clone()));
        };
        debug!(command = %path.join("."), reference = %key, "Resolved reference");
        *entry = OptionOrReference::Inline((*option).clone());
        resolved += 1;
    }
    Ok(resolved)
}
