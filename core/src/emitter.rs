//! Path-tracked error collection.
//!
//! Validation reports problems through an [`Emitter`]. Descending into a
//! named child with [`Emitter::into_field`] yields a scoped emitter whose
//! messages carry that child's path, so every collected [`FieldError`] says
//! where it came from.
//!
//! [`TrackedEmitter`] wraps another emitter and records whether anything
//! failed. Each scope keeps its own flag and also marks the flag of the root
//! it was derived from, so a root reports failures from anywhere below it
//! while sibling scopes never see each other's errors.
//!
//! # Examples
//!
//! ```
//! use optionapi_core::{Emitter, ErrorCollection, TrackedEmitter};
//!
//! let errors = ErrorCollection::new();
//! {
//!     let tracked = TrackedEmitter::new(&errors);
//!     let server = tracked.into_field("server");
//!     server.into_field("start").emit("minArgs must be less than maxArgs");
//!     assert!(tracked.is_invalid());
//! }
//!
//! let collected = errors.into_errors();
//! assert_eq!(collected[0].path, vec!["server", "start"]);
//! assert_eq!(collected[0].to_string(), "server.start: minArgs must be less than maxArgs");
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;

/// Sink for validation messages.
pub trait Emitter {
    /// Reports a problem at this emitter's path.
    fn emit(&self, message: &str);

    /// Returns an emitter scoped to the named child field.
    fn into_field<'a>(&'a self, field: &str) -> Box<dyn Emitter + 'a>;
}

impl<E: Emitter + ?Sized> Emitter for &E {
    fn emit(&self, message: &str) {
        (**self).emit(message)
    }

    fn into_field<'a>(&'a self, field: &str) -> Box<dyn Emitter + 'a> {
        (**self).into_field(field)
    }
}

/// A single validation message and the path of the node that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field names from the root to the offending node; empty for the root.
    pub path: Vec<String>,
    pub message: String,
}

impl FieldError {
    pub fn new(path: Vec<String>, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }

    /// The dotted form of [`path`](Self::path).
    pub fn dotted_path(&self) -> String {
        self.path.join(".")
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.dotted_path(), self.message)
        }
    }
}

/// Collects every emitted message in emission order.
#[derive(Debug, Default)]
pub struct ErrorCollection {
    errors: RefCell<Vec<FieldError>>,
}

impl ErrorCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.borrow().is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.borrow().len()
    }

    /// Returns a copy of the collected errors.
    pub fn errors(&self) -> Vec<FieldError> {
        self.errors.borrow().clone()
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors.into_inner()
    }

    fn push(&self, path: &[String], message: &str) {
        self.errors
            .borrow_mut()
            .push(FieldError::new(path.to_vec(), message));
    }
}

impl Emitter for ErrorCollection {
    fn emit(&self, message: &str) {
        self.push(&[], message);
    }

    fn into_field<'a>(&'a self, field: &str) -> Box<dyn Emitter + 'a> {
        Box::new(CollectionScope {
            collection: self,
            path: vec![field.to_string()],
        })
    }
}

struct CollectionScope<'a> {
    collection: &'a ErrorCollection,
    path: Vec<String>,
}

impl Emitter for CollectionScope<'_> {
    fn emit(&self, message: &str) {
        self.collection.push(&self.path, message);
    }

    fn into_field<'a>(&'a self, field: &str) -> Box<dyn Emitter + 'a> {
        let mut path = self.path.clone();
        path.push(field.to_string());
        Box::new(CollectionScope {
            collection: self.collection,
            path,
        })
    }
}

/// Emitter wrapper that remembers whether anything failed.
pub struct TrackedEmitter<'a> {
    failed: Cell<bool>,
    root: Option<&'a Cell<bool>>,
    wrapped: Box<dyn Emitter + 'a>,
}

impl<'a> TrackedEmitter<'a> {
    /// Starts a new root scope around `emitter`.
    pub fn new(emitter: &'a dyn Emitter) -> Self {
        Self {
            failed: Cell::new(false),
            root: None,
            wrapped: Box::new(emitter),
        }
    }

    /// `true` when this scope, or for a root scope anything beneath it,
    /// emitted at least one message.
    pub fn is_invalid(&self) -> bool {
        self.failed.get()
    }

    fn root_flag(&self) -> &Cell<bool> {
        self.root.unwrap_or(&self.failed)
    }
}

impl Emitter for TrackedEmitter<'_> {
    fn emit(&self, message: &str) {
        self.failed.set(true);
        self.root_flag().set(true);
        self.wrapped.emit(message);
    }

    fn into_field<'b>(&'b self, field: &str) -> Box<dyn Emitter + 'b> {
        Box::new(TrackedEmitter {
            failed: Cell::new(false),
            root: Some(self.root_flag()),
            wrapped: self.wrapped.into_field(field),
        })
    }
}
