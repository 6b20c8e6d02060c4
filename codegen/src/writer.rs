//! Indentation-aware text sink.
//!
//! [`CodeWriter`] wraps any [`Write`] stream, prefixes every line with the
//! current indentation and counts the bytes that reached the stream. The
//! first failed write is returned to the caller; whatever was written
//! before it stays written.
//!
//! # Examples
//!
//! ```
//! use optionapi_codegen::CodeWriter;
//!
//! let mut buf = Vec::new();
//! let mut out = CodeWriter::new(&mut buf, "    ");
//! out.write_ln("mod a {").unwrap();
//! out.indented(|out| out.write_ln("fn f() {}")).unwrap();
//! out.write_ln("}").unwrap();
//! let written = out.bytes_written();
//!
//! assert_eq!(String::from_utf8(buf).unwrap(), "mod a {\n    fn f() {}\n}\n");
//! assert_eq!(written, 24);
//! ```

use std::fmt;
use std::io::{self, Write};

/// Running total of bytes successfully written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ByteCounter {
    written: usize,
}

impl ByteCounter {
    /// Adds `bytes` on success and passes any error through unchanged.
    pub fn record(&mut self, bytes: usize, result: io::Result<()>) -> io::Result<()> {
        result?;
        self.written += bytes;
        Ok(())
    }

    pub fn count(&self) -> usize {
        self.written
    }
}

/// Line-oriented writer with nested indentation.
pub struct CodeWriter<W: Write> {
    stream: W,
    indent: String,
    level: usize,
    cached_indent: String,
    counter: ByteCounter,
}

impl<W: Write> CodeWriter<W> {
    /// Creates a writer that indents each level with `indent`.
    pub fn new(stream: W, indent: &str) -> Self {
        Self {
            stream,
            indent: indent.to_string(),
            level: 0,
            cached_indent: String::new(),
            counter: ByteCounter::default(),
        }
    }

    /// Writes `text` after the current indentation, without a newline.
    pub fn write(&mut self, text: &str) -> io::Result<()> {
        let line = format!("{}{}", self.cached_indent, text);
        self.write_raw(&line)
    }

    /// Writes one indented line. Empty lines are written without
    /// indentation.
    pub fn write_ln(&mut self, line: &str) -> io::Result<()> {
        if line.is_empty() {
            return self.write_raw("\n");
        }
        let line = format!("{}{}\n", self.cached_indent, line);
        self.write_raw(&line)
    }

    /// Writes one indented line followed by a blank line.
    pub fn write_2ln(&mut self, line: &str) -> io::Result<()> {
        self.write_ln(line)?;
        self.write_raw("\n")
    }

    /// Writes a formatted, indented line.
    pub fn write_fmt_ln(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        self.write_ln(&args.to_string())
    }

    /// Writes a blank line.
    pub fn blank_line(&mut self) -> io::Result<()> {
        self.write_raw("\n")
    }

    /// Runs `body` one indentation level deeper. The level is restored
    /// even when `body` fails.
    pub fn indented<F>(&mut self, body: F) -> io::Result<()>
    where
        F: FnOnce(&mut Self) -> io::Result<()>,
    {
        self.set_level(self.level + 1);
        let result = body(self);
        self.set_level(self.level - 1);
        result
    }

    /// Total bytes written to the underlying stream so far.
    pub fn bytes_written(&self) -> usize {
        self.counter.count()
    }

    /// Current indentation depth.
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn into_inner(self) -> W {
        self.stream
    }

    fn set_level(&mut self, level: usize) {
        self.level = level;
        self.cached_indent = self.indent.repeat(level);
    }

    fn write_raw(&mut self, text: &str) -> io::Result<()> {
        let result = self.stream.write_all(text.as_bytes());
        self.counter.record(text.len(), result)
    }
}
