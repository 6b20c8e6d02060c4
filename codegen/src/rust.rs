//! Rust source emission.
//!
//! [`RustGenerator`] turns an [`InterfacePlan`] into a single `pub mod`
//! holding the command trait, the option records, a default
//! implementation and, when enabled, a static command table.

use std::io::{self, Write};

use optionapi_core::Document;
use tracing::info;

use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::plan::{
    COMMAND_ENTRY_TYPE, CommandEntryPlan, InterfacePlan, MethodKind, MethodPlan, OptionRecord,
    record_type_name,
};
use crate::writer::CodeWriter;

/// First line of every generated file.
pub const HEADER: &str = "// Code generated by optionapi-gen. DO NOT EDIT.";

const INDENT: &str = "    ";
const RESULT_TYPE: &str = "Result<(), CommandError>";

/// Emits bindings for a resolved document.
pub trait Generator {
    /// Writes the bindings to `out` and returns the number of bytes
    /// written.
    ///
    /// # Errors
    ///
    /// Planning errors are returned before anything is written. A failed
    /// write stops generation; earlier output stays in `out`.
    fn generate(&self, document: &Document, out: &mut dyn Write) -> Result<usize>;
}

/// Generator for Rust bindings.
///
/// # Examples
///
/// ```
/// use optionapi_codegen::{Generator, GeneratorConfig, RustGenerator};
/// use optionapi_core::{CommandSchema, Document};
///
/// let mut doc = Document::default();
/// doc.commands.insert("version", CommandSchema::new());
///
/// let mut out = Vec::new();
/// let written = RustGenerator::new(GeneratorConfig::default())
///     .generate(&doc, &mut out)
///     .unwrap();
///
/// let source = String::from_utf8(out).unwrap();
/// assert_eq!(written, source.len());
/// assert!(source.contains("fn version(&self, ctx: &Context) -> Result<(), CommandError>;"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RustGenerator {
    config: GeneratorConfig,
}

impl RustGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }
}

impl Generator for RustGenerator {
    fn generate(&self, document: &Document, out: &mut dyn Write) -> Result<usize> {
        let plan = InterfacePlan::build(document, &self.config)?;
        let mut writer = CodeWriter::new(out, INDENT);
        let emission = Emission {
            config: &self.config,
            plan: &plan,
        };
        emission.module(&mut writer)?;

        let written = writer.bytes_written();
        info!(
            module = self.config.module_name(),
            methods = plan.methods.len(),
            records = plan.records.len(),
            bytes = written,
            "Generated bindings"
        );
        Ok(written)
    }
}

struct Emission<'a> {
    config: &'a GeneratorConfig,
    plan: &'a InterfacePlan,
}

impl Emission<'_> {
    fn module<W: Write>(&self, out: &mut CodeWriter<W>) -> io::Result<()> {
        out.write_2ln(HEADER)?;
        out.write_fmt_ln(format_args!("pub mod {} {{", self.config.module_name()))?;
        out.indented(|out| self.body(out))?;
        out.write_ln("}")
    }

    fn body<W: Write>(&self, out: &mut CodeWriter<W>) -> io::Result<()> {
        for import in &self.plan.imports {
            out.write_fmt_ln(format_args!("use {import};"))?;
        }
        out.blank_line()?;

        self.trait_declaration(out)?;
        out.blank_line()?;

        for record in &self.plan.records {
            self.record(out, record)?;
            out.blank_line()?;
        }

        self.default_implementation(out)?;

        if self.config.command_table {
            out.blank_line()?;
            self.command_table(out)?;
        }
        Ok(())
    }

    fn trait_declaration<W: Write>(&self, out: &mut CodeWriter<W>) -> io::Result<()> {
        out.write_fmt_ln(format_args!("pub trait {} {{", self.config.trait_name()))?;
        out.indented(|out| {
            for method in &self.plan.methods {
                doc_comment(out, method.description.as_deref())?;
                out.write_fmt_ln(format_args!("{};", signature(method, "")))?;
            }
            Ok(())
        })?;
        out.write_ln("}")
    }

    fn record<W: Write>(&self, out: &mut CodeWriter<W>, record: &OptionRecord) -> io::Result<()> {
        out.write_ln("#[derive(Debug, Clone)]")?;
        out.write_fmt_ln(format_args!("pub struct {} {{", record.type_name()))?;
        out.indented(|out| {
            if let Some(parent) = &record.parent {
                out.write_fmt_ln(format_args!("pub {}: {},", parent.field, parent.type_name()))?;
            }
            for field in &record.fields {
                doc_comment(out, field.description.as_deref())?;
                out.write_fmt_ln(format_args!("pub {}: {},", field.name, field.rust_type))?;
            }
            Ok(())
        })?;
        out.write_ln("}")
    }

    fn default_implementation<W: Write>(&self, out: &mut CodeWriter<W>) -> io::Result<()> {
        let trait_name = self.config.trait_name();
        let struct_name = self.config.struct_name();

        out.write_fmt_ln(format_args!(
            "/// Default [`{trait_name}`]: hooks succeed and commands report `CommandError::Unimplemented`."
        ))?;
        out.write_ln("#[derive(Debug, Clone, Copy, Default)]")?;
        out.write_2ln(&format!("pub struct {struct_name};"))?;

        out.write_fmt_ln(format_args!("impl {trait_name} for {struct_name} {{"))?;
        out.indented(|out| {
            for (i, method) in self.plan.methods.iter().enumerate() {
                if i > 0 {
                    out.blank_line()?;
                }
                out.write_fmt_ln(format_args!("{} {{", signature(method, "_")))?;
                out.indented(|out| match method.kind {
                    MethodKind::HookBefore | MethodKind::HookAfter => out.write_ln("Ok(())"),
                    MethodKind::Action => out.write_ln("Err(CommandError::Unimplemented)"),
                })?;
                out.write_ln("}")?;
            }
            Ok(())
        })?;
        out.write_ln("}")
    }

    fn command_table<W: Write>(&self, out: &mut CodeWriter<W>) -> io::Result<()> {
        out.write_ln("#[derive(Debug, Clone, Copy, PartialEq, Eq)]")?;
        out.write_fmt_ln(format_args!("pub struct {COMMAND_ENTRY_TYPE} {{"))?;
        out.indented(|out| {
            out.write_ln("pub path: &'static [&'static str],")?;
            out.write_ln("pub identifier: &'static str,")?;
            out.write_ln("pub method: Option<&'static str>,")?;
            out.write_ln("pub options: Option<&'static str>,")?;
            out.write_ln("pub usage: Option<&'static str>,")?;
            out.write_ln("pub description: Option<&'static str>,")?;
            out.write_ln("pub min_args: u32,")?;
            out.write_ln("pub max_args: u32,")?;
            out.write_ln("pub has_sub_commands: bool,")
        })?;
        out.write_2ln("}")?;

        if self.plan.commands.is_empty() {
            return out.write_fmt_ln(format_args!(
                "pub const COMMANDS: &[{COMMAND_ENTRY_TYPE}] = &[];"
            ));
        }
        out.write_fmt_ln(format_args!("pub const COMMANDS: &[{COMMAND_ENTRY_TYPE}] = &["))?;
        out.indented(|out| {
            for entry in &self.plan.commands {
                command_entry(out, entry)?;
            }
            Ok(())
        })?;
        out.write_ln("];")
    }
}

fn command_entry<W: Write>(out: &mut CodeWriter<W>, entry: &CommandEntryPlan) -> io::Result<()> {
    let path: Vec<String> = entry.path.iter().map(|s| literal(s)).collect();
    let options = entry.options.as_deref().map(record_type_name);

    out.write_fmt_ln(format_args!("{COMMAND_ENTRY_TYPE} {{"))?;
    out.indented(|out| {
        out.write_fmt_ln(format_args!("path: &[{}],", path.join(", ")))?;
        out.write_fmt_ln(format_args!("identifier: {},", literal(&entry.identifier)))?;
        out.write_fmt_ln(format_args!("method: {},", optional_literal(entry.method.as_deref())))?;
        out.write_fmt_ln(format_args!("options: {},", optional_literal(options.as_deref())))?;
        out.write_fmt_ln(format_args!("usage: {},", optional_literal(entry.usage.as_deref())))?;
        out.write_fmt_ln(format_args!(
            "description: {},",
            optional_literal(entry.description.as_deref())
        ))?;
        out.write_fmt_ln(format_args!("min_args: {},", entry.min_args))?;
        out.write_fmt_ln(format_args!("max_args: {},", entry.max_args))?;
        out.write_fmt_ln(format_args!("has_sub_commands: {},", entry.has_sub_commands))
    })?;
    out.write_ln("},")
}

/// Method signature without the trailing `;` or body. `prefix` is put in
/// front of every parameter name except `self`.
fn signature(method: &MethodPlan, prefix: &str) -> String {
    let mut params = format!("&self, {prefix}ctx: &Context");
    if let Some(options) = &method.options {
        params.push_str(&format!(", {prefix}opts: &{}", record_type_name(options)));
    }
    if method.kind == MethodKind::HookAfter {
        params.push_str(&format!(", {prefix}result: {RESULT_TYPE}"));
    }
    format!("fn {}({params}) -> {RESULT_TYPE}", method.name)
}

fn doc_comment<W: Write>(out: &mut CodeWriter<W>, text: Option<&str>) -> io::Result<()> {
    let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(());
    };
    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            out.write_ln("///")?;
        } else {
            out.write_fmt_ln(format_args!("/// {line}"))?;
        }
    }
    Ok(())
}

fn literal(value: &str) -> String {
    format!("{value:?}")
}

fn optional_literal(value: Option<&str>) -> String {
    match value {
        Some(value) => format!("Some({})", literal(value)),
        None => "None".to_string(),
    }
}
