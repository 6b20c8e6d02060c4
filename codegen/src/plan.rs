//! Generation plan.
//!
//! [`InterfacePlan::build`] walks a resolved [`Document`] once and decides
//! every name, signature, option record and import before any text is
//! written. Type and naming errors therefore surface before the output
//! sink sees a single byte.
//!
//! Option records follow the command path. A command that declares options
//! gets its own record, which embeds the record of its nearest ancestor
//! (falling back to the global record) as its first field. A command
//! without options takes the nearest ancestor's record, then the global
//! record, then no options parameter at all.

use std::collections::{BTreeSet, HashMap};

use optionapi_core::{CommandSchema, Document, OptionList};
use tracing::debug;

use crate::config::GeneratorConfig;
use crate::error::{GenerateError, Result};
use crate::naming::{field_name, method_name, node_identifier};
use crate::option_types::{field_type, option_path};
use crate::walk::walk_commands;

/// Name of the generated command table entry type.
pub const COMMAND_ENTRY_TYPE: &str = "CommandEntry";

/// One field of an option record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordField {
    /// Rust field name.
    pub name: String,
    /// Option name as written in the specification.
    pub option_name: String,
    pub rust_type: String,
    pub description: Option<String>,
}

/// A generated option record (`<identifier>Options`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionRecord {
    pub identifier: String,
    /// The ancestor record embedded as the first field.
    pub parent: Option<EmbeddedRecord>,
    pub fields: Vec<RecordField>,
}

/// A record embedded in a descendant's record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedRecord {
    pub identifier: String,
    /// Field name the descendant stores it under.
    pub field: String,
}

impl EmbeddedRecord {
    pub fn type_name(&self) -> String {
        record_type_name(&self.identifier)
    }
}

impl OptionRecord {
    pub fn type_name(&self) -> String {
        record_type_name(&self.identifier)
    }
}

/// Type name of the record with the given identifier.
pub fn record_type_name(identifier: &str) -> String {
    format!("{identifier}Options")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    HookBefore,
    HookAfter,
    Action,
}

/// One trait method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodPlan {
    pub name: String,
    pub kind: MethodKind,
    /// Identifier of the option record passed to the method.
    pub options: Option<String>,
    pub description: Option<String>,
}

/// Metadata for one command, emitted in the command table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEntryPlan {
    pub path: Vec<String>,
    pub identifier: String,
    /// Action method for leaves; `None` for branches.
    pub method: Option<String>,
    pub options: Option<String>,
    pub usage: Option<String>,
    pub description: Option<String>,
    pub min_args: u32,
    pub max_args: u32,
    pub has_sub_commands: bool,
}

/// Everything needed to emit the bindings for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfacePlan {
    /// Fully-qualified paths to import, sorted and deduplicated.
    pub imports: BTreeSet<String>,
    pub methods: Vec<MethodPlan>,
    /// Records in emission order: global first, then walk order.
    pub records: Vec<OptionRecord>,
    pub commands: Vec<CommandEntryPlan>,
}

impl InterfacePlan {
    /// Plans the bindings for a resolved document.
    ///
    /// # Errors
    ///
    /// Returns the first type, naming or option error found.
    pub fn build(document: &Document, config: &GeneratorConfig) -> Result<Self> {
        let mut planner = Planner::new(config);

        if document.options.has_any() {
            let identifier = config.global_options_name().to_string();
            planner.add_record(&identifier, None, &document.options, &[], "global options")?;
            planner.global = Some(EmbeddedRecord {
                field: field_name(&identifier),
                identifier,
            });
        }
        let global = planner.global.as_ref().map(|g| g.identifier.clone());
        planner.add_hooks(&[], global, None, "root")?;

        walk_commands(&document.commands, &mut |path, command| {
            planner.visit(path, command)
        })?;

        debug!(
            methods = planner.plan.methods.len(),
            records = planner.plan.records.len(),
            imports = planner.plan.imports.len(),
            "Planned bindings"
        );
        Ok(planner.plan)
    }

    /// Looks up a planned record by identifier.
    pub fn record(&self, identifier: &str) -> Option<&OptionRecord> {
        self.records.iter().find(|r| r.identifier == identifier)
    }
}

struct Planner<'c> {
    config: &'c GeneratorConfig,
    plan: InterfacePlan,
    global: Option<EmbeddedRecord>,
    // command records keyed by command path
    command_records: HashMap<Vec<String>, EmbeddedRecord>,
    type_names: HashMap<String, String>,
    method_names: HashMap<String, String>,
}

impl<'c> Planner<'c> {
    fn new(config: &'c GeneratorConfig) -> Self {
        let runtime = config.runtime_crate();
        let mut plan = InterfacePlan::default();
        plan.imports.insert(format!("{runtime}::CommandError"));
        plan.imports.insert(format!("{runtime}::Context"));

        let mut type_names = HashMap::new();
        type_names.insert(config.trait_name().to_string(), "trait name".to_string());
        type_names.insert(config.struct_name().to_string(), "struct name".to_string());
        if config.command_table {
            type_names.insert(COMMAND_ENTRY_TYPE.to_string(), "command table".to_string());
        }

        Self {
            config,
            plan,
            global: None,
            command_records: HashMap::new(),
            type_names,
            method_names: HashMap::new(),
        }
    }

    fn visit(&mut self, path: &[&str], command: &CommandSchema) -> Result<()> {
        let identifier = node_identifier(path);
        let owner = path.join(" ");
        let ancestor = self.ancestor_record(path);

        let options = if command.options.has_any() {
            self.add_record(&identifier, ancestor, &command.options, path, &owner)?;
            self.command_records.insert(
                path.iter().map(|s| s.to_string()).collect(),
                EmbeddedRecord {
                    identifier: identifier.clone(),
                    field: method_name(path, None),
                },
            );
            Some(identifier.clone())
        } else {
            ancestor.map(|a| a.identifier)
        };

        let description = command.description.clone().or(command.usage.clone());
        let method = if command.is_branch() {
            self.add_hooks(path, options.clone(), description, &owner)?;
            None
        } else {
            let name = method_name(path, None);
            self.add_method(
                MethodPlan {
                    name: name.clone(),
                    kind: MethodKind::Action,
                    options: options.clone(),
                    description,
                },
                &owner,
            )?;
            Some(name)
        };

        debug!(command = %owner, %identifier, options = ?options, "Planned command");

        if self.config.command_table {
            self.plan.commands.push(CommandEntryPlan {
                path: path.iter().map(|s| s.to_string()).collect(),
                identifier,
                method,
                options,
                usage: command.usage.clone(),
                description: command.description.clone(),
                min_args: command.min_args,
                max_args: command.max_args,
                has_sub_commands: command.is_branch(),
            });
        }
        Ok(())
    }

    // Nearest proper prefix of `path` with its own record, else the global
    // record.
    fn ancestor_record(&self, path: &[&str]) -> Option<EmbeddedRecord> {
        (1..path.len())
            .rev()
            .find_map(|len| {
                let prefix: Vec<String> = path[..len].iter().map(|s| s.to_string()).collect();
                self.command_records.get(&prefix)
            })
            .or(self.global.as_ref())
            .cloned()
    }

    fn add_hooks(
        &mut self,
        path: &[&str],
        options: Option<String>,
        description: Option<String>,
        owner: &str,
    ) -> Result<()> {
        self.add_method(
            MethodPlan {
                name: method_name(path, Some("hook_before")),
                kind: MethodKind::HookBefore,
                options: options.clone(),
                description,
            },
            owner,
        )?;
        self.add_method(
            MethodPlan {
                name: method_name(path, Some("hook_after")),
                kind: MethodKind::HookAfter,
                options,
                description: None,
            },
            owner,
        )
    }

    fn add_method(&mut self, method: MethodPlan, owner: &str) -> Result<()> {
        claim(&mut self.method_names, &method.name, owner)?;
        self.plan.methods.push(method);
        Ok(())
    }

    fn add_record(
        &mut self,
        identifier: &str,
        parent: Option<EmbeddedRecord>,
        options: &OptionList,
        path: &[&str],
        owner: &str,
    ) -> Result<()> {
        claim(&mut self.type_names, &record_type_name(identifier), owner)?;

        let mut field_owners = HashMap::new();
        if let Some(parent) = &parent {
            field_owners.insert(parent.field.clone(), parent.type_name());
        }

        let mut fields = Vec::with_capacity(options.len());
        for entry in options {
            // references are resolved before planning
            let option = entry.as_option().ok_or_else(|| GenerateError::UnnamedOption {
                path: option_path(path, entry.reference().unwrap_or_default()),
            })?;
            if option.name.trim().is_empty() {
                return Err(GenerateError::UnnamedOption {
                    path: option_path(path, "<unnamed>"),
                });
            }

            let field = field_type(option, path)?;
            if let Some(import) = field.import() {
                self.plan.imports.insert(import.to_string());
            }

            let name = field_name(&option.name);
            claim(&mut field_owners, &name, &option_path(path, &option.name))?;
            fields.push(RecordField {
                name,
                option_name: option.name.clone(),
                rust_type: field.rust_type(),
                description: option.description.clone(),
            });
        }

        self.plan.records.push(OptionRecord {
            identifier: identifier.to_string(),
            parent,
            fields,
        });
        Ok(())
    }
}

fn claim(registry: &mut HashMap<String, String>, name: &str, owner: &str) -> Result<()> {
    if let Some(first) = registry.get(name) {
        return Err(GenerateError::DuplicateName {
            name: name.to_string(),
            first: first.clone(),
            second: owner.to_string(),
        });
    }
    registry.insert(name.to_string(), owner.to_string());
    Ok(())
}
