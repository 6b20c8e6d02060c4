//! Document model for optionapi specifications.
//!
//! These types mirror the YAML layout of a specification one-to-one. They
//! carry no behavior beyond tree shape and a few builders; decoding rules
//! (null-tolerant collections, scalar defaults, reference syntax) live in
//! the [`Deserialize`] impls below so that a decoded [`Document`] is always
//! structurally well-formed.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};

/// Prefix every option reference must start with.
pub const REFERENCE_PREFIX: &str = "#/components/options/";

/// Root of a specification.
///
/// The root behaves like an unnamed command: it owns the global options,
/// the top-level command map and its own argument bounds.
///
/// # Examples
///
/// ```
/// use optionapi_core::*;
///
/// let mut doc = Document::default();
/// doc.options.push(OptionSchema::new("verbose", "bool"));
/// doc.commands.insert("serve", CommandSchema::new().with_args(0, 1));
///
/// assert!(doc.commands.has_any());
/// assert_eq!(doc.options.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Document {
    /// API version marker.
    #[serde(rename = "optionapi", deserialize_with = "null_as_default")]
    pub option_api: OptionApi,
    /// Options shared by every command.
    pub options: OptionList,
    /// Top-level commands.
    pub commands: NamedCommands,
    /// Reusable definitions that references point into.
    #[serde(deserialize_with = "null_as_default")]
    pub components: Components,
    /// Minimum positional arguments accepted by the root.
    pub min_args: u32,
    /// Maximum positional arguments accepted by the root.
    pub max_args: u32,
}

/// The `optionapi` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionApi {
    #[serde(
        deserialize_with = "scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<String>,
}

/// A node in the command tree.
///
/// A command with at least one child is a *branch*; it receives before/after
/// hooks in generated code. A command without children is a *leaf* and
/// receives a single action method.
///
/// # Examples
///
/// ```
/// use optionapi_core::{CommandSchema, OptionSchema};
///
/// let server = CommandSchema::new()
///     .with_command("start", CommandSchema::new())
///     .with_command("stop", CommandSchema::new());
/// assert!(server.is_branch());
///
/// let start = CommandSchema::new()
///     .with_option(OptionSchema::new("port", "uint16"))
///     .with_args(0, 2);
/// assert!(!start.is_branch());
/// assert_eq!(start.max_args, 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommandSchema {
    /// One-line usage text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
    /// Longer, possibly multi-line, description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Options declared directly on this command.
    #[serde(skip_serializing_if = "OptionList::is_empty")]
    pub options: OptionList,
    /// Sub-commands keyed by name.
    #[serde(skip_serializing_if = "NamedCommands::is_empty")]
    pub commands: NamedCommands,
    pub min_args: u32,
    pub max_args: u32,
}

impl CommandSchema {
    /// Creates an empty command.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when this command has sub-commands.
    pub fn is_branch(&self) -> bool {
        self.commands.has_any()
    }

    /// Adds a usage line.
    pub fn with_usage(mut self, usage: &str) -> Self {
        self.usage = Some(usage.to_string());
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Appends a concrete option.
    pub fn with_option(mut self, option: OptionSchema) -> Self {
        self.options.push(option);
        self
    }

    /// Appends a reference to a component option.
    pub fn with_reference(mut self, reference: &str) -> Self {
        self.options
            .0
            .push(OptionOrReference::Reference(reference.to_string()));
        self
    }

    /// Adds a named sub-command.
    pub fn with_command(mut self, name: &str, command: CommandSchema) -> Self {
        self.commands.insert(name, command);
        self
    }

    /// Sets the positional argument bounds.
    pub fn with_args(mut self, min_args: u32, max_args: u32) -> Self {
        self.min_args = min_args;
        self.max_args = max_args;
        self
    }
}

/// A concrete option definition.
///
/// # Examples
///
/// ```
/// use optionapi_core::OptionSchema;
///
/// let timeout = OptionSchema::new("connectTimeout", "duration")
///     .with_default("30s")
///     .with_flag("connectTimeout", &["c"])
///     .with_env("CONNECT_TIMEOUT");
///
/// assert_eq!(timeout.default.as_deref(), Some("30s"));
/// assert_eq!(timeout.flag.aliases, vec!["c"]);
/// assert!(!timeout.required);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionSchema {
    /// Field name. Filled from the map key when declared in a named map.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Scalar type tag (`int`, `string`, `duration`, ...).
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub type_tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Usage hint such as `Ns` or `--name=Bob`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
    #[serde(
        deserialize_with = "null_as_default",
        skip_serializing_if = "EnvBinding::is_empty"
    )]
    pub env: EnvBinding,
    #[serde(
        deserialize_with = "null_as_default",
        skip_serializing_if = "FlagBinding::is_empty"
    )]
    pub flag: FlagBinding,
    /// Default value in its textual form.
    #[serde(
        deserialize_with = "scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
}

impl OptionSchema {
    /// Creates an option with a name and type tag.
    pub fn new(name: &str, type_tag: &str) -> Self {
        Self {
            name: name.to_string(),
            type_tag: type_tag.to_string(),
            ..Self::default()
        }
    }

    /// Adds a description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Sets the default value.
    pub fn with_default(mut self, default: &str) -> Self {
        self.default = Some(default.to_string());
        self
    }

    /// Binds the option to an environment variable.
    pub fn with_env(mut self, name: &str) -> Self {
        self.env.name = name.to_string();
        self
    }

    /// Binds the option to a flag and its aliases.
    pub fn with_flag(mut self, name: &str, aliases: &[&str]) -> Self {
        self.flag.name = name.to_string();
        self.flag.aliases = aliases.iter().map(|a| a.to_string()).collect();
        self
    }

    /// Marks the option as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Environment variable binding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvBinding {
    pub name: String,
}

impl EnvBinding {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}

/// Flag binding: a primary name plus aliases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlagBinding {
    pub name: String,
    #[serde(
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub aliases: Vec<String>,
}

impl FlagBinding {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.aliases.is_empty()
    }
}

/// Either an inline option or a `$ref` into [`Components`].
///
/// A reference must have the exact form `#/components/options/<name>`;
/// anything else is rejected while decoding. A blank `$ref` is treated as
/// absent and the entry decodes as an inline option.
///
/// # Examples
///
/// ```
/// use optionapi_core::OptionOrReference;
///
/// let entry: OptionOrReference =
///     serde_yaml::from_str(r##"$ref: "#/components/options/Timeout""##).unwrap();
/// assert_eq!(entry.reference(), Some("#/components/options/Timeout"));
///
/// let bad = serde_yaml::from_str::<OptionOrReference>(r##"$ref: "#/options/Timeout""##);
/// assert!(bad.is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawOptionOrReference", into = "RawOptionOrReference")]
pub enum OptionOrReference {
    Inline(OptionSchema),
    Reference(String),
}

impl OptionOrReference {
    /// Returns the concrete option, if this entry is not a reference.
    pub fn as_option(&self) -> Option<&OptionSchema> {
        match self {
            OptionOrReference::Inline(option) => Some(option),
            OptionOrReference::Reference(_) => None,
        }
    }

    /// Returns the reference key, if this entry is a reference.
    pub fn reference(&self) -> Option<&str> {
        match self {
            OptionOrReference::Inline(_) => None,
            OptionOrReference::Reference(key) => Some(key),
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, OptionOrReference::Reference(_))
    }
}

impl From<OptionSchema> for OptionOrReference {
    fn from(option: OptionSchema) -> Self {
        OptionOrReference::Inline(option)
    }
}

/// Builds the fully-qualified reference key for a component option name.
///
/// ```
/// assert_eq!(
///     optionapi_core::reference_key("Timeout"),
///     "#/components/options/Timeout"
/// );
/// ```
pub fn reference_key(name: &str) -> String {
    format!("{REFERENCE_PREFIX}{name}")
}

fn check_reference(key: &str) -> Result<(), String> {
    match key.strip_prefix(REFERENCE_PREFIX) {
        Some(name) if !name.is_empty() && !name.contains('/') => Ok(()),
        _ => Err(format!(
            "invalid reference \"{key}\": expected \"{REFERENCE_PREFIX}<name>\""
        )),
    }
}

#[derive(Serialize, Deserialize)]
struct RawOptionOrReference {
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    reference: Option<String>,
    #[serde(flatten)]
    option: OptionSchema,
}

impl TryFrom<RawOptionOrReference> for OptionOrReference {
    type Error = String;

    fn try_from(raw: RawOptionOrReference) -> Result<Self, Self::Error> {
        match raw.reference {
            Some(key) if !key.trim().is_empty() => {
                check_reference(&key)?;
                Ok(OptionOrReference::Reference(key))
            }
            _ => Ok(OptionOrReference::Inline(raw.option)),
        }
    }
}

impl From<OptionOrReference> for RawOptionOrReference {
    fn from(entry: OptionOrReference) -> Self {
        match entry {
            OptionOrReference::Inline(option) => Self {
                reference: None,
                option,
            },
            OptionOrReference::Reference(key) => Self {
                reference: Some(key),
                option: OptionSchema::default(),
            },
        }
    }
}

/// Ordered list of options.
///
/// Decodes from either a YAML sequence or a YAML map. In the map form the
/// key names any inline option that does not set `name` itself, and
/// declaration order is preserved either way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OptionList(pub Vec<OptionOrReference>);

impl OptionList {
    pub fn has_any(&self) -> bool {
        !self.0.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Appends a concrete option.
    pub fn push(&mut self, option: OptionSchema) {
        self.0.push(OptionOrReference::Inline(option));
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OptionOrReference> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, OptionOrReference> {
        self.0.iter_mut()
    }
}

impl<'a> IntoIterator for &'a OptionList {
    type Item = &'a OptionOrReference;
    type IntoIter = std::slice::Iter<'a, OptionOrReference>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<OptionOrReference> for OptionList {
    fn from_iter<T: IntoIterator<Item = OptionOrReference>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for OptionList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OptionListVisitor;

        impl<'de> Visitor<'de> for OptionListVisitor {
            type Value = OptionList;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a list or map of options")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(OptionList::default())
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(OptionList::default())
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut out = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(entry) = seq.next_element::<OptionOrReference>()? {
                    out.push(entry);
                }
                Ok(OptionList(out))
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut out = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, mut entry)) = map.next_entry::<String, OptionOrReference>()? {
                    if let OptionOrReference::Inline(option) = &mut entry {
                        if option.name.is_empty() {
                            option.name = key;
                        }
                    }
                    out.push(entry);
                }
                Ok(OptionList(out))
            }
        }

        deserializer.deserialize_any(OptionListVisitor)
    }
}

/// Sub-commands keyed by name, iterated in lexicographic order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NamedCommands(pub BTreeMap<String, CommandSchema>);

impl NamedCommands {
    pub fn has_any(&self) -> bool {
        !self.0.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, name: &str) -> Option<&CommandSchema> {
        self.0.get(name)
    }

    pub fn insert(&mut self, name: &str, command: CommandSchema) {
        self.0.insert(name.to_string(), command);
    }

    /// Iterates `(name, command)` pairs in lexicographic name order.
    pub fn iter(&self) -> std::collections::btree_map::Iter<'_, String, CommandSchema> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> std::collections::btree_map::IterMut<'_, String, CommandSchema> {
        self.0.iter_mut()
    }
}

impl<'a> IntoIterator for &'a NamedCommands {
    type Item = (&'a String, &'a CommandSchema);
    type IntoIter = std::collections::btree_map::Iter<'a, String, CommandSchema>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'de> Deserialize<'de> for NamedCommands {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // `server:` with no body is an empty command
        let raw = Option::<BTreeMap<String, Option<CommandSchema>>>::deserialize(deserializer)?;
        Ok(NamedCommands(
            raw.unwrap_or_default()
                .into_iter()
                .map(|(name, command)| (name, command.unwrap_or_default()))
                .collect(),
        ))
    }
}

/// Reusable definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Components {
    #[serde(skip_serializing_if = "NamedOptions::is_empty")]
    pub options: NamedOptions,
}

/// Component options keyed by name.
///
/// Component options are always concrete: a `$ref` inside a component is a
/// decode error, so references never chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NamedOptions(pub BTreeMap<String, OptionSchema>);

impl NamedOptions {
    pub fn has_any(&self) -> bool {
        !self.0.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, name: &str) -> Option<&OptionSchema> {
        self.0.get(name)
    }

    /// Inserts a component, naming it after `name` when it has no name.
    pub fn insert(&mut self, name: &str, mut option: OptionSchema) {
        if option.name.is_empty() {
            option.name = name.to_string();
        }
        self.0.insert(name.to_string(), option);
    }

    pub fn iter(&self) -> std::collections::btree_map::Iter<'_, String, OptionSchema> {
        self.0.iter()
    }
}

impl<'de> Deserialize<'de> for NamedOptions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<BTreeMap<String, OptionOrReference>>::deserialize(deserializer)?;
        let mut out = NamedOptions::default();
        for (name, entry) in raw.unwrap_or_default() {
            match entry {
                OptionOrReference::Inline(option) => out.insert(&name, option),
                OptionOrReference::Reference(key) => {
                    return Err(de::Error::custom(format!(
                        "component option \"{name}\" cannot itself be a reference ({key})"
                    )));
                }
            }
        }
        Ok(out)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// Accepts any YAML scalar and keeps its textual form, so `default: 30`
// and `default: "30"` decode alike.
fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::Null => Ok(None),
        serde_yaml::Value::String(s) => Ok(Some(s)),
        serde_yaml::Value::Number(n) => Ok(Some(n.to_string())),
        serde_yaml::Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(de::Error::custom(format!(
            "expected a scalar value, found {}",
            describe_value(&other)
        ))),
    }
}

fn describe_value(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Sequence(_) => "a sequence",
        serde_yaml::Value::Mapping(_) => "a mapping",
        serde_yaml::Value::Tagged(_) => "a tagged value",
        _ => "a scalar",
    }
}
