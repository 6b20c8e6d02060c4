//! Generator configuration.
//!
//! Names used in generated code are explicit configuration rather than
//! process-wide defaults. Every field is an optional override; the
//! accessors fall back to the documented default when a field is unset or
//! blank.
//!
//! # Example YAML
//!
//! ```yaml
//! module_name: app_cli
//! trait_name: Commands
//! struct_name: Unimplemented
//! global_options_name: Global
//! runtime_crate: my_runtime
//! command_table: true
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const DEFAULT_MODULE_NAME: &str = "cli_stub";
pub const DEFAULT_TRAIT_NAME: &str = "Interface";
pub const DEFAULT_STRUCT_NAME: &str = "Unimplemented";
pub const DEFAULT_GLOBAL_OPTIONS_NAME: &str = "AllCommand";
pub const DEFAULT_RUNTIME_CRATE: &str = "optionapi_runtime";

/// Overrides for names used in generated code.
///
/// # Examples
///
/// ```
/// use optionapi_codegen::GeneratorConfig;
///
/// let config = GeneratorConfig::default();
/// assert_eq!(config.trait_name(), "Interface");
///
/// let config = GeneratorConfig {
///     trait_name: Some("Commands".into()),
///     ..GeneratorConfig::default()
/// };
/// assert_eq!(config.trait_name(), "Commands");
/// assert_eq!(config.struct_name(), "Unimplemented");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Name of the `pub mod` wrapping the generated code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_name: Option<String>,
    /// Name of the generated command trait.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trait_name: Option<String>,
    /// Name of the generated no-op implementation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub struct_name: Option<String>,
    /// Identifier of the global option record (`<name>Options`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_options_name: Option<String>,
    /// Crate path providing `Context` and `CommandError`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime_crate: Option<String>,
    /// Also emit a static table describing every command.
    pub command_table: bool,
}

impl GeneratorConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::GenerateError::Io) if the file cannot be read,
    /// or [`Config`](crate::GenerateError::Config) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::GenerateError::Io) if the file cannot be
    /// written, or [`Config`](crate::GenerateError::Config) if
    /// serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Applies every override set in `other` on top of `self`.
    pub fn merged_with(mut self, other: GeneratorConfig) -> Self {
        if other.module_name.is_some() {
            self.module_name = other.module_name;
        }
        if other.trait_name.is_some() {
            self.trait_name = other.trait_name;
        }
        if other.struct_name.is_some() {
            self.struct_name = other.struct_name;
        }
        if other.global_options_name.is_some() {
            self.global_options_name = other.global_options_name;
        }
        if other.runtime_crate.is_some() {
            self.runtime_crate = other.runtime_crate;
        }
        self.command_table |= other.command_table;
        self
    }

    pub fn module_name(&self) -> &str {
        or_default(&self.module_name, DEFAULT_MODULE_NAME)
    }

    pub fn trait_name(&self) -> &str {
        or_default(&self.trait_name, DEFAULT_TRAIT_NAME)
    }

    pub fn struct_name(&self) -> &str {
        or_default(&self.struct_name, DEFAULT_STRUCT_NAME)
    }

    pub fn global_options_name(&self) -> &str {
        or_default(&self.global_options_name, DEFAULT_GLOBAL_OPTIONS_NAME)
    }

    pub fn runtime_crate(&self) -> &str {
        or_default(&self.runtime_crate, DEFAULT_RUNTIME_CRATE)
    }
}

fn or_default<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.module_name(), "cli_stub");
        assert_eq!(config.trait_name(), "Interface");
        assert_eq!(config.struct_name(), "Unimplemented");
        assert_eq!(config.global_options_name(), "AllCommand");
        assert_eq!(config.runtime_crate(), "optionapi_runtime");
        assert!(!config.command_table);
    }

    #[test]
    fn test_blank_override_falls_back() {
        let config = GeneratorConfig {
            trait_name: Some("   ".into()),
            ..GeneratorConfig::default()
        };
        assert_eq!(config.trait_name(), "Interface");
    }

    #[test]
    fn test_deserialize_partial() {
        let yaml = r#"
trait_name: Commands
command_table: true
"#;
        let config: GeneratorConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.trait_name(), "Commands");
        assert_eq!(config.module_name(), "cli_stub");
        assert!(config.command_table);
    }

    #[test]
    fn test_merge_prefers_other() {
        let base = GeneratorConfig {
            trait_name: Some("Commands".into()),
            module_name: Some("app".into()),
            ..GeneratorConfig::default()
        };
        let overrides = GeneratorConfig {
            module_name: Some("cli".into()),
            command_table: true,
            ..GeneratorConfig::default()
        };
        let merged = base.merged_with(overrides);
        assert_eq!(merged.trait_name(), "Commands");
        assert_eq!(merged.module_name(), "cli");
        assert!(merged.command_table);
    }

    #[test]
    fn test_load_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("optionapi-gen.yml");

        let original = GeneratorConfig {
            module_name: Some("app_cli".into()),
            runtime_crate: Some("my_runtime".into()),
            command_table: true,
            ..GeneratorConfig::default()
        };
        original.save(&path).unwrap();

        let loaded = GeneratorConfig::load(&path).unwrap();
        assert_eq!(loaded, original);
    }
}
