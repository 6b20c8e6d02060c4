//! Scalar type mapping and the optionality rule.
//!
//! Every option type tag maps to exactly one Rust type plus the import that
//! type needs. Whether a field is wrapped in `Option<T>` depends only on the
//! option's `required` flag and whether it has a default:
//!
//! | required | default | field type            |
//! |----------|---------|-----------------------|
//! | yes      | no      | `T`                   |
//! | yes      | yes     | error                 |
//! | no       | yes     | `T` (always has value)|
//! | no       | no      | `Option<T>`           |

use optionapi_core::OptionSchema;

use crate::error::{GenerateError, Result};

/// A supported option type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Byte,
    Rune,
    Float32,
    Float64,
    Bool,
    String,
    Duration,
    Time,
}

impl ScalarType {
    /// Every supported type, in tag order.
    pub const ALL: [ScalarType; 18] = [
        ScalarType::Int,
        ScalarType::Int8,
        ScalarType::Int16,
        ScalarType::Int32,
        ScalarType::Int64,
        ScalarType::Uint,
        ScalarType::Uint8,
        ScalarType::Uint16,
        ScalarType::Uint32,
        ScalarType::Uint64,
        ScalarType::Byte,
        ScalarType::Rune,
        ScalarType::Float32,
        ScalarType::Float64,
        ScalarType::Bool,
        ScalarType::String,
        ScalarType::Duration,
        ScalarType::Time,
    ];

    /// Looks up a type tag as written in a specification.
    ///
    /// ```
    /// use optionapi_codegen::ScalarType;
    ///
    /// assert_eq!(ScalarType::from_tag("duration"), Some(ScalarType::Duration));
    /// assert_eq!(ScalarType::from_tag("complex128"), None);
    /// ```
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.tag() == tag)
    }

    /// The tag that selects this type.
    pub fn tag(self) -> &'static str {
        match self {
            ScalarType::Int => "int",
            ScalarType::Int8 => "int8",
            ScalarType::Int16 => "int16",
            ScalarType::Int32 => "int32",
            ScalarType::Int64 => "int64",
            ScalarType::Uint => "uint",
            ScalarType::Uint8 => "uint8",
            ScalarType::Uint16 => "uint16",
            ScalarType::Uint32 => "uint32",
            ScalarType::Uint64 => "uint64",
            ScalarType::Byte => "byte",
            ScalarType::Rune => "rune",
            ScalarType::Float32 => "float32",
            ScalarType::Float64 => "float64",
            ScalarType::Bool => "bool",
            ScalarType::String => "string",
            ScalarType::Duration => "duration",
            ScalarType::Time => "time",
        }
    }

    /// The concrete Rust type, as written after the imports are in scope.
    pub fn rust_type(self) -> &'static str {
        match self {
            ScalarType::Int | ScalarType::Int64 => "i64",
            ScalarType::Int8 => "i8",
            ScalarType::Int16 => "i16",
            ScalarType::Int32 => "i32",
            ScalarType::Uint | ScalarType::Uint64 => "u64",
            ScalarType::Uint8 | ScalarType::Byte => "u8",
            ScalarType::Uint16 => "u16",
            ScalarType::Uint32 => "u32",
            ScalarType::Rune => "char",
            ScalarType::Float32 => "f32",
            ScalarType::Float64 => "f64",
            ScalarType::Bool => "bool",
            ScalarType::String => "String",
            ScalarType::Duration => "Duration",
            ScalarType::Time => "SystemTime",
        }
    }

    /// The import the concrete type needs, if it is not in the prelude.
    pub fn import(self) -> Option<&'static str> {
        match self {
            ScalarType::Duration => Some("std::time::Duration"),
            ScalarType::Time => Some("std::time::SystemTime"),
            _ => None,
        }
    }
}

/// Whether a field always holds a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Concrete,
    Optional,
}

/// The resolved type of one generated field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldType {
    pub scalar: ScalarType,
    pub kind: FieldKind,
}

impl FieldType {
    /// The field type as Rust source.
    ///
    /// ```
    /// use optionapi_codegen::{FieldKind, FieldType, ScalarType};
    ///
    /// let field = FieldType { scalar: ScalarType::Int, kind: FieldKind::Optional };
    /// assert_eq!(field.rust_type(), "Option<i64>");
    /// ```
    pub fn rust_type(&self) -> String {
        match self.kind {
            FieldKind::Concrete => self.scalar.rust_type().to_string(),
            FieldKind::Optional => format!("Option<{}>", self.scalar.rust_type()),
        }
    }

    /// The import this field needs. `Option` is in the prelude, so both
    /// forms share the concrete type's import.
    pub fn import(&self) -> Option<&'static str> {
        self.scalar.import()
    }
}

/// Applies the optionality rule to `option`.
///
/// `path` is the command path the option is declared on and only feeds
/// the error message.
///
/// # Errors
///
/// Returns [`GenerateError::RequiredWithDefault`] when the option is both
/// required and defaulted.
pub fn field_kind<S: AsRef<str>>(option: &OptionSchema, path: &[S]) -> Result<FieldKind> {
    match (option.required, option.default.is_some()) {
        (true, true) => Err(GenerateError::RequiredWithDefault {
            path: option_path(path, &option.name),
        }),
        (true, false) => Ok(FieldKind::Concrete),
        (false, true) => Ok(FieldKind::Concrete),
        (false, false) => Ok(FieldKind::Optional),
    }
}

/// Resolves the full field type of `option`.
///
/// # Errors
///
/// Returns [`GenerateError::UnsupportedOptionType`] for an unknown type tag,
/// or [`GenerateError::RequiredWithDefault`] (see [`field_kind`]).
pub fn field_type<S: AsRef<str>>(option: &OptionSchema, path: &[S]) -> Result<FieldType> {
    let scalar = ScalarType::from_tag(&option.type_tag).ok_or_else(|| {
        GenerateError::UnsupportedOptionType {
            tag: option.type_tag.clone(),
        }
    })?;
    let kind = field_kind(option, path)?;
    Ok(FieldType { scalar, kind })
}

/// Slash-joined path of an option, for diagnostics.
pub(crate) fn option_path<S: AsRef<str>>(path: &[S], name: &str) -> String {
    path.iter()
        .map(|s| s.as_ref())
        .chain(std::iter::once(name))
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_PATH: &[&str] = &[];

    #[test]
    fn test_optionality_rule() {
        let base = OptionSchema::new("port", "int");

        let required = base.clone().required();
        assert_eq!(field_kind(&required, NO_PATH).unwrap(), FieldKind::Concrete);

        let defaulted = base.clone().with_default("80");
        assert_eq!(field_kind(&defaulted, NO_PATH).unwrap(), FieldKind::Concrete);

        assert_eq!(field_kind(&base, NO_PATH).unwrap(), FieldKind::Optional);

        let both = base.required().with_default("80");
        assert!(matches!(
            field_kind(&both, NO_PATH),
            Err(GenerateError::RequiredWithDefault { .. })
        ));
    }

    #[test]
    fn test_required_with_default_names_the_option() {
        let option = OptionSchema::new("port", "int").required().with_default("80");
        let err = field_kind(&option, &["server", "start"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "option at \"server/start/port\" cannot have a default value and also be required"
        );
    }

    #[test]
    fn test_unsupported_type_names_the_tag() {
        let option = OptionSchema::new("ratio", "complex64");
        let err = field_type(&option, NO_PATH).unwrap_err();
        assert_eq!(err.to_string(), "unsupported option type: \"complex64\"");
    }

    #[test]
    fn test_every_tag_round_trips() {
        for scalar in ScalarType::ALL {
            assert_eq!(ScalarType::from_tag(scalar.tag()), Some(scalar));
        }
    }

    #[test]
    fn test_time_types_need_imports() {
        let option = OptionSchema::new("timeout", "duration");
        let field = field_type(&option, NO_PATH).unwrap();
        assert_eq!(field.rust_type(), "Option<Duration>");
        assert_eq!(field.import(), Some("std::time::Duration"));

        let option = OptionSchema::new("since", "time").with_default("now");
        let field = field_type(&option, NO_PATH).unwrap();
        assert_eq!(field.rust_type(), "SystemTime");
        assert_eq!(field.import(), Some("std::time::SystemTime"));

        let option = OptionSchema::new("name", "string").required();
        assert_eq!(field_type(&option, NO_PATH).unwrap().import(), None);
    }
}
