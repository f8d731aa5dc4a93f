//! Enumerations stored as integer ordinals.
//!
//! An enum field is written to SQL as its ordinal and read back either from an
//! integer of any width or from text naming a variant. Text matches the
//! variant's display name when one is declared, otherwise its symbolic name;
//! the comparison is exact.

use crate::Result;
use crate::error::{DomainErrorKind, Error};
use crate::value::Value;

/// Descriptor for one enum variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumVariant {
    /// Symbolic (Rust) variant name
    pub name: &'static str,
    /// Display-name override used when reading text
    pub display: Option<&'static str>,
    /// Underlying integer ordinal
    pub ordinal: i64,
}

impl EnumVariant {
    /// Variant without a display override.
    pub const fn new(name: &'static str, ordinal: i64) -> Self {
        Self {
            name,
            display: None,
            ordinal,
        }
    }

    /// Set the display-name override.
    pub const fn display(mut self, display: &'static str) -> Self {
        self.display = Some(display);
        self
    }

    /// The name text must equal to select this variant.
    pub const fn text_name(&self) -> &'static str {
        match self.display {
            Some(display) => display,
            None => self.name,
        }
    }
}

/// Trait for unit-only enums mapped to integer columns.
///
/// Usually derived with `#[derive(SqlEnum)]`.
pub trait SqlEnum: Sized {
    /// Name of the enum type, used in error messages.
    const TYPE_NAME: &'static str;

    /// Every declared variant, in declaration order.
    const VARIANTS: &'static [EnumVariant];

    /// Ordinal of this value.
    fn ordinal(&self) -> i64;

    /// Value for an ordinal, if one is declared.
    fn from_ordinal(ordinal: i64) -> Option<Self>;

    /// Descriptor of this value's variant.
    fn variant(&self) -> Option<&'static EnumVariant> {
        let ordinal = self.ordinal();
        Self::VARIANTS.iter().find(|v| v.ordinal == ordinal)
    }
}

/// Resolve text to an enum value by display or symbolic name.
pub fn enum_from_text<E: SqlEnum>(text: &str) -> Result<E> {
    let ordinal = E::VARIANTS
        .iter()
        .find(|v| v.text_name() == text)
        .map(|v| v.ordinal)
        .ok_or_else(|| {
            Error::domain(
                DomainErrorKind::UnknownEnumName,
                format!("Enum {} has no value named '{}'", E::TYPE_NAME, text),
            )
        })?;
    enum_from_ordinal(ordinal)
}

/// Resolve an ordinal to an enum value.
pub fn enum_from_ordinal<E: SqlEnum>(ordinal: i64) -> Result<E> {
    E::from_ordinal(ordinal).ok_or_else(|| {
        Error::domain(
            DomainErrorKind::UnknownEnumOrdinal,
            format!("Enum {} has no value with ordinal {}", E::TYPE_NAME, ordinal),
        )
    })
}

/// Enum coercion from a raw value.
///
/// Returns `None` when the value kind has no enum rule (booleans, floats,
/// bytes and so on), leaving the caller to report an unsupported conversion.
pub fn enum_from_value<E: SqlEnum>(value: &Value) -> Option<Result<E>> {
    match value {
        Value::Text(text) => Some(enum_from_text(text)),
        other => other.integer().map(enum_from_ordinal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Status {
        Active,
        Inactive,
    }

    impl SqlEnum for Status {
        const TYPE_NAME: &'static str = "Status";
        const VARIANTS: &'static [EnumVariant] = &[
            EnumVariant::new("Active", 1).display("Currently Active"),
            EnumVariant::new("Inactive", 2),
        ];

        fn ordinal(&self) -> i64 {
            match self {
                Status::Active => 1,
                Status::Inactive => 2,
            }
        }

        fn from_ordinal(ordinal: i64) -> Option<Self> {
            match ordinal {
                1 => Some(Status::Active),
                2 => Some(Status::Inactive),
                _ => None,
            }
        }
    }

    #[test]
    fn display_name_replaces_symbolic_name() {
        assert_eq!(
            enum_from_text::<Status>("Currently Active").unwrap(),
            Status::Active
        );
        let err = enum_from_text::<Status>("Active").unwrap_err();
        assert_eq!(err.domain_kind(), Some(DomainErrorKind::UnknownEnumName));
    }

    #[test]
    fn symbolic_name_used_without_display() {
        assert_eq!(enum_from_text::<Status>("Inactive").unwrap(), Status::Inactive);
        assert!(enum_from_text::<Status>("inactive").is_err());
    }

    #[test]
    fn unknown_name_is_named_in_error() {
        let err = enum_from_text::<Status>("Bogus").unwrap_err();
        assert!(err.to_string().contains("'Bogus'"));
    }

    #[test]
    fn integers_of_any_width_select_by_ordinal() {
        for value in [
            Value::TinyInt(2),
            Value::SmallInt(2),
            Value::Int(2),
            Value::BigInt(2),
            Value::Enum(2),
        ] {
            assert_eq!(
                enum_from_value::<Status>(&value).unwrap().unwrap(),
                Status::Inactive
            );
        }
    }

    #[test]
    fn unknown_ordinal_is_a_domain_error() {
        let err = enum_from_value::<Status>(&Value::Int(9)).unwrap().unwrap_err();
        assert_eq!(err.domain_kind(), Some(DomainErrorKind::UnknownEnumOrdinal));
    }

    #[test]
    fn other_kinds_have_no_rule() {
        assert!(enum_from_value::<Status>(&Value::Bool(true)).is_none());
        assert!(enum_from_value::<Status>(&Value::Double(1.0)).is_none());
    }

    #[test]
    fn variant_lookup() {
        assert_eq!(Status::Active.variant().map(|v| v.text_name()), Some("Currently Active"));
        assert_eq!(Status::Inactive.variant().map(|v| v.name), Some("Inactive"));
    }
}
