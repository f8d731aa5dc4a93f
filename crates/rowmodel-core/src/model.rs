//! Model trait for record-to-table mapping.
//!
//! The `Model` trait is the registration point for a record type: it exposes
//! the static field descriptors and by-name access to field values. It is
//! typically derived using `#[derive(Model)]` from `rowmodel-macros`, but can
//! be implemented by hand with [`FieldInfo`] builders.

use crate::Result;
use crate::field::FieldInfo;
use crate::value::Value;

/// Trait for types that can be mapped to database tables.
///
/// # Example
///
/// ```ignore
/// use rowmodel::Model;
///
/// #[derive(Model, Default)]
/// struct User {
///     #[rowmodel(key)]
///     id: i64,
///     name: String,
///     #[rowmodel(column = "IsActive")]
///     active: bool,
/// }
/// ```
pub trait Model: Sized + Default + Send + Sync {
    /// The name of the database table (the type name unless overridden).
    const TABLE_NAME: &'static str;

    /// The database schema the table lives in.
    const SCHEMA: &'static str = "dbo";

    /// Field descriptors for every declared field, in declaration order.
    fn fields() -> &'static [FieldInfo];

    /// Current value of a readable, mapped field.
    ///
    /// Returns `None` for unknown, skipped, or write-only fields.
    fn field_value(&self, field: &str) -> Option<Value>;

    /// Coerce `value` into the named field's type and assign it.
    fn set_field(&mut self, field: &str, value: &Value) -> Result<()>;

    /// Values of all mapped fields as `(column_name, value)` pairs, in
    /// declaration order.
    fn to_row(&self) -> Vec<(&'static str, Value)> {
        Self::fields()
            .iter()
            .filter(|f| f.is_mapped())
            .filter_map(|f| self.field_value(f.name).map(|v| (f.column_name, v)))
            .collect()
    }
}
