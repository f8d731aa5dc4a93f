//! Field descriptors.

/// Metadata about a record field and the column it maps to.
///
/// Descriptors are normally produced by `#[derive(Model)]`, but the const
/// builder methods allow registering a type by hand:
///
/// ```
/// use rowmodel_core::FieldInfo;
///
/// static FIELDS: &[FieldInfo] = &[
///     FieldInfo::new("id").key(),
///     FieldInfo::new("display_name").column("Name"),
///     FieldInfo::new("cache").skip(),
/// ];
///
/// assert_eq!(FIELDS[1].column_name, "Name");
/// assert!(FIELDS[0].primary_key);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    /// Rust field name
    pub name: &'static str,
    /// Database column name (may differ from field name)
    pub column_name: &'static str,
    /// Whether this is the key field
    pub primary_key: bool,
    /// Excluded from mapping in both directions
    pub skip: bool,
    /// The record exposes a value for this field (SQL generation reads it)
    pub readable: bool,
    /// The materializer may assign this field
    pub writable: bool,
}

impl FieldInfo {
    /// Create a readable, writable field whose column is the field name.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            column_name: name,
            primary_key: false,
            skip: false,
            readable: true,
            writable: true,
        }
    }

    /// Set the database column name.
    pub const fn column(mut self, name: &'static str) -> Self {
        self.column_name = name;
        self
    }

    /// Mark this field as the key.
    pub const fn key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Set the key flag.
    pub const fn primary_key(mut self, value: bool) -> Self {
        self.primary_key = value;
        self
    }

    /// Exclude this field from mapping.
    pub const fn skip(mut self) -> Self {
        self.skip = true;
        self
    }

    /// Never assigned when materializing rows.
    pub const fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }

    /// Never read when generating SQL.
    pub const fn write_only(mut self) -> Self {
        self.readable = false;
        self
    }

    /// Whether SQL generation includes this field.
    pub const fn is_mapped(&self) -> bool {
        self.readable && !self.skip
    }

    /// Whether the materializer may populate this field from a row.
    pub const fn is_materialized(&self) -> bool {
        self.writable && !self.skip
    }
}
