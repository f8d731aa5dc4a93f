//! Field discovery for record types.
//!
//! Resolves which fields of a [`Model`] take part in SQL generation, which one
//! is the key, and how physical column names map back to fields when reading
//! rows. Everything here is recomputed from the static descriptor table on
//! every call.

use std::collections::HashMap;

use crate::field::FieldInfo;
use crate::model::Model;

/// Readable, non-skipped fields of `M` in declaration order.
///
/// With `skip_key` the key field (if any) is left out, which is what INSERT
/// column lists and UPDATE SET lists need.
pub fn mapped_fields<M: Model>(skip_key: bool) -> Vec<&'static FieldInfo> {
    let key = if skip_key { try_get_key::<M>() } else { None };

    M::fields()
        .iter()
        .filter(|f| f.is_mapped())
        .filter(|f| key.is_none_or(|k| k.name != f.name))
        .collect()
}

/// The key field of `M`, if one is declared.
///
/// Absence is not an error: callers decide whether they need a key.
pub fn try_get_key<M: Model>() -> Option<&'static FieldInfo> {
    M::fields().iter().find(|f| f.readable && f.primary_key)
}

/// Case-insensitive lookup from column name to the field it populates.
///
/// Only fields the materializer may assign are included.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    by_column: HashMap<String, &'static FieldInfo>,
}

impl ColumnMap {
    /// Build the map for `M`.
    pub fn of<M: Model>() -> Self {
        let by_column = M::fields()
            .iter()
            .filter(|f| f.is_materialized())
            .map(|f| (fold_case(f.column_name), f))
            .collect();
        Self { by_column }
    }

    /// Field for a physical column name, ignoring case.
    pub fn get(&self, column: &str) -> Option<&'static FieldInfo> {
        self.by_column.get(&fold_case(column)).copied()
    }

    /// Number of materializable columns.
    pub fn len(&self) -> usize {
        self.by_column.len()
    }

    /// Whether no column can be materialized.
    pub fn is_empty(&self) -> bool {
        self.by_column.is_empty()
    }
}

fn fold_case(name: &str) -> String {
    name.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Result, Value};

    #[derive(Default)]
    struct Account;

    impl Model for Account {
        const TABLE_NAME: &'static str = "Account";

        fn fields() -> &'static [FieldInfo] {
            static FIELDS: &[FieldInfo] = &[
                FieldInfo::new("owner"),
                FieldInfo::new("id").key(),
                FieldInfo::new("balance").column("Balance_Cents"),
                FieldInfo::new("cache").skip(),
                FieldInfo::new("secret").write_only(),
                FieldInfo::new("total").read_only(),
            ];
            FIELDS
        }

        fn field_value(&self, _field: &str) -> Option<Value> {
            None
        }

        fn set_field(&mut self, _field: &str, _value: &Value) -> Result<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct Note;

    impl Model for Note {
        const TABLE_NAME: &'static str = "Note";

        fn fields() -> &'static [FieldInfo] {
            static FIELDS: &[FieldInfo] = &[FieldInfo::new("body")];
            FIELDS
        }

        fn field_value(&self, _field: &str) -> Option<Value> {
            None
        }

        fn set_field(&mut self, _field: &str, _value: &Value) -> Result<()> {
            Ok(())
        }
    }

    fn names(fields: &[&FieldInfo]) -> Vec<&'static str> {
        fields.iter().map(|f| f.name).collect()
    }

    #[test]
    fn mapped_fields_keep_declaration_order() {
        let all = mapped_fields::<Account>(false);
        assert_eq!(names(&all), vec!["owner", "id", "balance", "total"]);
    }

    #[test]
    fn skip_key_removes_only_the_key() {
        let body = mapped_fields::<Account>(true);
        assert_eq!(names(&body), vec!["owner", "balance", "total"]);
    }

    #[test]
    fn key_lookup_reports_absence() {
        assert_eq!(try_get_key::<Account>().map(|f| f.name), Some("id"));
        assert!(try_get_key::<Note>().is_none());
        assert_eq!(names(&mapped_fields::<Note>(true)), vec!["body"]);
    }

    #[test]
    fn column_map_is_case_insensitive_and_honors_overrides() {
        let map = ColumnMap::of::<Account>();
        assert_eq!(map.get("BALANCE_CENTS").map(|f| f.name), Some("balance"));
        assert_eq!(map.get("Owner").map(|f| f.name), Some("owner"));
        assert!(map.get("balance").is_none());
    }

    #[test]
    fn column_map_excludes_unassignable_fields() {
        let map = ColumnMap::of::<Account>();
        assert!(map.get("cache").is_none());
        assert!(map.get("total").is_none());
        assert_eq!(map.get("secret").map(|f| f.name), Some("secret"));
        assert_eq!(map.len(), 4);
    }
}
