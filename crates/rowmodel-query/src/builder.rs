//! INSERT and UPDATE statement builders.

use rowmodel_core::{DomainErrorKind, Error, FieldInfo, Model, Result, Value, mapped_fields, try_get_key};

use crate::literal::{format_literal, quote_ident};

/// Generated statement text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// SQL text with all values embedded as literals.
    pub sql: String,
    /// Whether running the statement yields the generated key as a scalar.
    pub returns_key: bool,
}

/// `[schema].[Table]` for a model type.
pub fn qualified_table<M: Model>() -> String {
    format!("{}.{}", quote_ident(M::SCHEMA), quote_ident(M::TABLE_NAME))
}

fn literal_for<M: Model>(model: &M, field: &FieldInfo) -> String {
    format_literal(&model.field_value(field.name).unwrap_or(Value::Null))
}

/// INSERT statement builder.
///
/// The key column is never written. When the type has a key, the statement
/// asks the server to return the generated value through an `OUTPUT` clause.
#[derive(Debug)]
pub struct InsertBuilder<'a, M: Model> {
    model: &'a M,
}

impl<'a, M: Model> InsertBuilder<'a, M> {
    /// Create a new INSERT builder for the given model instance.
    pub fn new(model: &'a M) -> Self {
        Self { model }
    }

    /// Build the INSERT statement.
    pub fn build(&self) -> Statement {
        let fields = mapped_fields::<M>(true);
        let key = try_get_key::<M>();

        let output = key
            .map(|k| format!(" OUTPUT INSERTED.{} ", k.column_name))
            .unwrap_or_default();

        let sql = if fields.is_empty() {
            // Nothing to write but the defaults.
            let gap = if output.is_empty() { " " } else { output.as_str() };
            format!("INSERT INTO {}{}DEFAULT VALUES", qualified_table::<M>(), gap)
        } else {
            let columns: Vec<_> = fields.iter().map(|f| quote_ident(f.column_name)).collect();
            let values: Vec<_> = fields
                .iter()
                .map(|f| literal_for(self.model, f))
                .collect();
            format!(
                "INSERT INTO {} ({}){} VALUES ({})",
                qualified_table::<M>(),
                columns.join(", "),
                output,
                values.join(", ")
            )
        };

        tracing::trace!(
            model = M::TABLE_NAME,
            sql = %sql,
            returns_key = key.is_some(),
            "Generated INSERT"
        );

        Statement {
            sql,
            returns_key: key.is_some(),
        }
    }
}

/// UPDATE statement builder.
///
/// Every mapped non-key field is assigned; the row is selected by key.
#[derive(Debug)]
pub struct UpdateBuilder<'a, M: Model> {
    model: &'a M,
}

impl<'a, M: Model> UpdateBuilder<'a, M> {
    /// Create a new UPDATE builder for the given model instance.
    pub fn new(model: &'a M) -> Self {
        Self { model }
    }

    /// Build the UPDATE SQL.
    ///
    /// Fails before producing any text when the type has no key, or when the
    /// key is its only mapped field.
    pub fn build(&self) -> Result<String> {
        let key = try_get_key::<M>().ok_or_else(|| {
            Error::domain(
                DomainErrorKind::MissingKey,
                format!(
                    "Type {} has no key field; an UPDATE cannot select its row",
                    M::TABLE_NAME
                ),
            )
        })?;

        let fields = mapped_fields::<M>(true);
        if fields.is_empty() {
            return Err(Error::domain(
                DomainErrorKind::NoUpdatableColumns,
                format!("Type {} has no mapped fields besides its key", M::TABLE_NAME),
            ));
        }

        let assignments: Vec<_> = fields
            .iter()
            .map(|f| format!("{} = {}", quote_ident(f.column_name), literal_for(self.model, f)))
            .collect();

        let sql = format!(
            "UPDATE {} SET {} WHERE {} = {}",
            qualified_table::<M>(),
            assignments.join(", "),
            quote_ident(key.column_name),
            literal_for(self.model, key)
        );

        tracing::trace!(model = M::TABLE_NAME, sql = %sql, "Generated UPDATE");
        Ok(sql)
    }
}
