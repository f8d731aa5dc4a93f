//! Literal SQL generation for rowmodel records.
//!
//! `rowmodel-query` is the **statement construction layer**. It turns a
//! `Model` instance into INSERT and UPDATE text with every value embedded as
//! a literal:
//!
//! - **Value formatting**: [`format_literal`] renders one value as SQL text.
//! - **Builders**: [`InsertBuilder`] and [`UpdateBuilder`], also reachable via
//!   the `insert!` and `update!` macros.
//!
//! Generated text runs through a `StatementExecutor` from `rowmodel-core`.
//! Most users access these builders via the `rowmodel` facade crate.

pub mod builder;
pub mod literal;

pub use builder::{InsertBuilder, Statement, UpdateBuilder, qualified_table};
pub use literal::{format_literal, quote_ident};

use rowmodel_core::{Model, Result};

/// Generate the INSERT statement for a record.
pub fn generate_insert<M: Model>(model: &M) -> Statement {
    InsertBuilder::new(model).build()
}

/// Generate the UPDATE statement for a record.
pub fn generate_update<M: Model>(model: &M) -> Result<String> {
    UpdateBuilder::new(model).build()
}

/// Create an INSERT builder for a model.
///
/// # Example
///
/// ```ignore
/// let statement = insert!(&user).build();
/// ```
#[macro_export]
macro_rules! insert {
    ($model:expr) => {
        $crate::builder::InsertBuilder::new($model)
    };
}

/// Create an UPDATE builder for a model.
///
/// # Example
///
/// ```ignore
/// let sql = update!(&user).build()?;
/// ```
#[macro_export]
macro_rules! update {
    ($model:expr) => {
        $crate::builder::UpdateBuilder::new($model)
    };
}
