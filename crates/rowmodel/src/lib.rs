//! rowmodel - metadata-driven mapping between Rust records and SQL rows.
//!
//! rowmodel derives statement text and row conversions from declarative
//! per-field metadata instead of hand-written mapping code:
//!
//! - `#[derive(Model)]` registers a record type: table, schema, key, column
//!   overrides, and fields excluded from mapping
//! - `#[derive(SqlEnum)]` persists unit enums as ordinals and reads them back
//!   from ordinals or names
//! - INSERT and UPDATE text with values embedded as SQL literals
//! - Row materialization with strict, NULL-aware coercion
//! - A [`Session`] that drives any [`StatementExecutor`] through asupersync
//!
//! # Quick Start
//!
//! ```ignore
//! use rowmodel::prelude::*;
//!
//! #[derive(Model, Debug, Default, Clone)]
//! struct User {
//!     #[rowmodel(key, column = "Id")]
//!     id: i64,
//!     #[rowmodel(column = "Name")]
//!     name: String,
//!     #[rowmodel(column = "Active")]
//!     active: bool,
//! }
//!
//! async fn example(cx: &Cx, session: &Session<impl StatementExecutor>) {
//!     let mut user = User { id: 0, name: "Ann".to_string(), active: true };
//!
//!     // INSERT INTO [dbo].[User] ([Name], [Active]) OUTPUT INSERTED.Id  VALUES (N'Ann', 1)
//!     session.insert(cx, &mut user).await;
//!
//!     // UPDATE [dbo].[User] SET [Name] = N'Ann', [Active] = 0 WHERE [Id] = ...
//!     user.active = false;
//!     session.update(cx, &user).await;
//!
//!     let users: Outcome<Vec<User>, Error> =
//!         session.query(cx, "SELECT * FROM [dbo].[User]").await;
//! }
//! ```

pub mod session;

// Re-export asupersync primitives
pub use asupersync::{Cx, Outcome};

// Re-export core types
pub use rowmodel_core::{
    ColumnInfo, ColumnMap, DomainErrorKind, EnumVariant, Error, FieldInfo, FromRow, FromSql,
    FromValue, GroupByCount, Model, Result, Row, SqlEnum, StatementExecutor, Value, coerce,
    group_by_count, mapped_fields, materialize, materialize_all, try_get_key,
};

// Re-export derive macros
pub use rowmodel_macros::{Model, SqlEnum};

// Re-export statement generation
pub use rowmodel_query::{
    InsertBuilder, Statement, UpdateBuilder, format_literal, generate_insert, generate_update,
    insert, qualified_table, quote_ident, update,
};

pub use session::{DEFAULT_BATCH_SIZE, Session, SessionBuilder, SessionConfig};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        // asupersync
        Cx,
        Outcome,
        // Core traits and types (Model and SqlEnum are the traits and derives)
        Error,
        FromRow,
        Model,
        Result,
        Row,
        SqlEnum,
        StatementExecutor,
        Value,
        // Session
        Session,
        SessionBuilder,
        SessionConfig,
        // Statement generation
        Statement,
        generate_insert,
        generate_update,
        insert,
        update,
    };
}
