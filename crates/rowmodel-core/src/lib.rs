//! Core types and traits for rowmodel.
//!
//! This crate provides the foundational abstractions for mapping records to
//! rows:
//!
//! - `Model` trait and `FieldInfo` descriptors for record types
//! - `SqlEnum` for enums persisted as ordinals
//! - Metadata resolution (`mapped_fields`, `try_get_key`)
//! - Strict value coercion and row materialization
//! - `StatementExecutor` trait for the database side
//! - `Outcome` re-export from asupersync for cancel-correct operations
//! - `Cx` context for structured concurrency

// Re-export asupersync primitives for structured concurrency
pub use asupersync::{Cx, Outcome};

pub mod batch;
pub mod coerce;
pub mod error;
pub mod executor;
pub mod field;
pub mod mapping;
pub mod materialize;
pub mod model;
pub mod row;
pub mod sql_enum;
pub mod value;

pub use batch::{GroupByCount, group_by_count};
pub use coerce::{FromSql, coerce};
pub use error::{
    ConfigError, ConversionError, DomainError, DomainErrorKind, Error, QueryError,
    QueryErrorKind, Result, TypeError,
};
pub use executor::StatementExecutor;
pub use field::FieldInfo;
pub use mapping::{ColumnMap, mapped_fields, try_get_key};
pub use materialize::{FromRow, materialize, materialize_all};
pub use model::Model;
pub use row::{ColumnInfo, FromValue, Row};
pub use sql_enum::{EnumVariant, SqlEnum, enum_from_ordinal, enum_from_text, enum_from_value};
pub use value::Value;
