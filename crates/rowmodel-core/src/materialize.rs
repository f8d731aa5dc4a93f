//! Building typed values from result rows.
//!
//! Record types are populated column by column through their [`Model`]
//! setters. Scalars and strings bypass that path and read the first column.

use chrono::NaiveDateTime;

use crate::Result;
use crate::mapping::ColumnMap;
use crate::model::Model;
use crate::row::{FromValue, Row};
use crate::value::Value;

/// Types that can be constructed from a result row.
///
/// `#[derive(Model)]` implements this through [`materialize`].
pub trait FromRow: Sized {
    /// Build a value from one row.
    fn from_row(row: &Row) -> Result<Self>;
}

/// Build a record from `row`.
///
/// Starts from `M::default()` and assigns every column whose name matches a
/// materializable field, ignoring case. Unmatched columns are skipped.
#[tracing::instrument(level = "trace", skip(row), fields(model = M::TABLE_NAME))]
pub fn materialize<M: Model>(row: &Row) -> Result<M> {
    materialize_with(&ColumnMap::of::<M>(), row)
}

/// Build one record per row, resolving the column map once.
pub fn materialize_all<M: Model>(rows: &[Row]) -> Result<Vec<M>> {
    let columns = ColumnMap::of::<M>();
    rows.iter().map(|row| materialize_with(&columns, row)).collect()
}

fn materialize_with<M: Model>(columns: &ColumnMap, row: &Row) -> Result<M> {
    let mut record = M::default();
    for (column, value) in row.iter() {
        match columns.get(column) {
            Some(field) => record.set_field(field.name, value)?,
            None => tracing::trace!(
                model = M::TABLE_NAME,
                column = %column,
                "Ignoring column with no matching field"
            ),
        }
    }
    Ok(record)
}

macro_rules! impl_from_row_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromRow for $ty {
                fn from_row(row: &Row) -> Result<Self> {
                    row.get_as::<$ty>(0)
                }
            }
        )*
    };
}

impl_from_row_scalar!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    u64,
    f32,
    f64,
    String,
    Vec<u8>,
    NaiveDateTime,
    Value,
);

impl<T: FromValue> FromRow for Option<T> {
    fn from_row(row: &Row) -> Result<Self> {
        row.get_as::<Option<T>>(0)
    }
}
