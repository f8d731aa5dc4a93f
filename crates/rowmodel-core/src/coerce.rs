//! Strict coercion of raw column values into field types.
//!
//! Rules, applied in order:
//!
//! 1. NULL becomes the declared type's default value.
//! 2. A value whose kind is exactly the declared type is used unchanged.
//! 3. Enum fields accept text naming a variant or an integer ordinal of any
//!    width (see [`crate::sql_enum`]).
//! 4. Anything else is an unsupported conversion naming the field and both
//!    types.
//!
//! There is no widening here: an `i32` field receiving a `BIGINT` fails. The
//! lenient path used for scalar query results lives in [`crate::row::FromValue`].

use chrono::NaiveDateTime;

use crate::Result;
use crate::error::Error;
use crate::value::Value;

/// Exact-kind conversion from a non-NULL [`Value`].
///
/// `from_sql` returns `None` when no rule covers the value's kind; `Some(Err)`
/// when a rule applies but the value is rejected (an unknown enum name).
pub trait FromSql: Sized {
    /// Declared type name used in conversion errors.
    const TYPE_NAME: &'static str;

    /// Convert a non-NULL value.
    fn from_sql(value: &Value) -> Option<Result<Self>>;
}

/// Coerce `value` into the type of `field`.
pub fn coerce<T: FromSql + Default>(field: &str, value: &Value) -> Result<T> {
    if value.is_null() {
        return Ok(T::default());
    }
    T::from_sql(value)
        .unwrap_or_else(|| Err(Error::unsupported(field, T::TYPE_NAME, value.type_name())))
}

macro_rules! impl_from_sql_exact {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FromSql for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);

                fn from_sql(value: &Value) -> Option<Result<Self>> {
                    match value {
                        Value::$variant(v) => Some(Ok(*v)),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_from_sql_exact!(
    bool => Bool,
    i8 => TinyInt,
    i16 => SmallInt,
    i32 => Int,
    i64 => BigInt,
    f32 => Float,
    f64 => Double,
    NaiveDateTime => DateTime,
);

impl FromSql for Vec<u8> {
    const TYPE_NAME: &'static str = "Vec<u8>";

    fn from_sql(value: &Value) -> Option<Result<Self>> {
        match value {
            Value::Bytes(b) => Some(Ok(b.clone())),
            _ => None,
        }
    }
}

impl FromSql for String {
    const TYPE_NAME: &'static str = "String";

    fn from_sql(value: &Value) -> Option<Result<Self>> {
        match value {
            Value::Text(s) => Some(Ok(s.clone())),
            _ => None,
        }
    }
}

impl<T: FromSql> FromSql for Option<T> {
    const TYPE_NAME: &'static str = T::TYPE_NAME;

    fn from_sql(value: &Value) -> Option<Result<Self>> {
        T::from_sql(value).map(|r| r.map(Some))
    }
}
