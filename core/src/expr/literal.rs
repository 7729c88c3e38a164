//! Rust values used directly as operands. Each binds as a parameter and takes
//! the SQL type PostgreSQL would infer for it.

use crate::sql::SQL;
use crate::traits::SQLParam;
use crate::types::{self, Any};

use super::{Expr, NonNull, Null, Scalar};

macro_rules! bound_value {
    ($($rust:ty => $sql:ty),* $(,)?) => {$(
        impl<'a, V: SQLParam + 'a + From<$rust>> Expr<'a, V> for $rust {
            type SQLType = $sql;
            type Nullable = NonNull;
            type Aggregate = Scalar;
        }
    )*};
}

bound_value! {
    i16 => types::SmallInt,
    i32 => types::Int,
    i64 => types::BigInt,
    f32 => types::Float,
    f64 => types::Double,
    bool => types::Bool,
    String => types::Text,
}

#[cfg(feature = "uuid")]
bound_value!(uuid::Uuid => types::Uuid);

#[cfg(feature = "chrono")]
bound_value! {
    chrono::NaiveDate => types::Date,
    chrono::NaiveTime => types::Time,
    chrono::NaiveDateTime => types::Timestamp,
    chrono::DateTime<chrono::FixedOffset> => types::TimestampTz,
}

impl<'a, V: SQLParam + 'a + From<&'a str>> Expr<'a, V> for &'a str {
    type SQLType = types::Text;
    type Nullable = NonNull;
    type Aggregate = Scalar;
}

impl<'a, V: SQLParam + 'a, T: Expr<'a, V>> Expr<'a, V> for Option<T> {
    type SQLType = T::SQLType;
    type Nullable = Null;
    type Aggregate = T::Aggregate;
}

impl<'a, V: SQLParam + 'a, T: Expr<'a, V>> Expr<'a, V> for &T {
    type SQLType = T::SQLType;
    type Nullable = T::Nullable;
    type Aggregate = T::Aggregate;
}

/// Hand-built fragments have no known type and may be NULL.
impl<'a, V: SQLParam + 'a> Expr<'a, V> for SQL<'a, V> {
    type SQLType = Any;
    type Nullable = Null;
    type Aggregate = Scalar;
}
