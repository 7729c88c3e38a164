//! Typed column references.

use core::fmt;
use core::marker::PhantomData;

use crampon_core::expr::{Expr, Scalar};
use crampon_core::types::DataType;
use crampon_core::{FieldMeta, SQL, ToSQL};

use crate::traits::ColumnValue;
use crate::values::PostgresValue;

/// A column of model `M` with SQL type `T` holding Rust values of type `R`.
///
/// Columns are zero-cost handles onto the model's static [`FieldMeta`]. They
/// render as `"table"."column"` and take part in typed comparisons:
///
/// ```ignore
/// let user = User::columns();
/// let adults = gt(user.age, 18);
/// ```
pub struct Column<M, T, R> {
    meta: &'static FieldMeta,
    _marker: PhantomData<fn() -> (M, T, R)>,
}

impl<M, T, R> Column<M, T, R> {
    pub const fn new(meta: &'static FieldMeta) -> Self {
        Self {
            meta,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub const fn meta(&self) -> &'static FieldMeta {
        self.meta
    }

    /// Rust field name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.meta.name
    }
}

impl<M, T, R> Clone for Column<M, T, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M, T, R> Copy for Column<M, T, R> {}

impl<M, T, R> fmt::Debug for Column<M, T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("table", &self.meta.table)
            .field("name", &self.meta.storage_key)
            .field("sql_type", &self.meta.sql_type)
            .finish()
    }
}

impl<'a, M, T, R> ToSQL<'a, PostgresValue> for Column<M, T, R> {
    fn to_sql(&self) -> SQL<'a, PostgresValue> {
        SQL::column(self.meta)
    }
}

impl<'a, M, T, R> Expr<'a, PostgresValue> for Column<M, T, R>
where
    T: DataType,
    R: ColumnValue,
{
    type SQLType = T;
    type Nullable = R::Nullable;
    type Aggregate = Scalar;
}
