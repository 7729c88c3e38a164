//! Function-call expressions that can be selected.
//!
//! A [`Function`] is a typed SQL expression that also knows the Rust type its
//! result decodes into. Selecting one gives it an `aggregate_<n>` alias;
//! using it in `having` or `order_by` renders the bare expression.

use core::fmt;
use core::marker::PhantomData;

use crampon_core::expr::{AggregateKind, Expr, Nullability, SQLExpr};
use crampon_core::types::{
    BigInt, Bool, Bytes, DataType, Double, Float, Int, Json, Jsonb, SmallInt, Text, VarChar,
};
use crampon_core::{SQL, TableMeta, ToSQL};

use crate::columns::Column;
use crate::model::Model;
use crate::traits::ColumnValue;
use crate::values::PostgresValue;

/// A function result of SQL type `T` that decodes into `R`.
pub struct Function<'a, T: DataType, N: Nullability, A: AggregateKind, R> {
    expr: SQLExpr<'a, PostgresValue, T, N, A>,
    table: Option<&'static TableMeta>,
    _value: PhantomData<fn() -> R>,
}

impl<'a, T: DataType, N: Nullability, A: AggregateKind, R> Function<'a, T, N, A, R> {
    /// Wraps `expr`. `table` is the table the arguments come from, if any;
    /// it becomes the FROM table when the function is selected first.
    pub fn new(
        expr: SQLExpr<'a, PostgresValue, T, N, A>,
        table: Option<&'static TableMeta>,
    ) -> Self {
        Self {
            expr,
            table,
            _value: PhantomData,
        }
    }

    pub fn table(&self) -> Option<&'static TableMeta> {
        self.table
    }

    pub fn into_expr(self) -> SQLExpr<'a, PostgresValue, T, N, A> {
        self.expr
    }
}

impl<'a, T: DataType, N: Nullability, A: AggregateKind, R> Clone for Function<'a, T, N, A, R> {
    fn clone(&self) -> Self {
        Self::new(self.expr.clone(), self.table)
    }
}

impl<'a, T: DataType, N: Nullability, A: AggregateKind, R> fmt::Debug
    for Function<'a, T, N, A, R>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Function").field(&self.expr.sql()).finish()
    }
}

impl<'a, T: DataType, N: Nullability, A: AggregateKind, R> ToSQL<'a, PostgresValue>
    for Function<'a, T, N, A, R>
{
    fn to_sql(&self) -> SQL<'a, PostgresValue> {
        self.expr.to_sql()
    }

    fn into_sql(self) -> SQL<'a, PostgresValue> {
        self.expr.into_sql()
    }
}

impl<'a, T: DataType, N: Nullability, A: AggregateKind, R> Expr<'a, PostgresValue>
    for Function<'a, T, N, A, R>
{
    type SQLType = T;
    type Nullable = N;
    type Aggregate = A;
}

/// Anything a function wrapper accepts: columns, other functions, and typed
/// expressions whose SQL type has a natural Rust counterpart.
pub trait FunctionArg<'a>: Expr<'a, PostgresValue> {
    /// Rust type a value of this argument decodes into.
    type Value: ColumnValue;

    /// Table the argument reads from.
    fn source_table(&self) -> Option<&'static TableMeta>;
}

impl<'a, M: Model, T: DataType, R: ColumnValue> FunctionArg<'a> for Column<M, T, R> {
    type Value = R;

    fn source_table(&self) -> Option<&'static TableMeta> {
        Some(M::table())
    }
}

impl<'a, T, N, A, R> FunctionArg<'a> for Function<'a, T, N, A, R>
where
    T: DataType,
    N: Nullability,
    A: AggregateKind,
    R: ColumnValue,
{
    type Value = R;

    fn source_table(&self) -> Option<&'static TableMeta> {
        self.table
    }
}

impl<'a, T, N, A> FunctionArg<'a> for SQLExpr<'a, PostgresValue, T, N, A>
where
    T: NativeType,
    N: Nullability,
    A: AggregateKind,
{
    type Value = T::Value;

    fn source_table(&self) -> Option<&'static TableMeta> {
        None
    }
}

/// SQL types with a default Rust representation.
pub trait NativeType: DataType {
    type Value: ColumnValue;
}

macro_rules! native_types {
    ($($sql:ty => $rust:ty),* $(,)?) => {
        $(
            impl NativeType for $sql {
                type Value = $rust;
            }
        )*
    };
}

native_types! {
    SmallInt => i16,
    Int => i32,
    BigInt => i64,
    Float => f32,
    Double => f64,
    Text => String,
    VarChar => String,
    Bool => bool,
    Bytes => Vec<u8>,
    Json => serde_json::Value,
    Jsonb => serde_json::Value,
}

#[cfg(feature = "uuid")]
native_types! {
    crampon_core::types::Uuid => uuid::Uuid,
}

#[cfg(feature = "chrono")]
native_types! {
    crampon_core::types::Date => chrono::NaiveDate,
    crampon_core::types::Time => chrono::NaiveTime,
    crampon_core::types::Timestamp => chrono::NaiveDateTime,
    crampon_core::types::TimestampTz => chrono::DateTime<chrono::FixedOffset>,
}
