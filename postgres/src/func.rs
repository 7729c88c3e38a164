//! Function wrappers for columns and expressions.
//!
//! ```ignore
//! use crampon_postgres::func;
//!
//! let query = select((User::all(), func::count(user.id)))
//!     .group_by([user.id]);
//! ```

use crampon_core::expr::{self, Agg, NonNull, Null};
use crampon_core::types::{BigInt, Double, Numeric};
use crampon_core::{SQL, Token};

use crate::functions::{Function, FunctionArg};
use crate::traits::ColumnValue;

type Base<'a, E> = <<E as FunctionArg<'a>>::Value as ColumnValue>::Base;

/// `COUNT(*)`. Selected alone it needs an explicit `.from::<M>()`.
pub fn count_all<'a>() -> Function<'a, BigInt, NonNull, Agg, i64> {
    Function::new(expr::count_all(), None)
}

/// `COUNT(arg)`, decoded as `i64`.
pub fn count<'a, E: FunctionArg<'a>>(arg: E) -> Function<'a, BigInt, NonNull, Agg, i64> {
    let table = arg.source_table();
    Function::new(expr::count(arg), table)
}

/// `DISTINCT arg`. Usually wrapped again, as in `count(distinct(col))`.
pub fn distinct<'a, E: FunctionArg<'a>>(
    arg: E,
) -> Function<'a, E::SQLType, E::Nullable, E::Aggregate, E::Value> {
    let table = arg.source_table();
    Function::new(
        expr::SQLExpr::new(SQL::token(Token::DISTINCT).append(arg.into_sql())),
        table,
    )
}

/// `SUM(arg)`. NULL over an empty group.
pub fn sum<'a, E>(arg: E) -> Function<'a, E::SQLType, Null, Agg, Option<Base<'a, E>>>
where
    E: FunctionArg<'a>,
    E::SQLType: Numeric,
    Option<Base<'a, E>>: ColumnValue,
{
    let table = arg.source_table();
    Function::new(expr::sum(arg), table)
}

/// `AVG(arg)` as DOUBLE PRECISION.
pub fn avg<'a, E>(arg: E) -> Function<'a, Double, Null, Agg, Option<f64>>
where
    E: FunctionArg<'a>,
    E::SQLType: Numeric,
{
    let table = arg.source_table();
    Function::new(expr::avg(arg), table)
}

pub fn max<'a, E>(arg: E) -> Function<'a, E::SQLType, Null, Agg, Option<Base<'a, E>>>
where
    E: FunctionArg<'a>,
    Option<Base<'a, E>>: ColumnValue,
{
    let table = arg.source_table();
    Function::new(expr::max(arg), table)
}

pub fn min<'a, E>(arg: E) -> Function<'a, E::SQLType, Null, Agg, Option<Base<'a, E>>>
where
    E: FunctionArg<'a>,
    Option<Base<'a, E>>: ColumnValue,
{
    let table = arg.source_table();
    Function::new(expr::min(arg), table)
}
