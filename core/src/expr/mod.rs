//! Typed SQL expressions.
//!
//! Every [`Expr`] knows three things at the type level: which SQL type it
//! produces, whether it may be NULL and whether it aggregates. Comparisons,
//! boolean logic and arithmetic consult those facts, so `users.id = 'bob'`
//! fails to compile instead of failing at the server.
//!
//! ```ignore
//! use crampon_core::expr::*;
//!
//! let adults = gt(users.age, 18) & is_not_null(users.email);
//! let total = sum(orders.amount);
//! ```

mod agg;
mod cmp;
mod literal;
mod logical;
mod ops;
mod typed;

pub use agg::*;
pub use cmp::*;
pub use logical::*;
pub use typed::*;

use crate::traits::{SQLParam, ToSQL};
use crate::types::DataType;

mod sealed {
    pub trait Marker: Copy + Default + Send + Sync + 'static {}
}

/// [`NonNull`] or [`Null`].
pub trait Nullability: sealed::Marker {}

/// [`Scalar`] or [`Agg`].
pub trait AggregateKind: sealed::Marker {}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NonNull;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Null;

/// Evaluated once per row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scalar;

/// Evaluated once per group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Agg;

impl sealed::Marker for NonNull {}
impl sealed::Marker for Null {}
impl sealed::Marker for Scalar {}
impl sealed::Marker for Agg {}
impl Nullability for NonNull {}
impl Nullability for Null {}
impl AggregateKind for Scalar {}
impl AggregateKind for Agg {}

/// Nullability of an expression built from two operands.
pub trait NullOr<Rhs: Nullability>: Nullability {
    type Output: Nullability;
}

impl<R: Nullability> NullOr<R> for NonNull {
    type Output = R;
}

impl<R: Nullability> NullOr<R> for Null {
    type Output = Null;
}

/// Aggregation of an expression built from two operands.
pub trait AggOr<Rhs: AggregateKind>: AggregateKind {
    type Output: AggregateKind;
}

impl<R: AggregateKind> AggOr<R> for Scalar {
    type Output = R;
}

impl<R: AggregateKind> AggOr<R> for Agg {
    type Output = Agg;
}

#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be used as a typed SQL expression",
    label = "expected a column, a literal, or an expression built with crampon helpers"
)]
pub trait Expr<'a, V: SQLParam>: ToSQL<'a, V> {
    type SQLType: DataType;
    type Nullable: Nullability;
    type Aggregate: AggregateKind;
}
