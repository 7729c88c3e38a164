use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;

use crate::sql::SQL;
use crate::traits::{SQLParam, ToSQL};
use crate::types::{Bool, DataType};

use super::{AggregateKind, Expr, NonNull, Nullability, Scalar};

/// Rendered SQL tagged with its type `T`, nullability `N` and aggregation `A`.
///
/// Derefs to the underlying [`SQL`], so `.sql()` and `.build()` work on any
/// expression directly.
pub struct SQLExpr<'a, V: SQLParam, T: DataType, N: Nullability = NonNull, A: AggregateKind = Scalar>
{
    inner: SQL<'a, V>,
    marker: PhantomData<fn() -> (T, N, A)>,
}

/// What every comparison and logical operator yields.
pub type Condition<'a, V> = SQLExpr<'a, V, Bool, NonNull, Scalar>;

impl<'a, V: SQLParam, T: DataType, N: Nullability, A: AggregateKind> SQLExpr<'a, V, T, N, A> {
    #[inline]
    pub fn new(inner: SQL<'a, V>) -> Self {
        Self {
            inner,
            marker: PhantomData,
        }
    }
}

impl<'a, V: SQLParam, T: DataType, N: Nullability, A: AggregateKind> Clone
    for SQLExpr<'a, V, T, N, A>
{
    fn clone(&self) -> Self {
        Self::new(self.inner.clone())
    }
}

impl<'a, V: SQLParam, T: DataType, N: Nullability, A: AggregateKind> fmt::Debug
    for SQLExpr<'a, V, T, N, A>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SQLExpr<{}>({})", T::NAME, self.inner)
    }
}

impl<'a, V: SQLParam, T: DataType, N: Nullability, A: AggregateKind> Deref
    for SQLExpr<'a, V, T, N, A>
{
    type Target = SQL<'a, V>;

    fn deref(&self) -> &SQL<'a, V> {
        &self.inner
    }
}

impl<'a, V: SQLParam + 'a, T: DataType, N: Nullability, A: AggregateKind> ToSQL<'a, V>
    for SQLExpr<'a, V, T, N, A>
{
    fn to_sql(&self) -> SQL<'a, V> {
        self.inner.clone()
    }

    fn into_sql(self) -> SQL<'a, V> {
        self.inner
    }
}

impl<'a, V: SQLParam + 'a, T: DataType, N: Nullability, A: AggregateKind> Expr<'a, V>
    for SQLExpr<'a, V, T, N, A>
{
    type SQLType = T;
    type Nullable = N;
    type Aggregate = A;
}

impl<'a, V: SQLParam, T: DataType, N: Nullability, A: AggregateKind>
    From<SQLExpr<'a, V, T, N, A>> for SQL<'a, V>
{
    fn from(expr: SQLExpr<'a, V, T, N, A>) -> Self {
        expr.inner
    }
}
