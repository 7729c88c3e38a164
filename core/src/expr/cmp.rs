//! Predicates. Both sides of a comparison must have [`Compatible`] SQL
//! types; pattern matches require [`Textual`] operands.

use crate::sql::{SQL, Token};
use crate::traits::{SQLParam, ToSQL};
use crate::types::{Compatible, Textual};

use super::{Condition, Expr, SQLExpr};

/// `left <op> right`, wrapping subquery operands.
pub(crate) fn infix<'a, V: SQLParam + 'a>(
    left: impl ToSQL<'a, V>,
    op: &[Token],
    right: impl ToSQL<'a, V>,
) -> SQL<'a, V> {
    let mut sql = left.into_sql().parens_if_subquery();
    for token in op {
        sql.push_mut(*token);
    }
    sql.append(right.into_sql().parens_if_subquery())
}

macro_rules! comparisons {
    ($($(#[$doc:meta])* $name:ident => $($token:ident)+;)*) => {$(
        $(#[$doc])*
        pub fn $name<'a, V, L, R>(left: L, right: R) -> Condition<'a, V>
        where
            V: SQLParam + 'a,
            L: Expr<'a, V>,
            R: Expr<'a, V>,
            L::SQLType: Compatible<R::SQLType>,
        {
            SQLExpr::new(infix(left, &[$(Token::$token),+], right))
        }
    )*};
}

comparisons! {
    /// `left = right`
    ///
    /// ```ignore
    /// eq(users.id, 10);        // ok
    /// eq(users.id, users.age); // ok, both integers
    /// eq(users.id, "bob");     // does not compile
    /// ```
    eq => EQ;
    /// `left <> right`
    neq => NE;
    /// `left > right`
    gt => GT;
    /// `left >= right`
    gte => GE;
    /// `left < right`
    lt => LT;
    /// `left <= right`
    lte => LE;
}

macro_rules! pattern_matches {
    ($($name:ident => $($token:ident)+;)*) => {$(
        pub fn $name<'a, V, L, R>(value: L, pattern: R) -> Condition<'a, V>
        where
            V: SQLParam + 'a,
            L: Expr<'a, V, SQLType: Textual>,
            R: Expr<'a, V, SQLType: Textual>,
        {
            SQLExpr::new(infix(value, &[$(Token::$token),+], pattern))
        }
    )*};
}

pattern_matches! {
    like => LIKE;
    not_like => NOT LIKE;
}

/// PostgreSQL rejects `IN ()`, so an empty list collapses to the constant
/// the membership test would have produced.
fn membership<'a, V, E, I>(expr: E, values: I, op: &[Token], when_empty: Token) -> SQL<'a, V>
where
    V: SQLParam + 'a,
    E: ToSQL<'a, V>,
    I: IntoIterator,
    I::Item: ToSQL<'a, V>,
{
    let list = SQL::join(values, Token::COMMA);
    if list.is_empty() {
        SQL::token(when_empty)
    } else {
        infix(expr, op, list.parens())
    }
}

/// `expr IN (...)`, or `FALSE` for no values.
pub fn in_array<'a, V, E, I>(expr: E, values: I) -> Condition<'a, V>
where
    V: SQLParam + 'a,
    E: Expr<'a, V>,
    I: IntoIterator,
    I::Item: Expr<'a, V>,
    E::SQLType: Compatible<<I::Item as Expr<'a, V>>::SQLType>,
{
    SQLExpr::new(membership(expr, values, &[Token::IN], Token::FALSE))
}

/// `expr NOT IN (...)`, or `TRUE` for no values.
pub fn not_in_array<'a, V, E, I>(expr: E, values: I) -> Condition<'a, V>
where
    V: SQLParam + 'a,
    E: Expr<'a, V>,
    I: IntoIterator,
    I::Item: Expr<'a, V>,
    E::SQLType: Compatible<<I::Item as Expr<'a, V>>::SQLType>,
{
    SQLExpr::new(membership(expr, values, &[Token::NOT, Token::IN], Token::TRUE))
}

/// `(expr BETWEEN low AND high)`. Both bounds are inclusive.
pub fn between<'a, V, E, L, H>(expr: E, low: L, high: H) -> Condition<'a, V>
where
    V: SQLParam + 'a,
    E: Expr<'a, V>,
    L: Expr<'a, V>,
    H: Expr<'a, V>,
    E::SQLType: Compatible<L::SQLType> + Compatible<H::SQLType>,
{
    let range = infix(low, &[Token::AND], high);
    SQLExpr::new(infix(expr, &[Token::BETWEEN], range).parens())
}

macro_rules! null_tests {
    ($($(#[$doc:meta])* $name:ident => $($token:ident)+;)*) => {$(
        $(#[$doc])*
        pub fn $name<'a, V: SQLParam + 'a>(expr: impl Expr<'a, V>) -> Condition<'a, V> {
            let mut sql = expr.into_sql();
            $(sql.push_mut(Token::$token);)+
            SQLExpr::new(sql)
        }
    )*};
}

null_tests! {
    is_null => IS NULL;
    /// Also accepts non-nullable operands, where it is always true.
    is_not_null => IS NOT NULL;
}
