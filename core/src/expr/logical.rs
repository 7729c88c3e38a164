//! Boolean connectives.
//!
//! `and`/`or` take any number of conditions. One condition renders bare,
//! several are joined and parenthesized, none render nothing. `&`, `|` and
//! `!` are shorthand on [`SQLExpr`].

use std::ops::{BitAnd, BitOr, Not};

use crate::sql::{SQL, SQLChunk, Token};
use crate::traits::{SQLParam, ToSQL};
use crate::types::BooleanLike;

use super::{AggOr, AggregateKind, Condition, Expr, Nullability, SQLExpr};

pub fn not<'a, V, E>(expr: E) -> Condition<'a, V>
where
    V: SQLParam + 'a,
    E: Expr<'a, V>,
    E::SQLType: BooleanLike,
{
    let operand = expr.into_sql();
    let bare = matches!(
        operand.chunks(),
        [SQLChunk::Raw(_) | SQLChunk::Ident(_) | SQLChunk::Column(_)]
    );
    let operand = if bare { operand } else { operand.parens() };
    SQLExpr::new(SQL::token(Token::NOT).append(operand))
}

fn connect<'a, V, E>(conditions: impl IntoIterator<Item = E>, op: Token) -> SQL<'a, V>
where
    V: SQLParam + 'a,
    E: ToSQL<'a, V>,
{
    let parts: Vec<SQL<'a, V>> = conditions.into_iter().map(ToSQL::into_sql).collect();
    match <[SQL<'a, V>; 1]>::try_from(parts) {
        Ok([only]) => only,
        Err(parts) if parts.is_empty() => SQL::empty(),
        Err(parts) => SQL::join(parts, op).parens(),
    }
}

pub fn and<'a, V, I, E>(conditions: I) -> Condition<'a, V>
where
    V: SQLParam + 'a,
    I: IntoIterator<Item = E>,
    E: Expr<'a, V>,
    E::SQLType: BooleanLike,
{
    SQLExpr::new(connect(conditions, Token::AND))
}

pub fn or<'a, V, I, E>(conditions: I) -> Condition<'a, V>
where
    V: SQLParam + 'a,
    I: IntoIterator<Item = E>,
    E: Expr<'a, V>,
    E::SQLType: BooleanLike,
{
    SQLExpr::new(connect(conditions, Token::OR))
}

impl<'a, V, T, N, A> Not for SQLExpr<'a, V, T, N, A>
where
    V: SQLParam + 'a,
    T: BooleanLike,
    N: Nullability,
    A: AggregateKind,
{
    type Output = Condition<'a, V>;

    fn not(self) -> Self::Output {
        not(self)
    }
}

macro_rules! connective {
    ($trait:ident::$method:ident => $token:ident) => {
        impl<'a, V, T, N, A, Rhs> $trait<Rhs> for SQLExpr<'a, V, T, N, A>
        where
            V: SQLParam + 'a,
            T: BooleanLike,
            N: Nullability,
            A: AggregateKind + AggOr<Rhs::Aggregate>,
            Rhs: Expr<'a, V>,
            Rhs::SQLType: BooleanLike,
        {
            type Output = Condition<'a, V>;

            fn $method(self, rhs: Rhs) -> Self::Output {
                SQLExpr::new(super::cmp::infix(self, &[Token::$token], rhs).parens())
            }
        }
    };
}

connective!(BitAnd::bitand => AND);
connective!(BitOr::bitor => OR);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{eq, gt, in_array, is_null};

    #[derive(Debug, Clone, PartialEq)]
    struct Num(i32);

    impl SQLParam for Num {}

    impl From<i32> for Num {
        fn from(value: i32) -> Self {
            Num(value)
        }
    }

    fn col(name: &'static str) -> SQL<'static, Num> {
        SQL::ident(name)
    }

    #[test]
    fn operators_nest_with_parentheses() {
        let cond = eq(col("a"), 1) & (gt(col("b"), 2) | is_null(col("c")));
        let (text, params) = cond.build();
        assert_eq!(text, r#"("a" = $1 AND ("b" > $2 OR "c" IS NULL))"#);
        assert_eq!(params.as_slice(), &[&Num(1), &Num(2)]);
    }

    #[test]
    fn not_parenthesizes_compound_operands() {
        assert_eq!((!eq(col("a"), 1)).sql(), r#"NOT ("a" = $1)"#);
        assert_eq!(not(col("flag")).sql(), r#"NOT "flag""#);
    }

    #[test]
    fn connect_by_arity() {
        assert_eq!(and([eq(col("a"), 1)]).sql(), r#""a" = $1"#);
        assert!(or(Vec::<Condition<'_, Num>>::new()).is_empty());
    }

    #[test]
    fn empty_membership_is_constant() {
        assert_eq!(in_array(col("a"), Vec::<i32>::new()).sql(), "FALSE");
        assert_eq!(
            in_array(col("a"), [1, 2, 3]).sql(),
            r#""a" IN ($1, $2, $3)"#
        );
    }
}
