//! `+ - * /` on numeric expressions. The result type widens per
//! [`ArithmeticOutput`]; NULL and aggregate markers carry over from either
//! side. Every result is parenthesized, so nesting follows the Rust
//! expression rather than SQL precedence.

use std::ops::{Add, Div, Mul, Sub};

use crate::sql::Token;
use crate::traits::SQLParam;
use crate::types::{ArithmeticOutput, Numeric};

use super::cmp::infix;
use super::{AggOr, Expr, NullOr, SQLExpr};

type Widened<'a, V, T, N, A, Rhs> = SQLExpr<
    'a,
    V,
    <T as ArithmeticOutput<<Rhs as Expr<'a, V>>::SQLType>>::Output,
    <N as NullOr<<Rhs as Expr<'a, V>>::Nullable>>::Output,
    <A as AggOr<<Rhs as Expr<'a, V>>::Aggregate>>::Output,
>;

macro_rules! arithmetic {
    ($($trait:ident::$method:ident => $token:ident),* $(,)?) => {$(
        impl<'a, V, T, N, A, Rhs> $trait<Rhs> for SQLExpr<'a, V, T, N, A>
        where
            V: SQLParam + 'a,
            T: ArithmeticOutput<Rhs::SQLType>,
            N: NullOr<Rhs::Nullable>,
            A: AggOr<Rhs::Aggregate>,
            Rhs: Expr<'a, V>,
            Rhs::SQLType: Numeric,
        {
            type Output = Widened<'a, V, T, N, A, Rhs>;

            fn $method(self, rhs: Rhs) -> Self::Output {
                SQLExpr::new(infix(self, &[Token::$token], rhs).parens())
            }
        }
    )*};
}

arithmetic! {
    Add::add => PLUS,
    Sub::sub => MINUS,
    Mul::mul => STAR,
    Div::div => SLASH,
}
