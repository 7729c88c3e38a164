//! Aggregate calls. Results are marked [`Agg`]; everything except the
//! `COUNT` family is nullable since an empty group aggregates to NULL.

use crate::sql::{SQL, Token};
use crate::traits::SQLParam;
use crate::types::{BigInt, Double, Numeric};

use super::{Agg, Expr, NonNull, Null, SQLExpr};

pub type Counted<'a, V> = SQLExpr<'a, V, BigInt, NonNull, Agg>;

pub fn count_all<'a, V: SQLParam + 'a>() -> Counted<'a, V> {
    SQLExpr::new(SQL::func("COUNT", SQL::token(Token::STAR)))
}

/// Non-null values of `expr`.
pub fn count<'a, V: SQLParam + 'a, E: Expr<'a, V>>(expr: E) -> Counted<'a, V> {
    SQLExpr::new(SQL::func("COUNT", expr.into_sql()))
}

pub fn count_distinct<'a, V: SQLParam + 'a, E: Expr<'a, V>>(expr: E) -> Counted<'a, V> {
    let arg = SQL::token(Token::DISTINCT).append(expr.into_sql());
    SQLExpr::new(SQL::func("COUNT", arg))
}

macro_rules! same_type_aggregate {
    ($($name:ident => $func:literal $(where $bound:ident)?;)*) => {$(
        pub fn $name<'a, V, E>(expr: E) -> SQLExpr<'a, V, E::SQLType, Null, Agg>
        where
            V: SQLParam + 'a,
            E: Expr<'a, V>,
            $(E::SQLType: $bound,)?
        {
            SQLExpr::new(SQL::func($func, expr.into_sql()))
        }
    )*};
}

same_type_aggregate! {
    min => "MIN";
    max => "MAX";
}

/// `SUM`, cast back to the argument type when the server would widen it to
/// NUMERIC.
pub fn sum<'a, V, E>(expr: E) -> SQLExpr<'a, V, E::SQLType, Null, Agg>
where
    V: SQLParam + 'a,
    E: Expr<'a, V>,
    E::SQLType: Numeric,
{
    let total = SQL::func("SUM", expr.into_sql());
    match <E::SQLType as Numeric>::SUM_CAST {
        Some(target) => {
            let cast = total.push(Token::AS).append(SQL::raw(target));
            SQLExpr::new(SQL::func("CAST", cast))
        }
        None => SQLExpr::new(total),
    }
}

/// `AVG` cast to DOUBLE PRECISION. Integer input would otherwise come back
/// as NUMERIC, which does not decode to `f64`.
pub fn avg<'a, V, E>(expr: E) -> SQLExpr<'a, V, Double, Null, Agg>
where
    V: SQLParam + 'a,
    E: Expr<'a, V>,
    E::SQLType: Numeric,
{
    let cast = SQL::func("AVG", expr.into_sql())
        .push(Token::AS)
        .append(SQL::raw("DOUBLE PRECISION"));
    SQLExpr::new(SQL::func("CAST", cast))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Unit;

    impl SQLParam for Unit {}

    fn amount() -> SQL<'static, Unit> {
        SQL::ident("amount")
    }

    #[test]
    fn calls_render_with_arguments() {
        assert_eq!(count_all::<Unit>().sql(), "COUNT(*)");
        assert_eq!(count_distinct(amount()).sql(), r#"COUNT(DISTINCT "amount")"#);
        assert_eq!(min(amount()).sql(), r#"MIN("amount")"#);
        assert_eq!(
            avg(amount()).sql(),
            r#"CAST(AVG("amount") AS DOUBLE PRECISION)"#
        );
    }

    #[test]
    fn bigint_sum_stays_bigint() {
        let wide = SQLExpr::<Unit, BigInt>::new(amount());
        assert_eq!(sum(wide).sql(), r#"CAST(SUM("amount") AS BIGINT)"#);

        let narrow = SQLExpr::<Unit, crate::types::Int>::new(amount());
        assert_eq!(sum(narrow).sql(), r#"SUM("amount")"#);
    }
}
