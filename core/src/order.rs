//! ORDER BY terms.

use crate::sql::{SQL, Token};
use crate::traits::{SQLParam, ToSQL};

/// Sort direction of an ORDER BY term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub const fn token(self) -> Token {
        match self {
            Direction::Asc => Token::ASC,
            Direction::Desc => Token::DESC,
        }
    }
}

/// A single ORDER BY term: an expression plus its direction.
///
/// ```ignore
/// select(User::all()).order_by([OrderBy::desc(users.age), OrderBy::asc(users.name)])
/// ```
#[derive(Debug, Clone)]
pub struct OrderBy<'a, V: SQLParam> {
    expr: SQL<'a, V>,
    direction: Direction,
}

impl<'a, V: SQLParam + 'a> OrderBy<'a, V> {
    pub fn new(expr: impl ToSQL<'a, V>, direction: Direction) -> Self {
        Self {
            expr: expr.into_sql(),
            direction,
        }
    }

    pub fn asc(expr: impl ToSQL<'a, V>) -> Self {
        Self::new(expr, Direction::Asc)
    }

    pub fn desc(expr: impl ToSQL<'a, V>) -> Self {
        Self::new(expr, Direction::Desc)
    }

    pub const fn direction(&self) -> Direction {
        self.direction
    }
}

impl<'a, V: SQLParam + 'a> ToSQL<'a, V> for OrderBy<'a, V> {
    fn to_sql(&self) -> SQL<'a, V> {
        self.expr.clone().push(self.direction.token())
    }

    fn into_sql(self) -> SQL<'a, V> {
        self.expr.push(self.direction.token())
    }
}
