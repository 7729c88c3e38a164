//! Raw SQL with positional parameters.

use std::borrow::Cow;

use crampon_core::Result;

use super::{IntoStatement, Statement};
use crate::values::PostgresValue;

/// Hand-written SQL. Placeholders are `$1`, `$2`, ... in `params` order.
#[derive(Debug, Clone, PartialEq)]
pub struct Text<'a> {
    sql: Cow<'a, str>,
    params: Vec<PostgresValue>,
}

/// Wraps raw SQL and its parameters.
///
/// ```ignore
/// let query = text("SELECT name FROM users WHERE id = $1", [7]);
/// ```
pub fn text<'a, P>(sql: impl Into<Cow<'a, str>>, params: impl IntoIterator<Item = P>) -> Text<'a>
where
    P: Into<PostgresValue>,
{
    Text {
        sql: sql.into(),
        params: params.into_iter().map(Into::into).collect(),
    }
}

impl<'a> Text<'a> {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[PostgresValue] {
        &self.params
    }
}

impl IntoStatement for Text<'_> {
    fn into_statement(self) -> Result<Statement> {
        Ok(Statement {
            sql: self.sql.into_owned(),
            params: self.params,
        })
    }
}
