//! Query builders for PostgreSQL.
//!
//! ```ignore
//! use crampon_postgres::prelude::*;
//!
//! let user = User::columns();
//! let (sql, params) = select(User::all())
//!     .r#where(gt(user.age, 18))
//!     .order_by([OrderBy::asc(user.name)])
//!     .limit(10)
//!     .build();
//! ```

pub mod delete;
pub mod insert;
pub mod select;
pub mod text;
pub mod update;

use crampon_core::{CramponError, Result, SQL, ToSQL, Token};

use crate::model::Model;
use crate::values::PostgresValue;

pub use delete::{DeleteBuilder, delete_instance};
pub use insert::{InsertBuilder, NoRows};
pub use select::{PreparedSelect, SelectBuilder};
pub use text::{Text, text};
pub use update::{UpdateBuilder, update_changes, update_instance};

/// Rendered SQL with its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<PostgresValue>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Vec<PostgresValue>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

/// Anything that renders to a [`Statement`].
pub trait IntoStatement {
    fn into_statement(self) -> Result<Statement>;
}

impl IntoStatement for Statement {
    fn into_statement(self) -> Result<Statement> {
        Ok(self)
    }
}

/// Begins a SELECT over `selection`.
pub fn select<'a, S: crate::selection::Selection<'a>>(
    selection: S,
) -> SelectBuilder<'a, S::Output> {
    SelectBuilder::new(selection)
}

/// Begins an UPDATE of `M`'s table.
pub fn update<'a, M: Model>() -> UpdateBuilder<'a, M> {
    UpdateBuilder::new()
}

/// Begins a DELETE from `M`'s table.
pub fn delete<'a, M: Model>() -> DeleteBuilder<'a, M> {
    DeleteBuilder::new()
}

/// Begins an INSERT into `M`'s table.
pub fn insert<'a, M: Model>() -> InsertBuilder<'a, M, NoRows> {
    InsertBuilder::new()
}

/// `KEYWORD a <sep> b ...`, or nothing for an empty list.
pub(crate) fn keyword_list<'a>(
    keyword: Token,
    items: &[SQL<'a, PostgresValue>],
    separator: Token,
) -> SQL<'a, PostgresValue> {
    if items.is_empty() {
        return SQL::empty();
    }
    SQL::token(keyword).append(SQL::join(items.iter().cloned(), separator))
}

/// `WHERE a AND b ...`
pub(crate) fn where_clause<'a>(
    keyword: Token,
    conditions: &[SQL<'a, PostgresValue>],
) -> SQL<'a, PostgresValue> {
    keyword_list(keyword, conditions, Token::AND)
}

/// `"column" = value`
pub(crate) fn assignment<'a>(
    column: &'static str,
    value: impl ToSQL<'a, PostgresValue>,
) -> SQL<'a, PostgresValue> {
    SQL::ident(column).push(Token::EQ).append(value.into_sql())
}

/// `WHERE "table"."pk" = $n` for one model instance. `action` names the
/// statement in the error raised for a model without a usable key.
pub(crate) fn key_filter<'a, M: Model>(model: &M, action: &str) -> Result<SQL<'a, PostgresValue>> {
    match model.primary_key_value()? {
        Some(value) => key_equals::<M>(value, action),
        None => Err(no_key::<M>(action, "model has no primary key")),
    }
}

/// `WHERE "table"."pk" = $n` for a known key value.
pub(crate) fn key_equals<'a, M: Model>(
    value: PostgresValue,
    action: &str,
) -> Result<SQL<'a, PostgresValue>> {
    let Some(key) = M::table().primary_key() else {
        return Err(no_key::<M>(action, "model has no primary key"));
    };
    Ok(SQL::token(Token::WHERE)
        .append(SQL::column(key))
        .push(Token::EQ)
        .append(SQL::param(value)))
}

fn no_key<M: Model>(action: &str, why: &str) -> CramponError {
    CramponError::QueryError(format!("cannot {action} {}: {why}", M::NAME).into())
}
