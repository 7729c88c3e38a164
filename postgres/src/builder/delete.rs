use std::marker::PhantomData;

use crampon_core::expr::Expr;
use crampon_core::types::BooleanLike;
use crampon_core::{Result, SQL, TableMeta, ToSQL, Token};
use smallvec::SmallVec;

use super::{IntoStatement, Statement, key_filter, where_clause};
use crate::model::Model;
use crate::values::PostgresValue;

/// Builds a DELETE from `M`'s table. Without a WHERE it deletes every row.
///
/// Repeated `where` calls are ANDed.
#[derive(Debug, Clone)]
pub struct DeleteBuilder<'a, M> {
    filters: SmallVec<[SQL<'a, PostgresValue>; 2]>,
    _model: PhantomData<fn() -> M>,
}

impl<'a, M: Model> DeleteBuilder<'a, M> {
    pub(crate) fn new() -> Self {
        Self {
            filters: SmallVec::new(),
            _model: PhantomData,
        }
    }

    pub fn r#where<E>(mut self, condition: E) -> Self
    where
        E: Expr<'a, PostgresValue>,
        E::SQLType: BooleanLike,
    {
        self.filters.push(condition.into_sql());
        self
    }

    pub fn build(&self) -> (String, Vec<PostgresValue>) {
        self.to_sql().build_owned()
    }
}

fn delete_from<'a>(table: &'static TableMeta) -> SQL<'a, PostgresValue> {
    SQL::token(Token::DELETE).push(Token::FROM).append(SQL::table(table))
}

impl<'a, M: Model> ToSQL<'a, PostgresValue> for DeleteBuilder<'a, M> {
    fn to_sql(&self) -> SQL<'a, PostgresValue> {
        delete_from(M::table()).append(where_clause(Token::WHERE, &self.filters))
    }
}

impl<'a, M: Model> IntoStatement for DeleteBuilder<'a, M> {
    fn into_statement(self) -> Result<Statement> {
        let (sql, params) = self.build();
        Ok(Statement { sql, params })
    }
}

/// DELETE of one instance by its primary key.
pub fn delete_instance<M: Model>(model: &M) -> Result<Statement> {
    let (sql, params) = delete_from(M::table())
        .append(key_filter(model, "delete")?)
        .build_owned();
    Ok(Statement { sql, params })
}
