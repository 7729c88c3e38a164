use std::marker::PhantomData;

use crampon_core::{CramponError, FieldMeta, Result, SQL, SQLChunk, Token};

use super::{IntoStatement, Statement};
use crate::model::Model;
use crate::values::PostgresValue;

/// `insert::<M>()` before `values`; it cannot be built yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRows;

/// Rows supplied.
#[derive(Debug, Clone, Copy, Default)]
pub struct WithRows;

/// Builds a multi-row INSERT of model instances.
///
/// Excluded and autoincrement fields are left to the database.
#[derive(Debug, Clone)]
pub struct InsertBuilder<'a, M, State = WithRows> {
    rows: &'a [M],
    returning: bool,
    _state: PhantomData<fn() -> State>,
}

impl<'a, M: Model> InsertBuilder<'a, M, NoRows> {
    pub(crate) fn new() -> Self {
        Self {
            rows: &[],
            returning: false,
            _state: PhantomData,
        }
    }

    /// Rows to insert, in order.
    pub fn values(self, rows: &'a [M]) -> InsertBuilder<'a, M> {
        InsertBuilder {
            rows,
            returning: self.returning,
            _state: PhantomData,
        }
    }
}

fn inserted(meta: &FieldMeta) -> bool {
    !meta.excluded && !meta.autoincrement
}

impl<'a, M: Model> InsertBuilder<'a, M> {
    /// Appends `RETURNING "pk"` so generated keys can be read back.
    pub fn returning_primary_key(mut self) -> Self {
        self.returning = true;
        self
    }

    /// Returns the SQL string and its parameters. Fails when there are no
    /// rows, or when RETURNING is requested for a model without a primary key.
    pub fn build(&self) -> Result<(String, Vec<PostgresValue>)> {
        if self.rows.is_empty() {
            return Err(CramponError::QueryError(
                format!("insert into {} has no rows", M::NAME).into(),
            ));
        }

        let table = M::table();
        let columns = SQL::join(
            table
                .fields
                .iter()
                .filter(|meta| inserted(meta))
                .map(|meta| SQL::<PostgresValue>::ident(meta.storage_key)),
            Token::COMMA,
        );

        let mut tuples = Vec::with_capacity(self.rows.len());
        for row in self.rows {
            let values = row
                .to_values()?
                .into_iter()
                .filter(|(meta, _)| inserted(meta))
                .map(|(_, value)| value);
            let tuple = SQL::param_list(values);
            tuples.push(if tuple.is_empty() {
                SQL::token(Token::DEFAULT).parens()
            } else {
                tuple.parens()
            });
        }

        let mut sql = SQL::token(Token::INSERT)
            .push(Token::INTO)
            .append(SQL::table(table));
        if !columns.is_empty() {
            sql.append_mut(columns.parens());
        }
        sql.push_mut(Token::VALUES);
        sql.append_mut(SQL::join(tuples, Token::COMMA));

        if self.returning {
            let Some(key) = table.primary_key() else {
                return Err(CramponError::QueryError(
                    format!("cannot return the primary key of {}: none declared", M::NAME).into(),
                ));
            };
            sql.push_mut(Token::RETURNING);
            sql.push_mut(SQLChunk::ident(key.storage_key));
        }

        Ok(sql.build_owned())
    }
}

impl<'a, M: Model> IntoStatement for InsertBuilder<'a, M> {
    fn into_statement(self) -> Result<Statement> {
        let (sql, params) = self.build()?;
        Ok(Statement { sql, params })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::insert;
    use crate::types::{Int, Jsonb, Text};

    crate::pg_model! {
        #[derive(Debug, Clone)]
        struct Event in "events" {
            id: i32 => Int { primary_key, autoincrement },
            kind: String => Text,
            payload: serde_json::Value => Jsonb { json },
            scratch: Option<String> { exclude },
        }
    }

    crate::pg_model! {
        #[derive(Debug, Clone)]
        struct Counter {
            id: i32 => Int { primary_key, autoincrement },
        }
    }

    fn event(kind: &str) -> Event {
        Event {
            id: 0,
            kind: kind.into(),
            payload: serde_json::json!({ "ok": true }),
            scratch: Some("ignored".into()),
        }
    }

    #[test]
    fn multi_row_insert_skips_generated_fields() {
        let rows = [event("a"), event("b")];
        let (sql, params) = insert::<Event>()
            .values(&rows)
            .returning_primary_key()
            .build()
            .expect("insert");
        assert_eq!(
            sql,
            r#"INSERT INTO "events" ("kind", "payload") VALUES ($1, $2), ($3, $4) RETURNING "id""#
        );
        assert_eq!(params.len(), 4);
        assert_eq!(params[0], PostgresValue::Text("a".into()));
    }

    #[test]
    fn empty_insert_is_rejected() {
        let err = insert::<Event>().values(&[]).build().unwrap_err();
        assert!(matches!(err, CramponError::QueryError(_)));
    }

    #[test]
    fn all_generated_columns_use_defaults() {
        let rows = [Counter { id: 0 }, Counter { id: 0 }];
        let (sql, params) = insert::<Counter>()
            .values(&rows)
            .returning_primary_key()
            .build()
            .expect("insert");
        assert_eq!(
            sql,
            r#"INSERT INTO "counter" VALUES (DEFAULT), (DEFAULT) RETURNING "id""#
        );
        assert!(params.is_empty());
    }
}
