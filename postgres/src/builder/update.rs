use std::marker::PhantomData;

use crampon_core::expr::Expr;
use crampon_core::types::{BooleanLike, Compatible, DataType};
use crampon_core::{CramponError, Result, SQL, TableMeta, ToSQL, Token};
use smallvec::SmallVec;

use super::{IntoStatement, Statement, assignment, key_equals, key_filter, where_clause};
use crate::columns::Column;
use crate::model::Model;
use crate::tracked::Tracked;
use crate::values::PostgresValue;

/// Nothing assigned yet; only `set` is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unassigned;

/// At least one column assigned.
#[derive(Debug, Clone, Copy, Default)]
pub struct Assigned;

/// Filtered; further `where` calls are ANDed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Filtered;

/// States that accept `set`. Assignments all come before WHERE.
pub trait Settable {}
impl Settable for Unassigned {}
impl Settable for Assigned {}

/// States that accept `where`.
pub trait Filterable {}
impl Filterable for Assigned {}
impl Filterable for Filtered {}

/// Builds an UPDATE of `M`'s table.
///
/// ```ignore
/// update::<Ticket>().set(ticket.points, 3).r#where(eq(ticket.id, 7));
/// ```
#[derive(Debug, Clone)]
pub struct UpdateBuilder<'a, M, State = Unassigned> {
    assignments: SmallVec<[SQL<'a, PostgresValue>; 4]>,
    filters: SmallVec<[SQL<'a, PostgresValue>; 2]>,
    _marker: PhantomData<fn() -> (M, State)>,
}

impl<'a, M: Model> UpdateBuilder<'a, M> {
    pub(crate) fn new() -> Self {
        Self {
            assignments: SmallVec::new(),
            filters: SmallVec::new(),
            _marker: PhantomData,
        }
    }
}

impl<'a, M: Model, S> UpdateBuilder<'a, M, S> {
    fn into_state<T>(self) -> UpdateBuilder<'a, M, T> {
        let Self {
            assignments,
            filters,
            ..
        } = self;
        UpdateBuilder {
            assignments,
            filters,
            _marker: PhantomData,
        }
    }

    /// Fails when no column is assigned.
    pub fn build(&self) -> Result<(String, Vec<PostgresValue>)> {
        if self.assignments.is_empty() {
            return Err(no_columns::<M>());
        }
        Ok(self.to_sql().build_owned())
    }
}

fn no_columns<M: Model>() -> CramponError {
    CramponError::QueryError(format!("update of {} has no SET columns", M::NAME).into())
}

impl<'a, M: Model, S: Settable> UpdateBuilder<'a, M, S> {
    /// Assigns `value` to `column`.
    pub fn set<T, R, E>(
        self,
        column: Column<M, T, R>,
        value: E,
    ) -> UpdateBuilder<'a, M, Assigned>
    where
        T: DataType + Compatible<E::SQLType>,
        E: Expr<'a, PostgresValue>,
    {
        let mut next = self.into_state::<Assigned>();
        next.assignments
            .push(assignment(column.meta().storage_key, value));
        next
    }
}

impl<'a, M: Model, S: Filterable> UpdateBuilder<'a, M, S> {
    pub fn r#where<E>(self, condition: E) -> UpdateBuilder<'a, M, Filtered>
    where
        E: Expr<'a, PostgresValue>,
        E::SQLType: BooleanLike,
    {
        let mut next = self.into_state::<Filtered>();
        next.filters.push(condition.into_sql());
        next
    }
}

fn update_head<'a>(table: &'static TableMeta) -> SQL<'a, PostgresValue> {
    SQL::token(Token::UPDATE).append(SQL::table(table)).push(Token::SET)
}

impl<'a, M: Model, S> ToSQL<'a, PostgresValue> for UpdateBuilder<'a, M, S> {
    fn to_sql(&self) -> SQL<'a, PostgresValue> {
        update_head(M::table())
            .append(SQL::join(self.assignments.iter().cloned(), Token::COMMA))
            .append(where_clause(Token::WHERE, &self.filters))
    }
}

impl<'a, M: Model, S> IntoStatement for UpdateBuilder<'a, M, S> {
    fn into_statement(self) -> Result<Statement> {
        let (sql, params) = self.build()?;
        Ok(Statement { sql, params })
    }
}

/// Full-row UPDATE of one instance, keyed by its primary key.
///
/// Every stored, non-key field is written. Fails with `QueryError` when the
/// model declares no primary key.
pub fn update_instance<M: Model>(model: &M) -> Result<Statement> {
    let filter = key_filter(model, "update")?;
    let assignments: SmallVec<[SQL<'_, PostgresValue>; 8]> = model
        .to_values()?
        .into_iter()
        .filter(|(meta, _)| !meta.primary_key)
        .map(|(meta, value)| assignment(meta.storage_key, SQL::param(value)))
        .collect();
    if assignments.is_empty() {
        return Err(no_columns::<M>());
    }
    let (sql, params) = update_head(M::table())
        .append(SQL::join(assignments, Token::COMMA))
        .append(filter)
        .build_owned();
    Ok(Statement { sql, params })
}

/// UPDATE of the fields changed since `tracked` was last saved, keyed by the
/// saved primary key. `None` when nothing changed.
pub fn update_changes<M: Model>(tracked: &Tracked<M>) -> Result<Option<Statement>> {
    let changes = tracked.changes()?;
    if changes.is_empty() {
        return Ok(None);
    }
    let filter = match tracked.saved_primary_key() {
        Some(key) => key_equals::<M>(key.clone(), "update")?,
        None => key_filter(tracked.get(), "update")?,
    };
    let assignments = changes
        .into_iter()
        .map(|(meta, value)| assignment(meta.storage_key, SQL::param(value)));
    let (sql, params) = update_head(M::table())
        .append(SQL::join(assignments, Token::COMMA))
        .append(filter)
        .build_owned();
    Ok(Some(Statement { sql, params }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::update;
    use crate::types::{Int, Text};
    use crampon_core::expr::eq;

    crate::pg_model! {
        #[derive(Debug, Clone)]
        struct Ticket in "tickets" {
            id: i32 => Int { primary_key, autoincrement },
            title: String => Text,
            points: i32 => Int,
        }
    }

    crate::pg_model! {
        #[derive(Debug, Clone)]
        struct Note {
            body: String => Text,
        }
    }

    #[test]
    fn set_then_where() {
        let ticket = Ticket::columns();
        let (sql, params) = update::<Ticket>()
            .set(ticket.title, "done")
            .set(ticket.points, 3)
            .r#where(eq(ticket.id, 7))
            .build()
            .expect("update");
        assert_eq!(
            sql,
            r#"UPDATE "tickets" SET "title" = $1, "points" = $2 WHERE "tickets"."id" = $3"#
        );
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn empty_set_is_rejected() {
        let err = update::<Ticket>().build().unwrap_err();
        assert!(matches!(err, CramponError::QueryError(_)));
    }

    #[test]
    fn instance_update_keys_on_primary_key() {
        let ticket = Ticket {
            id: 4,
            title: "fix".into(),
            points: 2,
        };
        let statement = update_instance(&ticket).expect("statement");
        assert_eq!(
            statement.sql,
            r#"UPDATE "tickets" SET "title" = $1, "points" = $2 WHERE "tickets"."id" = $3"#
        );
        assert_eq!(statement.params[2], PostgresValue::Integer(4));
    }

    #[test]
    fn tracked_update_writes_only_changed_fields() {
        let mut ticket = Tracked::new(Ticket {
            id: 4,
            title: "fix".into(),
            points: 2,
        })
        .expect("tracked");
        assert_eq!(update_changes(&ticket).expect("statement"), None);

        ticket.points = 5;
        let statement = update_changes(&ticket)
            .expect("statement")
            .expect("changed");
        assert_eq!(
            statement.sql,
            r#"UPDATE "tickets" SET "points" = $1 WHERE "tickets"."id" = $2"#
        );
        assert_eq!(
            statement.params,
            [PostgresValue::Integer(5), PostgresValue::Integer(4)]
        );
    }

    #[test]
    fn tracked_update_matches_the_saved_key() {
        let mut ticket = Tracked::new(Ticket {
            id: 4,
            title: "fix".into(),
            points: 2,
        })
        .expect("tracked");
        ticket.id = 40;

        let statement = update_changes(&ticket)
            .expect("statement")
            .expect("changed");
        assert_eq!(
            statement.sql,
            r#"UPDATE "tickets" SET "id" = $1 WHERE "tickets"."id" = $2"#
        );
        assert_eq!(
            statement.params,
            [PostgresValue::Integer(40), PostgresValue::Integer(4)]
        );
    }

    #[test]
    fn tracked_update_without_key_fails_once_changed() {
        let mut note = Tracked::new(Note {
            body: "hello".into(),
        })
        .expect("tracked");
        assert_eq!(update_changes(&note).expect("unchanged"), None);

        note.body = "bye".into();
        assert!(matches!(
            update_changes(&note),
            Err(CramponError::QueryError(_))
        ));
    }

    #[test]
    fn instance_update_needs_primary_key() {
        let note = Note {
            body: "hello".into(),
        };
        assert!(matches!(
            update_instance(&note),
            Err(CramponError::QueryError(_))
        ));
    }
}
