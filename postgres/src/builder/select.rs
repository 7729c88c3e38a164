use std::marker::PhantomData;
use std::sync::Arc;

use crampon_core::expr::Expr;
use crampon_core::types::BooleanLike;
use crampon_core::{JoinType, OrderBy, Result, SQL, TableMeta, ToSQL, Token};
use smallvec::SmallVec;

use super::{IntoStatement, Statement, keyword_list, where_clause};
use crate::cast::{
    CastOptions, FromCastRow, RawRow, SelectFlags, SelectRaw, SelectionDescriptor, cast_all_with,
    classify, extract_all,
};
use crate::model::Model;
use crate::selection::{SelectEntry, Selection};
use crate::values::PostgresValue;

/// Clause-order states. A state implements `CanX` while clause `X` may
/// still follow it, so `.limit(5).r#where(..)` does not compile.
pub mod state {
    pub trait CanDistinctOn {}
    pub trait CanJoin {}
    pub trait CanWhere {}
    pub trait CanGroupBy {}
    pub trait CanHaving {}
    pub trait CanOrderBy {}
    pub trait CanLimit {}
    pub trait CanOffset {}

    macro_rules! states {
        ($($(#[$doc:meta])* $state:ident => $($clause:ident)*;)*) => {$(
            $(#[$doc])*
            #[derive(Debug, Clone, Copy, Default)]
            pub struct $state;
            $(impl $clause for $state {})*
        )*};
    }

    states! {
        /// Right after `select(..)`.
        Initial => CanDistinctOn CanJoin CanWhere CanGroupBy CanHaving CanOrderBy CanLimit CanOffset;
        /// After an explicit `.from::<M>()`.
        Sourced => CanDistinctOn CanJoin CanWhere CanGroupBy CanHaving CanOrderBy CanLimit CanOffset;
        Distinct => CanJoin CanWhere CanGroupBy CanHaving CanOrderBy CanLimit CanOffset;
        Joined => CanJoin CanWhere CanGroupBy CanHaving CanOrderBy CanLimit CanOffset;
        Filtered => CanWhere CanGroupBy CanHaving CanOrderBy CanLimit CanOffset;
        Grouped => CanHaving CanOrderBy CanLimit CanOffset;
        GroupFiltered => CanHaving CanOrderBy CanLimit CanOffset;
        Ordered => CanLimit CanOffset;
        Limited => CanOffset;
        Offset => ;
    }
}

use state::*;

type Fragments<'a> = SmallVec<[SQL<'a, PostgresValue>; 2]>;

/// Everything but the select list, kept apart so clauses can be given in any
/// allowed order and still render in SQL order.
#[derive(Debug, Clone, Default)]
struct Clauses<'a> {
    from: Option<&'static TableMeta>,
    distinct_on: Fragments<'a>,
    joins: Fragments<'a>,
    filters: Fragments<'a>,
    group_by: Fragments<'a>,
    group_filters: Fragments<'a>,
    order_by: Fragments<'a>,
    limit: Option<usize>,
    offset: Option<usize>,
}

/// Builds a SELECT whose rows cast into `Out`.
///
/// Repeated `where` or `having` calls are ANDed together.
#[derive(Debug, Clone)]
pub struct SelectBuilder<'a, Out, State = Initial> {
    entries: Vec<SelectEntry<'a>>,
    clauses: Clauses<'a>,
    _marker: PhantomData<fn() -> (Out, State)>,
}

impl<'a, Out> SelectBuilder<'a, Out, Initial> {
    pub(crate) fn new<S: Selection<'a, Output = Out>>(selection: S) -> Self {
        let clauses = Clauses {
            from: selection.table(),
            ..Clauses::default()
        };
        let mut entries = Vec::new();
        selection.push_entries(&mut entries, &mut 0);
        Self {
            entries,
            clauses,
            _marker: PhantomData,
        }
    }

    /// Reads FROM `M`'s table instead of the first entry's.
    pub fn from<M: Model>(self) -> SelectBuilder<'a, Out, Sourced> {
        self.then(|clauses| clauses.from = Some(M::table()))
    }
}

impl<'a, Out, S> SelectBuilder<'a, Out, S> {
    fn then<T>(mut self, edit: impl FnOnce(&mut Clauses<'a>)) -> SelectBuilder<'a, Out, T> {
        edit(&mut self.clauses);
        SelectBuilder {
            entries: self.entries,
            clauses: self.clauses,
            _marker: PhantomData,
        }
    }

    pub fn select_raws(&self) -> Vec<SelectRaw> {
        self.entries.iter().map(|entry| entry.raw.clone()).collect()
    }

    pub fn select_types(&self) -> Vec<SelectFlags> {
        self.entries.iter().map(|entry| entry.flags).collect()
    }

    pub fn build(&self) -> (String, Vec<PostgresValue>) {
        self.to_sql().build_owned()
    }

    /// Renders the statement and classifies the select list.
    pub fn into_prepared(self) -> Result<PreparedSelect<Out>> {
        let (sql, params) = self.build();
        let raws = self.select_raws();
        let flags = self.select_types();
        let descriptors = classify(&raws, &flags)?;
        Ok(PreparedSelect {
            statement: Statement { sql, params },
            raws,
            flags,
            descriptors: descriptors.into(),
            _out: PhantomData,
        })
    }
}

fn sqls<'a, E: ToSQL<'a, PostgresValue>>(items: impl IntoIterator<Item = E>) -> Fragments<'a> {
    items.into_iter().map(ToSQL::into_sql).collect()
}

impl<'a, Out, S: CanDistinctOn> SelectBuilder<'a, Out, S> {
    /// `SELECT DISTINCT ON (exprs)`.
    pub fn distinct_on<E>(
        self,
        expressions: impl IntoIterator<Item = E>,
    ) -> SelectBuilder<'a, Out, Distinct>
    where
        E: ToSQL<'a, PostgresValue>,
    {
        self.then(|clauses| clauses.distinct_on.extend(sqls(expressions)))
    }
}

impl<'a, Out, S: CanJoin> SelectBuilder<'a, Out, S> {
    /// Adds `<kind> JOIN table ON condition`.
    pub fn join<E>(
        self,
        kind: JoinType,
        table: &'static TableMeta,
        on: E,
    ) -> SelectBuilder<'a, Out, Joined>
    where
        E: Expr<'a, PostgresValue>,
        E::SQLType: BooleanLike,
    {
        let clause = kind.render(SQL::table(table), on.into_sql());
        self.then(|clauses| clauses.joins.push(clause))
    }
}

impl<'a, Out, S: CanWhere> SelectBuilder<'a, Out, S> {
    #[inline]
    pub fn r#where<E>(self, condition: E) -> SelectBuilder<'a, Out, Filtered>
    where
        E: Expr<'a, PostgresValue>,
        E::SQLType: BooleanLike,
    {
        let condition = condition.into_sql();
        self.then(|clauses| clauses.filters.push(condition))
    }
}

impl<'a, Out, S: CanGroupBy> SelectBuilder<'a, Out, S> {
    pub fn group_by<E>(
        self,
        expressions: impl IntoIterator<Item = E>,
    ) -> SelectBuilder<'a, Out, Grouped>
    where
        E: ToSQL<'a, PostgresValue>,
    {
        self.then(|clauses| clauses.group_by.extend(sqls(expressions)))
    }
}

impl<'a, Out, S: CanHaving> SelectBuilder<'a, Out, S> {
    pub fn having<E>(self, condition: E) -> SelectBuilder<'a, Out, GroupFiltered>
    where
        E: Expr<'a, PostgresValue>,
        E::SQLType: BooleanLike,
    {
        let condition = condition.into_sql();
        self.then(|clauses| clauses.group_filters.push(condition))
    }
}

impl<'a, Out, S: CanOrderBy> SelectBuilder<'a, Out, S> {
    pub fn order_by(
        self,
        terms: impl IntoIterator<Item = OrderBy<'a, PostgresValue>>,
    ) -> SelectBuilder<'a, Out, Ordered> {
        self.then(|clauses| clauses.order_by.extend(sqls(terms)))
    }
}

impl<'a, Out, S: CanLimit> SelectBuilder<'a, Out, S> {
    #[inline]
    pub fn limit(self, limit: usize) -> SelectBuilder<'a, Out, Limited> {
        self.then(|clauses| clauses.limit = Some(limit))
    }
}

impl<'a, Out, S: CanOffset> SelectBuilder<'a, Out, S> {
    #[inline]
    pub fn offset(self, offset: usize) -> SelectBuilder<'a, Out, Offset> {
        self.then(|clauses| clauses.offset = Some(offset))
    }
}

fn counted<'a>(keyword: Token, count: Option<usize>) -> SQL<'a, PostgresValue> {
    count.map_or_else(SQL::empty, |n| SQL::token(keyword).append(SQL::number(n)))
}

impl<'a, Out, S> ToSQL<'a, PostgresValue> for SelectBuilder<'a, Out, S> {
    fn to_sql(&self) -> SQL<'a, PostgresValue> {
        let c = &self.clauses;
        let mut sql = SQL::token(Token::SELECT);
        if !c.distinct_on.is_empty() {
            let on = SQL::join(c.distinct_on.iter().cloned(), Token::COMMA).parens();
            sql = sql.push(Token::DISTINCT).push(Token::ON).append(on);
        }
        sql = sql.append(SQL::join(self.entries.iter().map(|e| e.sql.clone()), Token::COMMA));
        if let Some(table) = c.from {
            sql = sql.push(Token::FROM).append(SQL::table(table));
        }
        for join in &c.joins {
            sql.append_mut(join.clone());
        }
        sql.append(where_clause(Token::WHERE, &c.filters))
            .append(keyword_list(Token::GROUP_BY, &c.group_by, Token::COMMA))
            .append(where_clause(Token::HAVING, &c.group_filters))
            .append(keyword_list(Token::ORDER_BY, &c.order_by, Token::COMMA))
            .append(counted(Token::LIMIT, c.limit))
            .append(counted(Token::OFFSET, c.offset))
    }
}

impl<'a, Out, S> IntoStatement for SelectBuilder<'a, Out, S> {
    fn into_statement(self) -> Result<Statement> {
        let (sql, params) = self.build();
        Ok(Statement { sql, params })
    }
}

//------------------------------------------------------------------------------
// Prepared selects
//------------------------------------------------------------------------------

/// A rendered SELECT with its classified select list.
///
/// Classification runs once here; [`cast`](Self::cast) reuses the
/// descriptors for every result set.
#[derive(Debug, Clone)]
pub struct PreparedSelect<Out> {
    statement: Statement,
    raws: Vec<SelectRaw>,
    flags: Vec<SelectFlags>,
    descriptors: Arc<[SelectionDescriptor]>,
    _out: PhantomData<fn() -> Out>,
}

impl<Out> PreparedSelect<Out> {
    pub fn sql(&self) -> &str {
        &self.statement.sql
    }

    pub fn params(&self) -> &[PostgresValue] {
        &self.statement.params
    }

    pub fn statement(&self) -> &Statement {
        &self.statement
    }

    pub fn select_raws(&self) -> &[SelectRaw] {
        &self.raws
    }

    pub fn select_types(&self) -> &[SelectFlags] {
        &self.flags
    }

    pub fn descriptors(&self) -> &[SelectionDescriptor] {
        &self.descriptors
    }
}

impl<Out: FromCastRow> PreparedSelect<Out> {
    /// Casts raw rows into `Out`, in row order.
    pub fn cast<R: RawRow + Sync>(&self, rows: &[R], options: &CastOptions) -> Result<Vec<Out>> {
        extract_all(cast_all_with(rows, &self.descriptors, options)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::select;
    use crate::func;
    use crate::types::{Int, Text};
    use crampon_core::expr::{eq, gt};

    crate::pg_model! {
        #[derive(Debug, Clone)]
        struct Author {
            id: i32 => Int { primary_key },
            name: String => Text,
        }
    }

    crate::pg_model! {
        #[derive(Debug, Clone)]
        struct Book in "books" {
            id: i32 => Int { primary_key },
            author_id: i32 => Int,
            pages: i32 => Int,
        }
    }

    #[test]
    fn from_is_first_entry_table() {
        let author = Author::columns();
        let (sql, params) = select(author.id).r#where(gt(author.id, 5)).build();
        assert_eq!(
            sql,
            r#"SELECT "author"."id" AS "c0" FROM "author" WHERE "author"."id" > $1"#
        );
        assert_eq!(params, vec![PostgresValue::Integer(5)]);
    }

    #[test]
    fn clauses_render_in_order() {
        let author = Author::columns();
        let book = Book::columns();
        let (sql, _) = select((author.name, func::sum(book.pages)))
            .join(JoinType::Left, Book::table(), eq(book.author_id, author.id))
            .r#where(gt(book.pages, 10))
            .r#where(gt(author.id, 0))
            .group_by([author.name])
            .having(gt(func::sum(book.pages), 100))
            .order_by([OrderBy::desc(author.name)])
            .limit(5)
            .offset(10)
            .build();
        assert_eq!(
            sql,
            concat!(
                r#"SELECT "author"."name" AS "c0", SUM("books"."pages") AS aggregate_0 "#,
                r#"FROM "author" LEFT JOIN "books" ON "books"."author_id" = "author"."id" "#,
                r#"WHERE "books"."pages" > $1 AND "author"."id" > $2 "#,
                r#"GROUP BY "author"."name" HAVING SUM("books"."pages") > $3 "#,
                r#"ORDER BY "author"."name" DESC LIMIT 5 OFFSET 10"#,
            )
        );
    }

    #[test]
    fn distinct_on_precedes_columns() {
        let book = Book::columns();
        let (sql, _) = select(Book::all()).distinct_on([book.author_id]).build();
        assert_eq!(
            sql,
            concat!(
                r#"SELECT DISTINCT ON ("books"."author_id") "books"."id" AS "c0_0", "#,
                r#""books"."author_id" AS "c0_1", "books"."pages" AS "c0_2" "#,
                r#"FROM "books""#,
            )
        );
    }

    #[test]
    fn functions_without_tables_need_no_from() {
        let (sql, _) = select(func::count_all()).build();
        assert_eq!(sql, "SELECT COUNT(*) AS aggregate_0");

        let (sql, _) = select(func::count_all()).from::<Book>().build();
        assert_eq!(sql, r#"SELECT COUNT(*) AS aggregate_0 FROM "books""#);
    }

    #[test]
    fn prepared_select_classifies_once() {
        let author = Author::columns();
        let prepared = select((Author::all(), func::count(author.id)))
            .group_by([author.id])
            .into_prepared()
            .expect("classified");
        assert_eq!(prepared.select_types(), [SelectFlags::TABLE, SelectFlags::FUNCTION]);
        assert_eq!(prepared.descriptors().len(), 2);
        assert!(prepared.params().is_empty());
    }
}
