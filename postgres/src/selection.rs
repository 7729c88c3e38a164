//! What a SELECT may project, and how each projection is cast back.
//!
//! Every projected item lowers to a [`SelectEntry`]: the SQL for its select
//! list position together with the [`SelectRaw`] and [`SelectFlags`] the
//! casting engine classifies.

use crampon_core::expr::{AggregateKind, Nullability};
use crampon_core::types::DataType;
use crampon_core::{SQL, SQLChunk, TableMeta, ToSQL, Token};

use crate::cast::{
    FromCastRow, FromCastValue, FunctionMetadata, SelectFlags, SelectRaw, column_key, field_key,
};
use crate::columns::Column;
use crate::functions::Function;
use crate::model::{All, Model, ModelRef};
use crate::values::PostgresValue;

/// One select list position.
#[derive(Debug, Clone)]
pub struct SelectEntry<'a> {
    pub sql: SQL<'a, PostgresValue>,
    pub raw: SelectRaw,
    pub flags: SelectFlags,
}

/// A single projectable item: a whole model, a column or a function.
pub trait SelectItem<'a> {
    /// What one position of a cast row turns into.
    type Output: FromCastValue + FromCastRow;

    /// Table the item reads from, if any.
    fn table(&self) -> Option<&'static TableMeta>;

    /// Lowers the item selected at `position`. `aggregates` counts function
    /// entries seen so far and numbers their aliases.
    fn into_entry(self, position: usize, aggregates: &mut usize) -> SelectEntry<'a>;
}

impl<'a, M> SelectItem<'a> for All<M>
where
    M: Model + FromCastValue + FromCastRow,
{
    type Output = M;

    fn table(&self) -> Option<&'static TableMeta> {
        Some(M::table())
    }

    fn into_entry(self, position: usize, _aggregates: &mut usize) -> SelectEntry<'a> {
        let columns = M::table()
            .stored_fields()
            .enumerate()
            .map(|(index, meta)| {
                SQL::column(meta).alias(field_key(position, index).into_string())
            });
        SelectEntry {
            sql: SQL::join(columns, Token::COMMA),
            raw: SelectRaw::Table(ModelRef::of::<M>()),
            flags: SelectFlags::TABLE,
        }
    }
}

impl<'a, M, T, R> SelectItem<'a> for Column<M, T, R>
where
    M: Model,
    T: DataType,
    R: FromCastValue + FromCastRow,
{
    type Output = R;

    fn table(&self) -> Option<&'static TableMeta> {
        Some(M::table())
    }

    fn into_entry(self, position: usize, _aggregates: &mut usize) -> SelectEntry<'a> {
        let meta = self.meta();
        SelectEntry {
            sql: SQL::column(meta).alias(column_key(position).into_string()),
            raw: SelectRaw::Column(meta),
            flags: SelectFlags::COLUMN,
        }
    }
}

impl<'a, T, N, A, R> SelectItem<'a> for Function<'a, T, N, A, R>
where
    T: DataType,
    N: Nullability,
    A: AggregateKind,
    R: FromCastValue + FromCastRow,
{
    type Output = R;

    fn table(&self) -> Option<&'static TableMeta> {
        Function::table(self)
    }

    fn into_entry(self, _position: usize, aggregates: &mut usize) -> SelectEntry<'a> {
        let alias = compact_str::format_compact!("aggregate_{}", *aggregates);
        *aggregates += 1;
        SelectEntry {
            sql: self
                .into_sql()
                .push(Token::AS)
                .push(SQLChunk::raw(alias.to_string())),
            raw: SelectRaw::Function(FunctionMetadata { alias: Some(alias) }),
            flags: SelectFlags::FUNCTION,
        }
    }
}

/// Everything `select` accepts: one item, or a tuple of up to eight.
///
/// A single item casts into its bare output; a tuple casts into a tuple of
/// outputs in select order.
pub trait Selection<'a> {
    type Output: FromCastRow;

    /// Table of the first entry that has one.
    fn table(&self) -> Option<&'static TableMeta>;

    fn push_entries(self, entries: &mut Vec<SelectEntry<'a>>, aggregates: &mut usize);
}

impl<'a, M> Selection<'a> for All<M>
where
    M: Model + FromCastValue + FromCastRow,
{
    type Output = M;

    fn table(&self) -> Option<&'static TableMeta> {
        SelectItem::table(self)
    }

    fn push_entries(self, entries: &mut Vec<SelectEntry<'a>>, aggregates: &mut usize) {
        entries.push(self.into_entry(entries.len(), aggregates));
    }
}

impl<'a, M, T, R> Selection<'a> for Column<M, T, R>
where
    M: Model,
    T: DataType,
    R: FromCastValue + FromCastRow,
{
    type Output = R;

    fn table(&self) -> Option<&'static TableMeta> {
        SelectItem::table(self)
    }

    fn push_entries(self, entries: &mut Vec<SelectEntry<'a>>, aggregates: &mut usize) {
        entries.push(self.into_entry(entries.len(), aggregates));
    }
}

impl<'a, T, N, A, R> Selection<'a> for Function<'a, T, N, A, R>
where
    T: DataType,
    N: Nullability,
    A: AggregateKind,
    R: FromCastValue + FromCastRow,
{
    type Output = R;

    fn table(&self) -> Option<&'static TableMeta> {
        SelectItem::table(self)
    }

    fn push_entries(self, entries: &mut Vec<SelectEntry<'a>>, aggregates: &mut usize) {
        entries.push(self.into_entry(entries.len(), aggregates));
    }
}

macro_rules! tuple_selection {
    ($($T:ident),+) => {
        impl<'a, $($T: SelectItem<'a>),+> Selection<'a> for ($($T,)+) {
            type Output = ($($T::Output,)+);

            #[allow(non_snake_case)]
            fn table(&self) -> Option<&'static TableMeta> {
                let ($($T,)+) = self;
                None::<&'static TableMeta>$(.or_else(|| $T.table()))+
            }

            #[allow(non_snake_case)]
            fn push_entries(self, entries: &mut Vec<SelectEntry<'a>>, aggregates: &mut usize) {
                let ($($T,)+) = self;
                $(entries.push($T.into_entry(entries.len(), aggregates));)+
            }
        }
    };
}

tuple_selection!(A);
tuple_selection!(A, B);
tuple_selection!(A, B, C);
tuple_selection!(A, B, C, D);
tuple_selection!(A, B, C, D, E);
tuple_selection!(A, B, C, D, E, F);
tuple_selection!(A, B, C, D, E, F, G);
tuple_selection!(A, B, C, D, E, F, G, H);
