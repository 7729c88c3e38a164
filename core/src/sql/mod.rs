//! Statement fragments.
//!
//! A [`SQL`] value is a flat list of [`SQLChunk`]s. Builders concatenate
//! fragments freely; placeholders are numbered and spaces inserted only when
//! the finished fragment is rendered, so a parameter's `$n` always matches
//! its position in the bound value list.

mod chunk;
mod render;
mod tokens;

use std::borrow::Cow;
use std::fmt;

use smallvec::{SmallVec, smallvec};

use crate::meta::{FieldMeta, TableMeta};
use crate::param::Param;
use crate::traits::{SQLParam, ToSQL};

pub use chunk::SQLChunk;
pub use tokens::Token;

type Chunks<'a, V> = SmallVec<[SQLChunk<'a, V>; 8]>;

/// A renderable statement fragment.
#[derive(Debug, Clone)]
pub struct SQL<'a, V: SQLParam> {
    parts: Chunks<'a, V>,
}

impl<'a, V: SQLParam> SQL<'a, V> {
    #[inline]
    pub const fn empty() -> Self {
        Self {
            parts: SmallVec::new_const(),
        }
    }

    #[inline]
    fn single(chunk: SQLChunk<'a, V>) -> Self {
        Self {
            parts: smallvec![chunk],
        }
    }

    #[inline]
    pub fn token(token: Token) -> Self {
        Self::single(SQLChunk::Token(token))
    }

    /// A double-quoted identifier.
    #[inline]
    pub fn ident(name: impl Into<Cow<'a, str>>) -> Self {
        Self::single(SQLChunk::Ident(name.into()))
    }

    /// Verbatim text.
    #[inline]
    pub fn raw(text: impl Into<Cow<'a, str>>) -> Self {
        Self::single(SQLChunk::Raw(text.into()))
    }

    #[inline]
    pub fn number(value: usize) -> Self {
        Self::single(SQLChunk::Number(value))
    }

    /// A bound parameter.
    #[inline]
    pub fn param(value: V) -> Self {
        Self::single(SQLChunk::Param(Param::owned(value)))
    }

    #[inline]
    pub fn table(table: &'static TableMeta) -> Self {
        Self::single(SQLChunk::Table(table))
    }

    #[inline]
    pub fn column(field: &'static FieldMeta) -> Self {
        Self::single(SQLChunk::Column(field))
    }

    /// `name(args)`. A subquery argument gets its own parentheses.
    pub fn func(name: &'static str, args: SQL<'a, V>) -> Self {
        SQL::raw(name).append(args.parens_if_subquery().parens())
    }

    /// Comma-separated parameters, one per value.
    pub fn param_list(values: impl IntoIterator<Item = V>) -> Self {
        Self::join(values.into_iter().map(SQL::param), Token::COMMA)
    }

    /// Joins fragments with `separator`. No input renders nothing.
    pub fn join<I>(items: I, separator: Token) -> Self
    where
        I: IntoIterator,
        I::Item: ToSQL<'a, V>,
    {
        let mut joined = SQL::empty();
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                joined.parts.push(SQLChunk::Token(separator));
            }
            joined.parts.extend(item.into_sql().parts);
        }
        joined
    }

    pub fn append(mut self, other: impl Into<SQL<'a, V>>) -> Self {
        self.append_mut(other);
        self
    }

    pub fn append_mut(&mut self, other: impl Into<SQL<'a, V>>) {
        let other = other.into();
        if self.parts.is_empty() {
            self.parts = other.parts;
        } else {
            self.parts.extend(other.parts);
        }
    }

    pub fn push(mut self, chunk: impl Into<SQLChunk<'a, V>>) -> Self {
        self.parts.push(chunk.into());
        self
    }

    pub fn push_mut(&mut self, chunk: impl Into<SQLChunk<'a, V>>) {
        self.parts.push(chunk.into());
    }

    pub fn parens(self) -> Self {
        let mut wrapped = SQL {
            parts: SmallVec::with_capacity(self.parts.len() + 2),
        };
        wrapped.parts.push(SQLChunk::Token(Token::LPAREN));
        wrapped.parts.extend(self.parts);
        wrapped.parts.push(SQLChunk::Token(Token::RPAREN));
        wrapped
    }

    /// Parenthesizes fragments that start with `SELECT`.
    pub fn parens_if_subquery(self) -> Self {
        match self.parts.first() {
            Some(SQLChunk::Token(Token::SELECT)) => self.parens(),
            _ => self,
        }
    }

    /// `self AS "name"`
    pub fn alias(self, name: impl Into<Cow<'a, str>>) -> Self {
        self.push(Token::AS).push(SQLChunk::Ident(name.into()))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    #[inline]
    pub fn chunks(&self) -> &[SQLChunk<'a, V>] {
        &self.parts
    }

    /// Bound values in placeholder order.
    pub fn params(&self) -> impl Iterator<Item = &V> {
        self.parts.iter().filter_map(|chunk| match chunk {
            SQLChunk::Param(param) => Some(&*param.value),
            _ => None,
        })
    }

    fn text_buffer(&self) -> String {
        String::with_capacity(self.parts.len().saturating_mul(8).max(64))
    }

    /// Statement text with `$n` placeholders.
    pub fn sql(&self) -> String {
        let mut text = self.text_buffer();
        let _ = render::render(&self.parts, &mut text, |_| {});
        text
    }

    /// Statement text and borrowed parameters, in one pass.
    pub fn build(&self) -> (String, SmallVec<[&V; 8]>) {
        let mut text = self.text_buffer();
        let mut params = SmallVec::new();
        let _ = render::render(&self.parts, &mut text, |value| params.push(value));
        (text, params)
    }

    /// Statement text and owned parameters.
    pub fn build_owned(&self) -> (String, Vec<V>) {
        let mut text = self.text_buffer();
        let mut params = Vec::new();
        let _ = render::render(&self.parts, &mut text, |value| params.push(V::clone(value)));
        (text, params)
    }
}

impl<'a, V: SQLParam> Default for SQL<'a, V> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<'a, V: SQLParam> From<Token> for SQL<'a, V> {
    fn from(token: Token) -> Self {
        SQL::token(token)
    }
}

impl<'a, V: SQLParam> fmt::Display for SQL<'a, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render::render(&self.parts, f, |_| {})?;
        let params: Vec<&V> = self.params().collect();
        if !params.is_empty() {
            write!(f, " -- {params:?}")?;
        }
        Ok(())
    }
}

impl<'a, V: SQLParam + 'a> ToSQL<'a, V> for SQL<'a, V> {
    fn to_sql(&self) -> SQL<'a, V> {
        self.clone()
    }

    fn into_sql(self) -> SQL<'a, V> {
        self
    }
}
