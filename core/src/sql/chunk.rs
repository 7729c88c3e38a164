use std::borrow::Cow;
use std::fmt;

use crate::meta::{FieldMeta, TableMeta};
use crate::param::Param;
use crate::sql::tokens::Token;
use crate::traits::SQLParam;

/// One piece of a statement. Spacing between pieces is decided when the
/// statement is rendered, never stored.
#[derive(Clone)]
pub enum SQLChunk<'a, V: SQLParam> {
    Token(Token),
    /// Double-quoted identifier.
    Ident(Cow<'a, str>),
    /// Verbatim text. Function names and pre-quoted aliases.
    Raw(Cow<'a, str>),
    /// Inline unsigned literal for LIMIT and OFFSET.
    Number(usize),
    /// Bound value, rendered as `$n`.
    Param(Param<'a, V>),
    Table(&'static TableMeta),
    /// Qualified column, `"table"."storage_key"`.
    Column(&'static FieldMeta),
}

/// How a chunk behaves at its edges when deciding on a separating space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Edge {
    Open,
    Close,
    /// `,` and `;`: hug the left side, space on the right.
    Separator,
    /// `.`: hugs both sides.
    Dot,
    Operator,
    /// Raw text behaves like a word except that `(` follows it directly.
    Call,
    Word,
}

impl<'a, V: SQLParam> SQLChunk<'a, V> {
    #[inline]
    pub fn ident(name: impl Into<Cow<'a, str>>) -> Self {
        Self::Ident(name.into())
    }

    #[inline]
    pub fn raw(text: impl Into<Cow<'a, str>>) -> Self {
        Self::Raw(text.into())
    }

    pub(crate) fn edge(&self) -> Edge {
        match self {
            SQLChunk::Token(Token::LPAREN) => Edge::Open,
            SQLChunk::Token(Token::RPAREN) => Edge::Close,
            SQLChunk::Token(Token::COMMA | Token::SEMI) => Edge::Separator,
            SQLChunk::Token(Token::DOT) => Edge::Dot,
            SQLChunk::Token(token) if token.is_operator() => Edge::Operator,
            SQLChunk::Raw(_) => Edge::Call,
            _ => Edge::Word,
        }
    }

    /// Writes everything except parameters, whose placeholder number belongs
    /// to the renderer.
    pub(crate) fn write_text(&self, out: &mut impl fmt::Write) -> fmt::Result {
        match self {
            SQLChunk::Token(token) => out.write_str(token.as_str()),
            SQLChunk::Ident(name) => quote(out, name),
            SQLChunk::Raw(text) => out.write_str(text),
            SQLChunk::Number(n) => write!(out, "{n}"),
            SQLChunk::Param(_) => out.write_char('?'),
            SQLChunk::Table(table) => quote(out, table.name),
            SQLChunk::Column(field) => {
                quote(out, field.table)?;
                out.write_char('.')?;
                quote(out, field.storage_key)
            }
        }
    }
}

fn quote(out: &mut impl fmt::Write, name: &str) -> fmt::Result {
    out.write_char('"')?;
    for (i, part) in name.split('"').enumerate() {
        if i > 0 {
            out.write_str("\"\"")?;
        }
        out.write_str(part)?;
    }
    out.write_char('"')
}

impl<'a, V: SQLParam> fmt::Debug for SQLChunk<'a, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SQLChunk::Param(param) => write!(f, "Param({:?})", param.value),
            other => {
                let mut text = String::new();
                other.write_text(&mut text)?;
                write!(f, "{:?}({text})", other.edge())
            }
        }
    }
}

impl<'a, V: SQLParam> From<Token> for SQLChunk<'a, V> {
    fn from(token: Token) -> Self {
        Self::Token(token)
    }
}

impl<'a, V: SQLParam> From<&'static TableMeta> for SQLChunk<'a, V> {
    fn from(table: &'static TableMeta) -> Self {
        Self::Table(table)
    }
}

impl<'a, V: SQLParam> From<&'static FieldMeta> for SQLChunk<'a, V> {
    fn from(field: &'static FieldMeta) -> Self {
        Self::Column(field)
    }
}

impl<'a, V: SQLParam> From<Param<'a, V>> for SQLChunk<'a, V> {
    fn from(param: Param<'a, V>) -> Self {
        Self::Param(param)
    }
}
