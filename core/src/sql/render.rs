use std::fmt::{self, Write};

use super::chunk::{Edge, SQLChunk};
use crate::traits::SQLParam;

/// Whether a single space separates two adjacent chunks.
pub(crate) fn spaced<V: SQLParam>(prev: &SQLChunk<'_, V>, next: &SQLChunk<'_, V>) -> bool {
    if matches!(prev, SQLChunk::Raw(text) if text.ends_with(' '))
        || matches!(next, SQLChunk::Raw(text) if text.starts_with(' '))
    {
        return false;
    }
    !matches!(
        (prev.edge(), next.edge()),
        (_, Edge::Close | Edge::Separator | Edge::Dot)
            | (Edge::Open | Edge::Dot, _)
            | (Edge::Call, Edge::Open)
    )
}

/// Writes `chunks` to `out`, numbering parameters from `$1` and handing each
/// bound value to `bind` in placeholder order.
pub(crate) fn render<'s, 'a: 's, V: SQLParam>(
    chunks: &'s [SQLChunk<'a, V>],
    out: &mut impl Write,
    mut bind: impl FnMut(&'s V),
) -> fmt::Result {
    let mut placeholder = 0usize;
    let mut prev: Option<&SQLChunk<'a, V>> = None;
    for chunk in chunks {
        if prev.is_some_and(|prev| spaced(prev, chunk)) {
            out.write_char(' ')?;
        }
        if let SQLChunk::Param(param) = chunk {
            placeholder += 1;
            write!(out, "${placeholder}")?;
            bind(&*param.value);
        } else {
            chunk.write_text(out)?;
        }
        prev = Some(chunk);
    }
    Ok(())
}
