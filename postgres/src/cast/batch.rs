use crampon_core::{CramponError, Result, crampon_trace_cast};

use super::ResultSet;
use super::descriptor::SelectionDescriptor;
use super::row::{RawRow, cast_row_at};

/// Runtime knobs for batch casting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastOptions {
    /// Batches with at least this many rows are cast on the rayon pool when
    /// the `parallel` feature is enabled.
    pub parallel_threshold: usize,
}

impl Default for CastOptions {
    fn default() -> Self {
        Self {
            parallel_threshold: 1024,
        }
    }
}

/// Casts every row, keeping driver order. Stops at the first failing row.
pub fn cast_all<R: RawRow + Sync>(
    rows: &[R],
    descriptors: &[SelectionDescriptor],
) -> Result<ResultSet> {
    cast_all_with(rows, descriptors, &CastOptions::default())
}

pub fn cast_all_with<R: RawRow + Sync>(
    rows: &[R],
    descriptors: &[SelectionDescriptor],
    options: &CastOptions,
) -> Result<ResultSet> {
    let mut out = Vec::new();
    out.try_reserve_exact(rows.len())
        .map_err(|source| CramponError::Allocation {
            requested: rows.len(),
            source,
        })?;

    #[cfg(feature = "parallel")]
    if rows.len() >= options.parallel_threshold {
        crampon_trace_cast!(rows.len(), descriptors.len(), true);
        return cast_parallel(rows, descriptors, out);
    }
    #[cfg(not(feature = "parallel"))]
    let _ = options;

    crampon_trace_cast!(rows.len(), descriptors.len(), false);
    for (index, row) in rows.iter().enumerate() {
        out.push(cast_row_at(row, index, descriptors)?);
    }
    Ok(out)
}

#[cfg(feature = "parallel")]
fn cast_parallel<R: RawRow + Sync>(
    rows: &[R],
    descriptors: &[SelectionDescriptor],
    mut out: ResultSet,
) -> Result<ResultSet> {
    use rayon::prelude::*;

    let mut staged: Vec<Result<super::CastRow>> = Vec::new();
    staged
        .try_reserve_exact(rows.len())
        .map_err(|source| CramponError::Allocation {
            requested: rows.len(),
            source,
        })?;
    staged.par_extend(
        rows.par_iter()
            .enumerate()
            .map(|(index, row)| cast_row_at(row, index, descriptors)),
    );

    // Staged results are in row order, so the first error is the lowest index.
    for result in staged {
        out.push(result?);
    }
    Ok(out)
}
