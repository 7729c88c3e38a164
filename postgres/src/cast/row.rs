use std::sync::Arc;

use compact_str::CompactString;
use crampon_core::{CramponError, Result, SelectionKind};
use hashbrown::HashMap;
use smallvec::SmallVec;

use super::decode::decode;
use super::descriptor::SelectionDescriptor;
use super::{CastRow, CastValue};
use crate::model::FieldValues;
use crate::values::PostgresValue;

/// Read-only keyed access to one result row.
pub trait RawRow {
    fn get(&self, key: &str) -> Option<&PostgresValue>;
}

impl<R: RawRow + ?Sized> RawRow for &R {
    fn get(&self, key: &str) -> Option<&PostgresValue> {
        (**self).get(key)
    }
}

/// Column names of a result set, shared by all of its rows.
#[derive(Debug, Clone, Default)]
pub struct RowSchema {
    names: Vec<CompactString>,
    index: HashMap<CompactString, usize>,
}

impl RowSchema {
    /// The first column wins when a name repeats.
    pub fn new<I, S>(names: I) -> Arc<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<CompactString>,
    {
        let names: Vec<CompactString> = names.into_iter().map(Into::into).collect();
        let mut index = HashMap::with_capacity(names.len());
        for (position, name) in names.iter().enumerate() {
            index.entry(name.clone()).or_insert(position);
        }
        Arc::new(Self { names, index })
    }

    pub fn names(&self) -> &[CompactString] {
        &self.names
    }

    #[inline]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// An owned result row.
#[derive(Debug, Clone)]
pub struct PgRow {
    schema: Arc<RowSchema>,
    values: Vec<PostgresValue>,
}

impl PgRow {
    pub fn new(schema: Arc<RowSchema>, values: Vec<PostgresValue>) -> Result<Self> {
        if schema.len() != values.len() {
            return Err(CramponError::ExecutionError(format!(
                "row has {} values for {} columns",
                values.len(),
                schema.len()
            )));
        }
        Ok(Self { schema, values })
    }

    /// Builds a standalone row from `(column, value)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, PostgresValue)>,
        S: Into<CompactString>,
    {
        let (names, values): (Vec<CompactString>, Vec<PostgresValue>) = pairs
            .into_iter()
            .map(|(name, value)| (name.into(), value))
            .unzip();
        Self {
            schema: RowSchema::new(names),
            values,
        }
    }

    pub fn schema(&self) -> &Arc<RowSchema> {
        &self.schema
    }

    pub fn columns(&self) -> &[CompactString] {
        self.schema.names()
    }

    pub fn values(&self) -> &[PostgresValue] {
        &self.values
    }

    pub fn get_at(&self, index: usize) -> Option<&PostgresValue> {
        self.values.get(index)
    }

    pub fn into_values(self) -> Vec<PostgresValue> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl RawRow for PgRow {
    #[inline]
    fn get(&self, key: &str) -> Option<&PostgresValue> {
        self.schema
            .position(key)
            .and_then(|index| self.values.get(index))
    }
}

/// Casts a single row. Errors report row index 0.
pub fn cast_row<R: RawRow + ?Sized>(row: &R, descriptors: &[SelectionDescriptor]) -> Result<CastRow> {
    cast_row_at(row, 0, descriptors)
}

/// Casts the row at `index` of a result set.
pub fn cast_row_at<R: RawRow + ?Sized>(
    row: &R,
    index: usize,
    descriptors: &[SelectionDescriptor],
) -> Result<CastRow> {
    if let [descriptor] = descriptors {
        return cast_value(row, index, 0, descriptor).map(CastRow::Single);
    }

    let mut values = SmallVec::with_capacity(descriptors.len());
    for (position, descriptor) in descriptors.iter().enumerate() {
        values.push(cast_value(row, index, position, descriptor)?);
    }
    Ok(CastRow::Tuple(values))
}

fn lookup<'r, R: RawRow + ?Sized>(
    row: &'r R,
    key: &CompactString,
    index: usize,
    position: usize,
    kind: SelectionKind,
) -> Result<&'r PostgresValue> {
    row.get(key).ok_or_else(|| CramponError::MissingColumn {
        key: key.clone(),
        row: index,
        position,
        kind,
    })
}

fn cast_value<R: RawRow + ?Sized>(
    row: &R,
    index: usize,
    position: usize,
    descriptor: &SelectionDescriptor,
) -> Result<CastValue> {
    match descriptor {
        SelectionDescriptor::WholeModel { model, fields } => {
            let mut values = FieldValues::with_capacity(fields.len());
            for slot in fields.iter() {
                let raw = lookup(row, &slot.key, index, position, SelectionKind::WholeModel)?;
                let value =
                    decode(raw, slot.meta.json).map_err(|source| CramponError::Decoding {
                        model: model.name(),
                        field: slot.meta.name,
                        row: index,
                        position,
                        source,
                    })?;
                values.push(slot.meta.name, value);
            }
            model
                .construct(values)
                .map(CastValue::Model)
                .map_err(|source| CramponError::Construction {
                    model: model.name(),
                    row: index,
                    position,
                    source,
                })
        }
        SelectionDescriptor::SingleColumn { key } => {
            lookup(row, key, index, position, SelectionKind::SingleColumn)
                .map(|value| CastValue::Value(value.clone()))
        }
        SelectionDescriptor::FunctionResult { alias } => {
            lookup(row, alias, index, position, SelectionKind::FunctionResult)
                .map(|value| CastValue::Value(value.clone()))
        }
    }
}
