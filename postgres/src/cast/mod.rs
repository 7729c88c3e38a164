//! Result casting.
//!
//! Turning driver rows into caller types happens in three steps:
//!
//! 1. [`classify`] derives one [`SelectionDescriptor`] per select position,
//!    once per query shape.
//! 2. [`cast_row`] / [`cast_all`] rebuild every raw row into a [`CastRow`]:
//!    whole models are decoded and constructed, single columns and function
//!    results are copied as-is.
//! 3. [`FromCastRow`] converts each [`CastRow`] into the caller's type.

mod batch;
mod decode;
mod descriptor;
mod row;
mod typed;

pub use batch::{CastOptions, cast_all, cast_all_with};
pub use decode::decode;
pub use descriptor::{
    FieldSlot, FunctionMetadata, SelectFlags, SelectRaw, SelectionDescriptor, classify,
    column_key, field_key,
};
pub use row::{PgRow, RawRow, RowSchema, cast_row, cast_row_at};
pub use typed::{FromCastRow, FromCastValue, extract_all};

use crampon_core::{CramponError, Result};
use smallvec::{SmallVec, smallvec};

use crate::model::{Model, ModelInstance};
use crate::values::PostgresValue;

/// One rebuilt select position.
#[derive(Debug, Clone)]
pub enum CastValue {
    Value(PostgresValue),
    Model(ModelInstance),
}

impl CastValue {
    pub fn as_value(&self) -> Option<&PostgresValue> {
        match self {
            CastValue::Value(value) => Some(value),
            CastValue::Model(_) => None,
        }
    }

    pub fn as_model(&self) -> Option<&ModelInstance> {
        match self {
            CastValue::Model(model) => Some(model),
            CastValue::Value(_) => None,
        }
    }

    pub fn into_value(self) -> Result<PostgresValue> {
        match self {
            CastValue::Value(value) => Ok(value),
            CastValue::Model(model) => Err(CramponError::ConversionError(
                format!("expected a value, found model {}", model.name()).into(),
            )),
        }
    }

    pub fn into_model<M: Model>(self) -> Result<M> {
        match self {
            CastValue::Model(model) => model.downcast(),
            CastValue::Value(value) => Err(CramponError::ConversionError(
                format!("expected model {}, found {}", M::NAME, value.type_name()).into(),
            )),
        }
    }
}

/// Cast rows of one execution, in driver order.
pub type ResultSet = Vec<CastRow>;

/// One rebuilt row: a bare value for single selections, else a tuple.
#[derive(Debug, Clone)]
pub enum CastRow {
    Single(CastValue),
    Tuple(SmallVec<[CastValue; 4]>),
}

impl CastRow {
    pub fn len(&self) -> usize {
        match self {
            CastRow::Single(_) => 1,
            CastRow::Tuple(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, position: usize) -> Option<&CastValue> {
        match self {
            CastRow::Single(value) => (position == 0).then_some(value),
            CastRow::Tuple(values) => values.get(position),
        }
    }

    pub fn into_single(self) -> Result<CastValue> {
        match self {
            CastRow::Single(value) => Ok(value),
            CastRow::Tuple(values) => Err(CramponError::ConversionError(
                format!("expected a single value, found a row of {}", values.len()).into(),
            )),
        }
    }

    pub fn into_values(self) -> SmallVec<[CastValue; 4]> {
        match self {
            CastRow::Single(value) => smallvec![value],
            CastRow::Tuple(values) => values,
        }
    }
}
