//! Change tracking for model instances.
//!
//! [`Tracked`] keeps the stored-field values a model had when it was last
//! read from or written to the database. Comparing them with the current
//! values gives the fields an UPDATE has to write.
//!
//! ```ignore
//! let mut users: Vec<Tracked<User>> = db.exec(select(User::all())).await?;
//! users[0].name = "Grace".into();
//! db.update(&mut users).await?; // one UPDATE, one SET column
//! ```

use core::fmt;
use core::ops::{Deref, DerefMut};

use crampon_core::{FieldMeta, Result};

use crate::cast::{CastRow, CastValue, FromCastRow, FromCastValue};
use crate::model::Model;
use crate::values::PostgresValue;

type FieldValue = (&'static FieldMeta, PostgresValue);

/// A model together with its last saved field values.
///
/// Derefs to the model, so fields are read and assigned as usual.
#[derive(Clone)]
pub struct Tracked<M> {
    model: M,
    saved: Vec<FieldValue>,
}

impl<M: Model> Tracked<M> {
    /// Starts tracking `model` with its current values as the saved state.
    pub fn new(model: M) -> Result<Self> {
        let saved = model.to_values()?;
        Ok(Self { model, saved })
    }

    /// Stored fields whose value differs from the saved state, with their
    /// current values, in declaration order.
    pub fn changes(&self) -> Result<Vec<FieldValue>> {
        Ok(self
            .model
            .to_values()?
            .into_iter()
            .filter(|(meta, value)| self.saved_value(meta.name) != Some(value))
            .collect())
    }

    pub fn is_modified(&self) -> Result<bool> {
        self.changes().map(|changes| !changes.is_empty())
    }

    /// Takes the current values as the saved state.
    pub fn mark_saved(&mut self) -> Result<()> {
        self.saved = self.model.to_values()?;
        Ok(())
    }

    /// Primary key value as last saved.
    pub fn saved_primary_key(&self) -> Option<&PostgresValue> {
        self.saved
            .iter()
            .find(|(meta, _)| meta.primary_key)
            .map(|(_, value)| value)
    }

    fn saved_value(&self, field: &str) -> Option<&PostgresValue> {
        self.saved
            .iter()
            .find(|(meta, _)| meta.name == field)
            .map(|(_, value)| value)
    }

    pub fn get(&self) -> &M {
        &self.model
    }

    pub fn into_inner(self) -> M {
        self.model
    }
}

impl<M> Deref for Tracked<M> {
    type Target = M;

    fn deref(&self) -> &M {
        &self.model
    }
}

impl<M> DerefMut for Tracked<M> {
    fn deref_mut(&mut self) -> &mut M {
        &mut self.model
    }
}

impl<M: fmt::Debug> fmt::Debug for Tracked<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Tracked").field(&self.model).finish()
    }
}

impl<M: PartialEq> PartialEq for Tracked<M> {
    fn eq(&self, other: &Self) -> bool {
        self.model == other.model
    }
}

impl<M: Model> FromCastValue for Tracked<M> {
    fn from_cast_value(value: CastValue) -> Result<Self> {
        value.into_model::<M>().and_then(Tracked::new)
    }
}

impl<M: Model> FromCastRow for Tracked<M> {
    fn from_cast_row(row: CastRow) -> Result<Self> {
        row.into_single().and_then(Self::from_cast_value)
    }
}
