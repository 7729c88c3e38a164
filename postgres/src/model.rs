//! Models: Rust structs backed by a table.
//!
//! A model is normally declared with [`pg_model!`](crate::pg_model), which
//! generates the static metadata, the typed column handles and the
//! [`Model`] implementation. The casting engine only ever sees models through
//! [`ModelRef`] and [`ModelInstance`], so descriptors stay object-safe and
//! shareable between threads.

use core::any::Any;
use core::fmt;
use core::marker::PhantomData;

use crampon_core::{CramponError, FieldError, FieldMeta, TableMeta};
use serde::Serialize;
use serde::de::DeserializeOwned;
use smallvec::SmallVec;

use crate::traits::FromPostgresValue;
use crate::values::PostgresValue;

/// A Rust struct mapped onto one table.
pub trait Model: Sized + Clone + fmt::Debug + Send + Sync + 'static {
    /// Rust type name, used in error messages.
    const NAME: &'static str;

    /// Generated struct holding one typed [`Column`](crate::Column) per field.
    type Columns: Copy + fmt::Debug;

    /// Static metadata, fields in declaration order.
    fn table() -> &'static TableMeta;

    fn columns() -> Self::Columns;

    /// Builds an instance from decoded field values.
    ///
    /// Excluded fields are never present in `fields` and take their default.
    fn from_fields(fields: FieldValues) -> Result<Self, FieldError>;

    /// Values of every stored field, in declaration order.
    fn to_values(&self) -> Result<Vec<(&'static FieldMeta, PostgresValue)>, CramponError>;

    /// Current primary key value, or `None` when the model has no key.
    fn primary_key_value(&self) -> Result<Option<PostgresValue>, CramponError>;

    /// Overwrites the primary key, e.g. with a database-generated id.
    fn set_primary_key(&mut self, value: &PostgresValue) -> Result<(), CramponError>;

    /// Selects every stored field of the model.
    fn all() -> All<Self> {
        All::new()
    }
}

/// Selection of a whole model row.
pub struct All<M>(PhantomData<fn() -> M>);

impl<M> All<M> {
    pub const fn new() -> Self {
        All(PhantomData)
    }
}

impl<M> Default for All<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Clone for All<M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M> Copy for All<M> {}

impl<M: Model> fmt::Debug for All<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "All<{}>", M::NAME)
    }
}

//------------------------------------------------------------------------------
// Field values
//------------------------------------------------------------------------------

/// Decoded `(field name, value)` pairs handed to a model constructor.
///
/// Lives for exactly one row: the row caster fills it and the constructor
/// consumes it.
#[derive(Debug, Default, Clone)]
pub struct FieldValues {
    entries: SmallVec<[(&'static str, PostgresValue); 8]>,
}

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: SmallVec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn push(&mut self, field: &'static str, value: PostgresValue) {
        self.entries.push((field, value));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&PostgresValue> {
        self.entries
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &PostgresValue)> {
        self.entries.iter().map(|(name, value)| (*name, value))
    }

    fn remove(&mut self, field: &'static str) -> Result<PostgresValue, FieldError> {
        self.entries
            .iter_mut()
            .find(|(name, _)| *name == field)
            .map(|(_, value)| core::mem::take(value))
            .ok_or(FieldError::Missing(field))
    }

    /// Moves a field out and converts it.
    pub fn take<T: FromPostgresValue>(&mut self, field: &'static str) -> Result<T, FieldError> {
        let value = self.remove(field)?;
        T::from_postgres_value(&value).map_err(|e| FieldError::Mismatch {
            field,
            reason: e.to_string().into(),
        })
    }

    /// Moves a JSON-encoded field out and deserializes it.
    pub fn take_json<T: DeserializeOwned>(&mut self, field: &'static str) -> Result<T, FieldError> {
        let parsed = match self.remove(field)? {
            PostgresValue::Json(json) => serde_json::from_value(json),
            PostgresValue::Null => serde_json::from_value(serde_json::Value::Null),
            PostgresValue::Text(text) => serde_json::from_str(&text),
            other => {
                return Err(FieldError::Mismatch {
                    field,
                    reason: format!("expected JSON, found {}", other.type_name()).into(),
                });
            }
        };
        parsed.map_err(|e| FieldError::Mismatch {
            field,
            reason: e.to_string().into(),
        })
    }
}

/// Serializes a JSON-encoded field for writing.
///
/// JSON and JSONB columns bind the parsed value; any other column type gets
/// the JSON text. `null` binds as SQL NULL.
#[doc(hidden)]
pub fn json_field_value<T: Serialize>(
    meta: &FieldMeta,
    value: &T,
) -> Result<PostgresValue, CramponError> {
    let json = serde_json::to_value(value).map_err(|e| {
        CramponError::ConversionError(
            format!("cannot serialize field `{}`: {e}", meta.name).into(),
        )
    })?;
    Ok(match (json, meta.sql_type) {
        (serde_json::Value::Null, _) => PostgresValue::Null,
        (json, "JSON" | "JSONB") => PostgresValue::Json(json),
        (json, _) => PostgresValue::Text(json.to_string()),
    })
}

//------------------------------------------------------------------------------
// Type-erased models
//------------------------------------------------------------------------------

/// Object-safe view of a model instance.
pub trait AnyModel: Any + fmt::Debug + Send + Sync {
    fn model_name(&self) -> &'static str;
    fn clone_box(&self) -> Box<dyn AnyModel>;
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<M: Model> AnyModel for M {
    fn model_name(&self) -> &'static str {
        M::NAME
    }

    fn clone_box(&self) -> Box<dyn AnyModel> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// A constructed model of some concrete type.
#[derive(Debug)]
pub struct ModelInstance(Box<dyn AnyModel>);

impl ModelInstance {
    pub fn new<M: Model>(model: M) -> Self {
        ModelInstance(Box::new(model))
    }

    pub fn name(&self) -> &'static str {
        self.0.model_name()
    }

    pub fn is<M: Model>(&self) -> bool {
        self.0.as_any().is::<M>()
    }

    pub fn downcast_ref<M: Model>(&self) -> Option<&M> {
        self.0.as_any().downcast_ref::<M>()
    }

    /// Recovers the concrete model.
    pub fn downcast<M: Model>(self) -> Result<M, CramponError> {
        let found = self.name();
        self.0
            .into_any()
            .downcast::<M>()
            .map(|model| *model)
            .map_err(|_| {
                CramponError::ConversionError(
                    format!("expected model {}, found {found}", M::NAME).into(),
                )
            })
    }
}

impl Clone for ModelInstance {
    fn clone(&self) -> Self {
        ModelInstance(self.0.clone_box())
    }
}

/// Constructor handle for a model type, stored in selection descriptors.
#[derive(Clone, Copy)]
pub struct ModelRef {
    table: &'static TableMeta,
    construct: fn(FieldValues) -> Result<ModelInstance, FieldError>,
}

fn construct_erased<M: Model>(fields: FieldValues) -> Result<ModelInstance, FieldError> {
    M::from_fields(fields).map(ModelInstance::new)
}

impl ModelRef {
    pub fn of<M: Model>() -> Self {
        Self {
            table: M::table(),
            construct: construct_erased::<M>,
        }
    }

    #[inline]
    pub fn table(&self) -> &'static TableMeta {
        self.table
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.table.model
    }

    #[inline]
    pub fn construct(&self, fields: FieldValues) -> Result<ModelInstance, FieldError> {
        (self.construct)(fields)
    }
}

impl PartialEq for ModelRef {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.table, other.table)
    }
}

impl fmt::Debug for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelRef")
            .field("model", &self.table.model)
            .field("table", &self.table.name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_moves_values_out() {
        let mut fields = FieldValues::new();
        fields.push("id", PostgresValue::Integer(3));
        fields.push("name", PostgresValue::Text("Ada".into()));

        let id: i32 = fields.take("id").expect("id");
        assert_eq!(id, 3);
        assert_eq!(fields.get("id"), Some(&PostgresValue::Null));
        assert!(matches!(
            fields.take::<String>("email"),
            Err(FieldError::Missing("email"))
        ));
    }

    #[test]
    fn take_reports_mismatched_field() {
        let mut fields = FieldValues::new();
        fields.push("age", PostgresValue::Text("old".into()));
        let err = fields.take::<i32>("age").unwrap_err();
        assert!(matches!(err, FieldError::Mismatch { field: "age", .. }));
    }

    #[test]
    fn json_fields_accept_text_and_values() {
        let mut fields = FieldValues::new();
        fields.push("tags", PostgresValue::Text(r#"["a","b"]"#.into()));
        fields.push("meta", PostgresValue::Json(serde_json::json!({ "k": 1 })));

        let tags: Vec<String> = fields.take_json("tags").expect("tags");
        let meta: serde_json::Value = fields.take_json("meta").expect("meta");
        assert_eq!(tags, ["a", "b"]);
        assert_eq!(meta["k"], 1);
    }

    #[test]
    fn json_writes_follow_column_type() {
        let jsonb = FieldMeta::new("t", "doc", "JSONB");
        let text = FieldMeta::new("t", "doc", "TEXT");
        let value = vec![1, 2];

        assert_eq!(
            json_field_value(&jsonb, &value).ok(),
            Some(PostgresValue::Json(serde_json::json!([1, 2])))
        );
        assert_eq!(
            json_field_value(&text, &value).ok(),
            Some(PostgresValue::Text("[1,2]".into()))
        );
        assert_eq!(
            json_field_value(&text, &None::<i32>).ok(),
            Some(PostgresValue::Null)
        );
    }
}
