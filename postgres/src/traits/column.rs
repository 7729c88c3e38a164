use crampon_core::expr::{NonNull, Null, Nullability};
use crampon_core::{CramponError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::FromPostgresValue;
use crate::values::{Json, PostgresValue};

/// A Rust type a model field may have.
///
/// `Nullable` follows from whether the field is an `Option`. `Base` strips
/// the `Option`, and types results such as `MAX(column)` that are nullable
/// whatever the column is.
pub trait ColumnValue: FromPostgresValue + Clone + Send + Sync + 'static {
    type Nullable: Nullability;
    type Base: FromPostgresValue + Send + Sync + 'static;

    fn to_postgres_value(&self) -> Result<PostgresValue>;
}

macro_rules! plain_column {
    ($($ty:ty),* $(,)?) => {$(
        impl ColumnValue for $ty {
            type Nullable = NonNull;
            type Base = $ty;

            fn to_postgres_value(&self) -> Result<PostgresValue> {
                Ok(self.clone().into())
            }
        }
    )*};
}

plain_column!(i16, i32, i64, f32, f64, bool, String, Vec<u8>, serde_json::Value);

#[cfg(feature = "uuid")]
plain_column!(uuid::Uuid);

#[cfg(feature = "chrono")]
plain_column!(
    chrono::NaiveDate,
    chrono::NaiveTime,
    chrono::NaiveDateTime,
    chrono::DateTime<chrono::FixedOffset>,
);

impl<T: ColumnValue> ColumnValue for Option<T> {
    type Nullable = Null;
    type Base = T::Base;

    fn to_postgres_value(&self) -> Result<PostgresValue> {
        self.as_ref()
            .map_or(Ok(PostgresValue::Null), ColumnValue::to_postgres_value)
    }
}

/// Serialized with `serde_json` on write.
impl<T> ColumnValue for Json<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    type Nullable = NonNull;
    type Base = Json<T>;

    fn to_postgres_value(&self) -> Result<PostgresValue> {
        serde_json::to_value(&self.0)
            .map(PostgresValue::Json)
            .map_err(|e| CramponError::ConversionError(e.to_string().into()))
    }
}
