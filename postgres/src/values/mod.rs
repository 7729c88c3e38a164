//! The dynamic value type shared by parameters and result rows.

mod drivers;
mod json;

pub use json::Json;

use crampon_core::{SQL, SQLParam};

/// One PostgreSQL datum.
///
/// Query builders bind these as parameters; the driver decodes result
/// columns into them. JSON and JSONB arrive already parsed.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PostgresValue {
    Smallint(i16),
    Integer(i32),
    Bigint(i64),
    Real(f32),
    DoublePrecision(f64),
    /// TEXT, VARCHAR and any type read in its text form.
    Text(String),
    Bytea(Vec<u8>),
    Boolean(bool),
    Json(serde_json::Value),
    #[cfg(feature = "uuid")]
    Uuid(uuid::Uuid),
    #[cfg(feature = "chrono")]
    Date(chrono::NaiveDate),
    #[cfg(feature = "chrono")]
    Time(chrono::NaiveTime),
    #[cfg(feature = "chrono")]
    Timestamp(chrono::NaiveDateTime),
    #[cfg(feature = "chrono")]
    TimestampTz(chrono::DateTime<chrono::FixedOffset>),
    /// One-dimensional arrays.
    Array(Vec<PostgresValue>),
    #[default]
    Null,
}

impl SQLParam for PostgresValue {}

impl PostgresValue {
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, PostgresValue::Null)
    }

    /// SQL spelling of the carried type, used in error messages.
    pub const fn type_name(&self) -> &'static str {
        match self {
            PostgresValue::Smallint(_) => "SMALLINT",
            PostgresValue::Integer(_) => "INTEGER",
            PostgresValue::Bigint(_) => "BIGINT",
            PostgresValue::Real(_) => "REAL",
            PostgresValue::DoublePrecision(_) => "DOUBLE PRECISION",
            PostgresValue::Text(_) => "TEXT",
            PostgresValue::Bytea(_) => "BYTEA",
            PostgresValue::Boolean(_) => "BOOLEAN",
            PostgresValue::Json(_) => "JSON",
            #[cfg(feature = "uuid")]
            PostgresValue::Uuid(_) => "UUID",
            #[cfg(feature = "chrono")]
            PostgresValue::Date(_) => "DATE",
            #[cfg(feature = "chrono")]
            PostgresValue::Time(_) => "TIME",
            #[cfg(feature = "chrono")]
            PostgresValue::Timestamp(_) => "TIMESTAMP",
            #[cfg(feature = "chrono")]
            PostgresValue::TimestampTz(_) => "TIMESTAMPTZ",
            PostgresValue::Array(_) => "ARRAY",
            PostgresValue::Null => "NULL",
        }
    }

    /// Any integer variant, widened.
    pub const fn as_i64(&self) -> Option<i64> {
        match *self {
            PostgresValue::Smallint(n) => Some(n as i64),
            PostgresValue::Integer(n) => Some(n as i64),
            PostgresValue::Bigint(n) => Some(n),
            _ => None,
        }
    }

    /// Any floating variant, widened.
    pub const fn as_f64(&self) -> Option<f64> {
        match *self {
            PostgresValue::Real(n) => Some(n as f64),
            PostgresValue::DoublePrecision(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        if let PostgresValue::Text(text) = self {
            Some(text)
        } else {
            None
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        if let PostgresValue::Bytea(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }
}

impl<'a> From<PostgresValue> for SQL<'a, PostgresValue> {
    fn from(value: PostgresValue) -> Self {
        SQL::param(value)
    }
}

macro_rules! wraps {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl From<$ty> for PostgresValue {
            fn from(value: $ty) -> Self {
                PostgresValue::$variant(value)
            }
        }
    )*};
}

wraps! {
    i16 => Smallint,
    i32 => Integer,
    i64 => Bigint,
    f32 => Real,
    f64 => DoublePrecision,
    bool => Boolean,
    String => Text,
    Vec<u8> => Bytea,
    serde_json::Value => Json,
}

#[cfg(feature = "uuid")]
wraps!(uuid::Uuid => Uuid);

#[cfg(feature = "chrono")]
wraps! {
    chrono::NaiveDate => Date,
    chrono::NaiveTime => Time,
    chrono::NaiveDateTime => Timestamp,
    chrono::DateTime<chrono::FixedOffset> => TimestampTz,
}

impl From<&str> for PostgresValue {
    fn from(text: &str) -> Self {
        PostgresValue::Text(text.to_owned())
    }
}

impl From<&[u8]> for PostgresValue {
    fn from(bytes: &[u8]) -> Self {
        PostgresValue::Bytea(bytes.to_vec())
    }
}

impl<T: Into<PostgresValue>> From<Option<T>> for PostgresValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(PostgresValue::Null, Into::into)
    }
}

impl<T: Into<PostgresValue> + ArrayElement> From<Vec<T>> for PostgresValue {
    fn from(items: Vec<T>) -> Self {
        PostgresValue::Array(items.into_iter().map(Into::into).collect())
    }
}

/// Types that bind as elements of an `ARRAY`. `u8` is left out so that
/// `Vec<u8>` stays BYTEA.
pub trait ArrayElement {}

macro_rules! array_elements {
    ($($ty:ty),*) => {$(impl ArrayElement for $ty {})*};
}

array_elements!(i16, i32, i64, f32, f64, bool, String, &str);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_none_binds_null() {
        assert!(PostgresValue::from(None::<i32>).is_null());
        assert_eq!(PostgresValue::from(Some(5i64)), PostgresValue::Bigint(5));
    }

    #[test]
    fn byte_vectors_are_not_arrays() {
        assert_eq!(PostgresValue::from(vec![1u8, 2, 3]).type_name(), "BYTEA");
        assert_eq!(
            PostgresValue::from(vec![1i32, 2]),
            PostgresValue::Array(vec![PostgresValue::Integer(1), PostgresValue::Integer(2)])
        );
    }
}
