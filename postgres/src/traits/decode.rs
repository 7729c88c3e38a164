use std::any::type_name;
use std::fmt::Display;

use crampon_core::{CramponError, Result};
use serde::de::DeserializeOwned;

use crate::values::{ArrayElement, Json, PostgresValue};

/// Conversion from a driver value into a Rust field type.
///
/// Implementations accept the encodings PostgreSQL may plausibly hand back
/// for the type (an `INTEGER` column read as `i64`, a numeric read as
/// `String`) and reject everything else with `ConversionError`. Only
/// `Option<T>` and the JSON types accept NULL.
pub trait FromPostgresValue: Sized {
    fn from_postgres_value(value: &PostgresValue) -> Result<Self>;
}

fn mismatch<T>(value: &PostgresValue) -> Result<T> {
    let reason = if value.is_null() {
        format!("unexpected NULL value for {}", type_name::<T>())
    } else {
        format!("cannot convert {} to {}", value.type_name(), type_name::<T>())
    };
    Err(CramponError::ConversionError(reason.into()))
}

fn invalid<T>(input: impl Display, detail: impl Display) -> Result<T> {
    Err(CramponError::ConversionError(
        format!("cannot read {input} as {}: {detail}", type_name::<T>()).into(),
    ))
}

fn parse<T>(text: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: Display,
{
    text.parse().or_else(|e| invalid(format_args!("'{text}'"), e))
}

impl FromPostgresValue for bool {
    fn from_postgres_value(value: &PostgresValue) -> Result<Self> {
        match value {
            PostgresValue::Boolean(b) => Ok(*b),
            PostgresValue::Smallint(_) | PostgresValue::Integer(_) | PostgresValue::Bigint(_) => {
                Ok(value.as_i64() != Some(0))
            }
            PostgresValue::Text(text) => match text.to_ascii_lowercase().as_str() {
                "true" | "t" | "1" | "yes" | "on" => Ok(true),
                "false" | "f" | "0" | "no" | "off" => Ok(false),
                _ => invalid(format_args!("'{text}'"), "not a boolean literal"),
            },
            other => mismatch(other),
        }
    }
}

macro_rules! integer {
    ($($ty:ty),*) => {$(
        impl FromPostgresValue for $ty {
            fn from_postgres_value(value: &PostgresValue) -> Result<Self> {
                let wide = match value {
                    PostgresValue::Boolean(b) => i64::from(*b),
                    PostgresValue::Smallint(_)
                    | PostgresValue::Integer(_)
                    | PostgresValue::Bigint(_) => value.as_i64().unwrap_or_default(),
                    PostgresValue::Real(_) | PostgresValue::DoublePrecision(_) => {
                        let float = value.as_f64().unwrap_or_default();
                        if !float.is_finite() || float.fract() != 0.0 {
                            return invalid(float, "not integral");
                        }
                        float as i64
                    }
                    PostgresValue::Text(text) => return parse(text),
                    other => return mismatch(other),
                };
                <$ty>::try_from(wide).or_else(|e| invalid(wide, e))
            }
        }
    )*};
}

integer!(i16, i32, i64);

macro_rules! float {
    ($($ty:ty),*) => {$(
        impl FromPostgresValue for $ty {
            fn from_postgres_value(value: &PostgresValue) -> Result<Self> {
                match value {
                    PostgresValue::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
                    PostgresValue::Smallint(_)
                    | PostgresValue::Integer(_)
                    | PostgresValue::Bigint(_) => Ok(value.as_i64().unwrap_or_default() as $ty),
                    PostgresValue::Real(_) | PostgresValue::DoublePrecision(_) => {
                        Ok(value.as_f64().unwrap_or_default() as $ty)
                    }
                    PostgresValue::Text(text) => parse(text),
                    other => mismatch(other),
                }
            }
        }
    )*};
}

float!(f32, f64);

/// Text accepts any scalar in its display form.
impl FromPostgresValue for String {
    fn from_postgres_value(value: &PostgresValue) -> Result<Self> {
        Ok(match value {
            PostgresValue::Text(text) => text.clone(),
            PostgresValue::Boolean(b) => b.to_string(),
            PostgresValue::Smallint(n) => n.to_string(),
            PostgresValue::Integer(n) => n.to_string(),
            PostgresValue::Bigint(n) => n.to_string(),
            PostgresValue::Real(n) => n.to_string(),
            PostgresValue::DoublePrecision(n) => n.to_string(),
            PostgresValue::Json(json) => json.to_string(),
            #[cfg(feature = "uuid")]
            PostgresValue::Uuid(uuid) => uuid.to_string(),
            other => return mismatch(other),
        })
    }
}

impl FromPostgresValue for Vec<u8> {
    fn from_postgres_value(value: &PostgresValue) -> Result<Self> {
        match value {
            PostgresValue::Bytea(bytes) => Ok(bytes.clone()),
            PostgresValue::Text(text) => Ok(text.as_bytes().to_vec()),
            other => mismatch(other),
        }
    }
}

fn scalar_json(value: &PostgresValue) -> Option<serde_json::Value> {
    Some(match value {
        PostgresValue::Null => serde_json::Value::Null,
        PostgresValue::Boolean(b) => (*b).into(),
        PostgresValue::Smallint(_) | PostgresValue::Integer(_) | PostgresValue::Bigint(_) => {
            value.as_i64()?.into()
        }
        PostgresValue::Real(_) | PostgresValue::DoublePrecision(_) => value.as_f64()?.into(),
        _ => return None,
    })
}

impl FromPostgresValue for serde_json::Value {
    fn from_postgres_value(value: &PostgresValue) -> Result<Self> {
        match value {
            PostgresValue::Json(json) => Ok(json.clone()),
            PostgresValue::Text(text) => serde_json::from_str(text).or_else(|e| invalid("text", e)),
            other => scalar_json(other).map_or_else(|| mismatch(other), Ok),
        }
    }
}

/// Parsed JSON deserializes directly; text is parsed first. NULL is handed
/// to `T`, so `Json<Option<_>>` reads it as `None`.
impl<T: DeserializeOwned> FromPostgresValue for Json<T> {
    fn from_postgres_value(value: &PostgresValue) -> Result<Self> {
        let decoded = match value {
            PostgresValue::Json(json) => T::deserialize(json),
            PostgresValue::Text(text) => serde_json::from_str(text),
            other => match scalar_json(other) {
                Some(json) => T::deserialize(&json),
                None => return mismatch(other),
            },
        };
        decoded.map(Json).or_else(|e| invalid("JSON", e))
    }
}

impl<T: FromPostgresValue> FromPostgresValue for Option<T> {
    fn from_postgres_value(value: &PostgresValue) -> Result<Self> {
        match value {
            PostgresValue::Null => Ok(None),
            other => T::from_postgres_value(other).map(Some),
        }
    }
}

impl<T: FromPostgresValue + ArrayElement> FromPostgresValue for Vec<T> {
    fn from_postgres_value(value: &PostgresValue) -> Result<Self> {
        match value {
            PostgresValue::Array(items) => items.iter().map(T::from_postgres_value).collect(),
            other => mismatch(other),
        }
    }
}

#[cfg(feature = "uuid")]
impl FromPostgresValue for uuid::Uuid {
    fn from_postgres_value(value: &PostgresValue) -> Result<Self> {
        match value {
            PostgresValue::Uuid(uuid) => Ok(*uuid),
            PostgresValue::Text(text) => parse(text),
            other => mismatch(other),
        }
    }
}

/// Temporal types read their own variant or parse ISO-8601 text.
#[cfg(feature = "chrono")]
macro_rules! temporal {
    ($($ty:ty => $variant:ident),*) => {$(
        impl FromPostgresValue for $ty {
            fn from_postgres_value(value: &PostgresValue) -> Result<Self> {
                match value {
                    PostgresValue::$variant(v) => Ok(*v),
                    PostgresValue::Text(text) => parse(text),
                    other => mismatch(other),
                }
            }
        }
    )*};
}

#[cfg(feature = "chrono")]
temporal!(
    chrono::NaiveDate => Date,
    chrono::NaiveTime => Time,
    chrono::NaiveDateTime => Timestamp,
    chrono::DateTime<chrono::FixedOffset> => TimestampTz
);

#[cfg(test)]
mod tests {
    use super::*;

    fn read<T: FromPostgresValue>(value: PostgresValue) -> Option<T> {
        T::from_postgres_value(&value).ok()
    }

    #[test]
    fn integers_convert_with_range_checks() {
        assert_eq!(read::<i64>(PostgresValue::Integer(7)), Some(7));
        assert_eq!(read::<i16>(PostgresValue::Bigint(70_000)), None);
        assert_eq!(read::<i32>(PostgresValue::DoublePrecision(3.0)), Some(3));
        assert_eq!(read::<i32>(PostgresValue::DoublePrecision(3.5)), None);
        assert_eq!(read::<i32>(PostgresValue::Text("42".into())), Some(42));
    }

    #[test]
    fn only_optional_types_accept_null() {
        let err = String::from_postgres_value(&PostgresValue::Null).unwrap_err();
        assert!(err.to_string().contains("unexpected NULL"));
        assert_eq!(read::<Option<String>>(PostgresValue::Null), Some(None));
        assert_eq!(read::<String>(PostgresValue::Integer(5)), Some("5".to_owned()));
    }

    #[test]
    fn bool_reads_integers_and_literals() {
        assert_eq!(read::<bool>(PostgresValue::Smallint(0)), Some(false));
        assert_eq!(read::<bool>(PostgresValue::Text("ON".into())), Some(true));
        assert_eq!(read::<bool>(PostgresValue::Real(1.0)), None);
    }

    #[test]
    fn json_wrapper_reads_text_and_parsed_values() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct Prefs {
            theme: String,
        }

        let parsed = PostgresValue::Json(serde_json::json!({ "theme": "dark" }));
        let text = PostgresValue::Text(r#"{"theme":"light"}"#.to_owned());

        assert_eq!(
            read::<Json<Prefs>>(parsed).map(Json::into_inner),
            Some(Prefs { theme: "dark".into() })
        );
        assert_eq!(
            read::<Json<Prefs>>(text).map(Json::into_inner),
            Some(Prefs { theme: "light".into() })
        );
        assert_eq!(
            read::<Json<Option<Prefs>>>(PostgresValue::Null).map(Json::into_inner),
            Some(None)
        );
    }

    #[test]
    fn arrays_decode_elementwise() {
        let value = PostgresValue::Array(vec![PostgresValue::Integer(1), PostgresValue::Integer(2)]);
        assert_eq!(read::<Vec<i64>>(value), Some(vec![1, 2]));
    }
}
