//! Typed extraction from cast rows.

use crampon_core::{CramponError, Result};
use serde::de::DeserializeOwned;

use super::{CastRow, CastValue, ResultSet};
use crate::traits::FromPostgresValue;
use crate::values::{ArrayElement, Json, PostgresValue};

/// Conversion from one cast value.
pub trait FromCastValue: Sized {
    fn from_cast_value(value: CastValue) -> Result<Self>;
}

/// Conversion from a whole cast row.
pub trait FromCastRow: Sized {
    fn from_cast_row(row: CastRow) -> Result<Self>;
}

/// Extracts every row of a result set.
pub fn extract_all<T: FromCastRow>(rows: ResultSet) -> Result<Vec<T>> {
    rows.into_iter().map(T::from_cast_row).collect()
}

impl FromCastValue for CastValue {
    fn from_cast_value(value: CastValue) -> Result<Self> {
        Ok(value)
    }
}

impl FromCastRow for CastRow {
    fn from_cast_row(row: CastRow) -> Result<Self> {
        Ok(row)
    }
}

impl FromCastValue for PostgresValue {
    fn from_cast_value(value: CastValue) -> Result<Self> {
        value.into_value()
    }
}

impl FromCastRow for PostgresValue {
    fn from_cast_row(row: CastRow) -> Result<Self> {
        row.into_single().and_then(Self::from_cast_value)
    }
}

macro_rules! cast_via_postgres_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromCastValue for $ty {
                fn from_cast_value(value: CastValue) -> Result<Self> {
                    <$ty as FromPostgresValue>::from_postgres_value(&value.into_value()?)
                }
            }

            impl FromCastRow for $ty {
                fn from_cast_row(row: CastRow) -> Result<Self> {
                    row.into_single().and_then(<$ty as FromCastValue>::from_cast_value)
                }
            }
        )*
    };
}

cast_via_postgres_value!(
    bool,
    i16,
    i32,
    i64,
    f32,
    f64,
    String,
    Vec<u8>,
    serde_json::Value
);

#[cfg(feature = "uuid")]
cast_via_postgres_value!(uuid::Uuid);

#[cfg(feature = "chrono")]
cast_via_postgres_value!(
    chrono::NaiveDate,
    chrono::NaiveTime,
    chrono::NaiveDateTime,
    chrono::DateTime<chrono::FixedOffset>,
);

impl<T: FromPostgresValue> FromCastValue for Option<T> {
    fn from_cast_value(value: CastValue) -> Result<Self> {
        Self::from_postgres_value(&value.into_value()?)
    }
}

impl<T: FromPostgresValue> FromCastRow for Option<T> {
    fn from_cast_row(row: CastRow) -> Result<Self> {
        row.into_single().and_then(Self::from_cast_value)
    }
}

impl<T: DeserializeOwned> FromCastValue for Json<T> {
    fn from_cast_value(value: CastValue) -> Result<Self> {
        Self::from_postgres_value(&value.into_value()?)
    }
}

impl<T: DeserializeOwned> FromCastRow for Json<T> {
    fn from_cast_row(row: CastRow) -> Result<Self> {
        row.into_single().and_then(Self::from_cast_value)
    }
}

impl<T: FromPostgresValue + ArrayElement> FromCastValue for Vec<T> {
    fn from_cast_value(value: CastValue) -> Result<Self> {
        Self::from_postgres_value(&value.into_value()?)
    }
}

impl<T: FromPostgresValue + ArrayElement> FromCastRow for Vec<T> {
    fn from_cast_row(row: CastRow) -> Result<Self> {
        row.into_single().and_then(Self::from_cast_value)
    }
}

macro_rules! tuple_from_cast_row {
    ($len:literal; $($T:ident),+) => {
        impl<$($T: FromCastValue),+> FromCastRow for ($($T,)+) {
            fn from_cast_row(row: CastRow) -> Result<Self> {
                let values = row.into_values();
                if values.len() != $len {
                    return Err(CramponError::ConversionError(
                        format!("expected {} values per row, found {}", $len, values.len()).into(),
                    ));
                }
                let mut values = values.into_iter();
                Ok(($(
                    match values.next() {
                        Some(value) => $T::from_cast_value(value)?,
                        None => return Err(CramponError::ConversionError("row ended early".into())),
                    },
                )+))
            }
        }
    };
}

tuple_from_cast_row!(1; A);
tuple_from_cast_row!(2; A, B);
tuple_from_cast_row!(3; A, B, C);
tuple_from_cast_row!(4; A, B, C, D);
tuple_from_cast_row!(5; A, B, C, D, E);
tuple_from_cast_row!(6; A, B, C, D, E, F);
tuple_from_cast_row!(7; A, B, C, D, E, F, G);
tuple_from_cast_row!(8; A, B, C, D, E, F, G, H);

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn scalars_extract_from_single_rows() {
        let row = CastRow::Single(CastValue::Value(PostgresValue::Bigint(9)));
        assert_eq!(i64::from_cast_row(row).ok(), Some(9));
    }

    #[test]
    fn tuples_check_arity() {
        let row = CastRow::Tuple(smallvec![
            CastValue::Value(PostgresValue::Text("a".into())),
            CastValue::Value(PostgresValue::Null),
        ]);
        let (name, age) = <(String, Option<i32>)>::from_cast_row(row.clone()).expect("pair");
        assert_eq!(name, "a");
        assert_eq!(age, None);

        assert!(<(String, Option<i32>, i64)>::from_cast_row(row).is_err());
    }

    #[test]
    fn single_value_fills_one_tuple() {
        let row = CastRow::Single(CastValue::Value(PostgresValue::Boolean(true)));
        assert_eq!(<(bool,)>::from_cast_row(row).ok(), Some((true,)));
    }
}
