//! Wire encoding of [`PostgresValue`] through `tokio-postgres`.

#[cfg(feature = "tokio-postgres")]
mod pg {
    use std::error::Error;

    use bytes::BytesMut;
    use tokio_postgres::types::{FromSql, IsNull, Kind, ToSql, Type, to_sql_checked};

    use crate::values::PostgresValue;

    type BoxError = Box<dyn Error + Sync + Send>;

    impl PostgresValue {
        /// The typed value the driver encodes, or `None` for NULL.
        fn wire(&self) -> Option<&(dyn ToSql + Sync)> {
            let value: &(dyn ToSql + Sync) = match self {
                PostgresValue::Null => return None,
                PostgresValue::Smallint(v) => v,
                PostgresValue::Integer(v) => v,
                PostgresValue::Bigint(v) => v,
                PostgresValue::Real(v) => v,
                PostgresValue::DoublePrecision(v) => v,
                PostgresValue::Text(v) => v,
                PostgresValue::Bytea(v) => v,
                PostgresValue::Boolean(v) => v,
                PostgresValue::Json(v) => v,
                #[cfg(feature = "uuid")]
                PostgresValue::Uuid(v) => v,
                #[cfg(feature = "chrono")]
                PostgresValue::Date(v) => v,
                #[cfg(feature = "chrono")]
                PostgresValue::Time(v) => v,
                #[cfg(feature = "chrono")]
                PostgresValue::Timestamp(v) => v,
                #[cfg(feature = "chrono")]
                PostgresValue::TimestampTz(v) => v,
                PostgresValue::Array(v) => v,
            };
            Some(value)
        }
    }

    impl ToSql for PostgresValue {
        fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
            match self.wire() {
                Some(value) => value.to_sql_checked(ty, out),
                None => Ok(IsNull::Yes),
            }
        }

        // The wrapped value checks the parameter type in `to_sql`.
        fn accepts(_ty: &Type) -> bool {
            true
        }

        to_sql_checked!();
    }

    impl<'a> FromSql<'a> for PostgresValue {
        fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, BoxError> {
            Ok(match ty.name() {
                "bool" => PostgresValue::Boolean(FromSql::from_sql(ty, raw)?),
                "int2" => PostgresValue::Smallint(FromSql::from_sql(ty, raw)?),
                "int4" => PostgresValue::Integer(FromSql::from_sql(ty, raw)?),
                "int8" => PostgresValue::Bigint(FromSql::from_sql(ty, raw)?),
                "float4" => PostgresValue::Real(FromSql::from_sql(ty, raw)?),
                "float8" => PostgresValue::DoublePrecision(FromSql::from_sql(ty, raw)?),
                "bytea" => PostgresValue::Bytea(FromSql::from_sql(ty, raw)?),
                "json" | "jsonb" => PostgresValue::Json(FromSql::from_sql(ty, raw)?),
                #[cfg(feature = "uuid")]
                "uuid" => PostgresValue::Uuid(FromSql::from_sql(ty, raw)?),
                #[cfg(feature = "chrono")]
                "date" => PostgresValue::Date(FromSql::from_sql(ty, raw)?),
                #[cfg(feature = "chrono")]
                "time" => PostgresValue::Time(FromSql::from_sql(ty, raw)?),
                #[cfg(feature = "chrono")]
                "timestamp" => PostgresValue::Timestamp(FromSql::from_sql(ty, raw)?),
                #[cfg(feature = "chrono")]
                "timestamptz" => PostgresValue::TimestampTz(FromSql::from_sql(ty, raw)?),
                "text" | "varchar" | "bpchar" | "name" | "unknown" | "citext" => {
                    PostgresValue::Text(String::from_utf8(raw.to_vec())?)
                }
                _ => match ty.kind() {
                    Kind::Array(_) => PostgresValue::Array(FromSql::from_sql(ty, raw)?),
                    // enum labels travel as their text
                    Kind::Enum(_) => PostgresValue::Text(String::from_utf8(raw.to_vec())?),
                    _ => return Err(format!("unsupported PostgreSQL type {}", ty.name()).into()),
                },
            })
        }

        fn from_sql_null(_ty: &Type) -> Result<Self, BoxError> {
            Ok(PostgresValue::Null)
        }

        fn accepts(_ty: &Type) -> bool {
            true
        }
    }

}
