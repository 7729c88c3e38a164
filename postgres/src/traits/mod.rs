//! Conversions between Rust field types and [`PostgresValue`](crate::PostgresValue).

mod column;
mod decode;

pub use column::ColumnValue;
pub use decode::FromPostgresValue;
