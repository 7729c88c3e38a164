//! PostgreSQL support for crampon
//!
//! This crate provides the PostgreSQL value type, model declarations, typed
//! query builders and the result-casting engine that turns raw rows back
//! into models, columns and function results.

pub mod builder;
pub mod cast;
pub mod columns;
pub mod func;
pub mod functions;
mod macros;
pub mod model;
pub mod selection;
pub mod tracked;
pub mod traits;
pub mod types {
    pub use crampon_core::types::*;

    pub type Int2 = SmallInt;
    pub type Int4 = Int;
    pub type Int8 = BigInt;
    pub type Float4 = Float;
    pub type Float8 = Double;
    pub type Varchar = VarChar;
    pub type Bytea = Bytes;
    pub type Boolean = Bool;
    pub type Timestamptz = TimestampTz;
}
pub mod values;

pub use builder::{IntoStatement, Statement, delete, insert, select, text, update};
pub use cast::{CastOptions, CastRow, CastValue, FromCastRow, FromCastValue, PgRow, ResultSet};
pub use columns::Column;
pub use crampon_core::{CramponError, FieldError, FieldMeta, Result, TableMeta};
pub use functions::Function;
pub use model::{All, FieldValues, Model, ModelInstance, ModelRef};
pub use tracked::Tracked;
pub use traits::{ColumnValue, FromPostgresValue};
pub use values::{Json, PostgresValue};

/// Everything needed to declare models and write queries.
///
/// ```ignore
/// use crampon_postgres::prelude::*;
/// ```
pub mod prelude {
    pub use crate::builder::{delete, insert, select, text, update};
    pub use crate::func;
    pub use crate::pg_model;
    pub use crate::types::*;
    pub use crate::{
        Column, FromCastRow, FromCastValue, Model, PgRow, PostgresValue, Statement, Tracked,
    };
    pub use crampon_core::expr::{
        and, between, eq, gt, gte, in_array, is_not_null, is_null, like, lt, lte, neq, not,
        not_in_array, not_like, or,
    };
    pub use crampon_core::{JoinType, OrderBy};
}

#[doc(hidden)]
pub mod __private {
    pub use const_format;
    pub use paste;
}
