//! Dialect-neutral building blocks for crampon.
//!
//! This crate holds the SQL fragment model, the typed expression layer, the
//! model metadata tables consumed by the result caster, and the shared error
//! taxonomy. The PostgreSQL dialect lives in `crampon-postgres`.

pub mod error;
pub mod expr;
pub mod join;
pub mod meta;
pub mod order;
pub mod param;
pub mod sql;
pub mod tracing;
pub mod traits;
pub mod types;

pub use error::{CramponError, FieldError, Result, SelectionKind};
pub use join::JoinType;
pub use meta::{FieldMeta, TableMeta};
pub use order::{Direction, OrderBy};
pub use param::Param;
pub use sql::{SQL, SQLChunk, Token};
pub use traits::{SQLParam, ToSQL};
