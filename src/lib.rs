//! # crampon
//!
//! A typed PostgreSQL query builder with a result-casting engine.
//!
//! Models are declared with [`pg_model!`]. Queries are built from typed
//! columns and function wrappers, and select results are cast back into
//! models, column values and aggregate results in select order.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use crampon::prelude::*;
//!
//! pg_model! {
//!     #[derive(Debug, Clone)]
//!     pub struct User in "users" {
//!         pub id: i32 => Int { primary_key, autoincrement },
//!         pub name: String => Text,
//!         pub age: i32 => Int,
//!     }
//! }
//!
//! # async fn run(db: Crampon<impl Driver>) -> crampon::Result<()> {
//! let mut users = vec![User { id: 0, name: "Ada".into(), age: 36 }];
//! db.insert(&mut users).await?;
//!
//! let user = User::columns();
//! let rows: Vec<(User, i64)> = db
//!     .exec(select((User::all(), func::count(user.id))).group_by([user.id]))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! | Feature          | Enables                                     |
//! |------------------|---------------------------------------------|
//! | `tokio-postgres` | [`driver::TokioPostgres`]                   |
//! | `parallel`       | rayon batch casting above a row threshold   |
//! | `tracing`        | debug events for queries and batch casts    |
//! | `uuid`, `chrono` | UUID and date/time values                   |

pub mod driver;
mod session;

pub use driver::Driver;
pub use session::Crampon;

/// Result type for crampon operations
pub use crampon_core::error::Result;

/// Error types
pub mod error {
    pub use crampon_core::error::{CramponError, FieldError, SelectionKind};
}

pub use crampon_core::CramponError;

/// Dialect-neutral building blocks: SQL fragments, typed expressions and
/// model metadata.
///
/// ```rust,ignore
/// use crampon::core::expr::{and, eq, gt};
/// ```
pub mod core {
    pub use crampon_core::{
        Direction, FieldMeta, JoinType, OrderBy, SQL, SQLChunk, TableMeta, ToSQL, Token,
    };

    /// SQL type markers such as `Int`, `Text` and `Jsonb`.
    pub use crampon_core::types;

    /// Comparisons, logical operators, arithmetic and aggregates.
    pub use crampon_core::expr;
}

/// PostgreSQL values, models, builders and result casting.
pub use crampon_postgres as postgres;

pub use crampon_postgres::pg_model;

pub mod prelude {
    pub use crampon_postgres::prelude::*;

    pub use crate::{Crampon, Driver};
}
