//! Database drivers.
//!
//! A [`Driver`] runs rendered SQL and hands rows back as [`PgRow`]s; the
//! session does everything else.

use std::future::Future;

use crampon_core::Result;
use crampon_postgres::{PgRow, PostgresValue};

#[cfg(feature = "tokio-postgres")]
pub mod tokio_postgres;

#[cfg(feature = "tokio-postgres")]
pub use self::tokio_postgres::TokioPostgres;

/// Executes SQL with `$n` placeholders against a database.
pub trait Driver: Send + Sync {
    /// Runs a row-returning statement.
    fn fetch(
        &self,
        sql: &str,
        params: &[PostgresValue],
    ) -> impl Future<Output = Result<Vec<PgRow>>> + Send;

    /// Runs a statement and returns the number of affected rows.
    fn execute(
        &self,
        sql: &str,
        params: &[PostgresValue],
    ) -> impl Future<Output = Result<u64>> + Send;
}
