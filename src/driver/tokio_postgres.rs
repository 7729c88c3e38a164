//! Async PostgreSQL driver using [`tokio_postgres`].
//!
//! ```no_run
//! use crampon::Crampon;
//! use crampon::driver::TokioPostgres;
//!
//! # async fn run() -> crampon::Result<()> {
//! let (client, connection) =
//!     ::tokio_postgres::connect("host=localhost user=postgres", ::tokio_postgres::NoTls).await?;
//! tokio::spawn(async move {
//!     if let Err(error) = connection.await {
//!         eprintln!("connection error: {error}");
//!     }
//! });
//!
//! let db = Crampon::new(TokioPostgres::new(client));
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use crampon_core::Result;
use crampon_postgres::cast::RowSchema;
use crampon_postgres::{PgRow, PostgresValue};
use smallvec::SmallVec;
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, Row};

use super::Driver;

/// [`Driver`] over a [`tokio_postgres::Client`].
///
/// The client sits behind an [`Arc`], so the driver is cheap to clone into
/// spawned tasks.
#[derive(Debug, Clone)]
pub struct TokioPostgres {
    client: Arc<Client>,
}

impl TokioPostgres {
    #[inline]
    pub fn new(client: Client) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Gets a reference to the underlying client
    #[inline]
    pub fn client(&self) -> &Client {
        &self.client
    }
}

fn param_refs(params: &[PostgresValue]) -> SmallVec<[&(dyn ToSql + Sync); 8]> {
    params
        .iter()
        .map(|param| param as &(dyn ToSql + Sync))
        .collect()
}

/// Converts driver rows, sharing one name index across the result set.
fn into_pg_rows(rows: Vec<Row>) -> Result<Vec<PgRow>> {
    let Some(first) = rows.first() else {
        return Ok(Vec::new());
    };
    let schema = RowSchema::new(first.columns().iter().map(|column| column.name()));

    rows.iter()
        .map(|row| {
            let values = (0..row.len())
                .map(|index| row.try_get::<_, PostgresValue>(index))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            PgRow::new(Arc::clone(&schema), values)
        })
        .collect()
}

impl Driver for TokioPostgres {
    async fn fetch(&self, sql: &str, params: &[PostgresValue]) -> Result<Vec<PgRow>> {
        let rows = self.client.query(sql, &param_refs(params)[..]).await?;
        into_pg_rows(rows)
    }

    async fn execute(&self, sql: &str, params: &[PostgresValue]) -> Result<u64> {
        Ok(self.client.execute(sql, &param_refs(params)[..]).await?)
    }
}
