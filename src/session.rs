use crampon_core::{CramponError, Result};
use crampon_postgres::builder::{
    IntoStatement, PreparedSelect, SelectBuilder, Statement, delete_instance, insert,
    update_changes,
};
use crampon_postgres::cast::{CastOptions, FromCastRow};
use crampon_postgres::{Model, PgRow, Tracked};

use crate::driver::Driver;

/// PostgreSQL caps a statement at 65535 bind parameters.
const MAX_PARAMS: usize = u16::MAX as usize;

/// A database session over driver `D`.
///
/// Queries are built with the `crampon_postgres` builders and run here; select
/// results come back cast into the selection's Rust types.
///
/// ```ignore
/// let db = Crampon::new(driver);
/// let user = User::columns();
///
/// let adults: Vec<User> = db.exec(select(User::all()).r#where(gt(user.age, 18))).await?;
/// let counts: Vec<(String, i64)> = db
///     .exec(select((user.name, func::count(user.id))).group_by([user.name]))
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct Crampon<D> {
    driver: D,
    cast_options: CastOptions,
}

impl<D: Driver> Crampon<D> {
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            cast_options: CastOptions::default(),
        }
    }

    /// Replaces the options used for every batch cast.
    pub fn with_cast_options(mut self, options: CastOptions) -> Self {
        self.cast_options = options;
        self
    }

    #[inline]
    pub fn driver(&self) -> &D {
        &self.driver
    }

    #[inline]
    pub fn cast_options(&self) -> &CastOptions {
        &self.cast_options
    }

    async fn fetch_statement(&self, statement: &Statement) -> Result<Vec<PgRow>> {
        crampon_core::crampon_trace_query!(&statement.sql, statement.params.len());
        self.driver.fetch(&statement.sql, &statement.params).await
    }

    async fn execute_statement(&self, statement: &Statement) -> Result<u64> {
        crampon_core::crampon_trace_query!(&statement.sql, statement.params.len());
        self.driver.execute(&statement.sql, &statement.params).await
    }

    /// Runs a SELECT and casts every row into the selection's output type.
    pub async fn exec<'a, Out, S>(&self, query: SelectBuilder<'a, Out, S>) -> Result<Vec<Out>>
    where
        Out: FromCastRow,
    {
        let prepared = query.into_prepared()?;
        self.exec_prepared(&prepared).await
    }

    /// Runs an already prepared SELECT. The select list is not reclassified.
    pub async fn exec_prepared<Out: FromCastRow>(
        &self,
        prepared: &PreparedSelect<Out>,
    ) -> Result<Vec<Out>> {
        let rows = self.fetch_statement(prepared.statement()).await?;
        prepared.cast(&rows, &self.cast_options)
    }

    /// Runs any statement and returns the raw rows.
    pub async fn fetch_raw(&self, query: impl IntoStatement) -> Result<Vec<PgRow>> {
        let statement = query.into_statement()?;
        self.fetch_statement(&statement).await
    }

    /// Runs a statement that returns no rows, such as an UPDATE or DELETE.
    pub async fn execute(&self, query: impl IntoStatement) -> Result<u64> {
        let statement = query.into_statement()?;
        self.execute_statement(&statement).await
    }

    /// Inserts `models` and writes generated primary keys back into them.
    ///
    /// Rows are sent in as few statements as the bind-parameter limit allows.
    pub async fn insert<M: Model>(&self, models: &mut [M]) -> Result<()> {
        if models.is_empty() {
            return Ok(());
        }

        let table = M::table();
        let columns = table
            .stored_fields()
            .filter(|field| !field.autoincrement)
            .count();
        let chunk_size = (MAX_PARAMS / columns.max(1)).max(1);
        let returning = table.primary_key().is_some();

        for chunk in models.chunks_mut(chunk_size) {
            if !returning {
                let statement = insert::<M>().values(chunk).into_statement()?;
                self.execute_statement(&statement).await?;
                continue;
            }

            let statement = insert::<M>()
                .values(chunk)
                .returning_primary_key()
                .into_statement()?;
            let rows = self.fetch_statement(&statement).await?;
            if rows.len() != chunk.len() {
                return Err(CramponError::ExecutionError(format!(
                    "insert into {} returned {} keys for {} rows",
                    table.name,
                    rows.len(),
                    chunk.len()
                )));
            }

            for (model, row) in chunk.iter_mut().zip(&rows) {
                let key = row.get_at(0).ok_or_else(|| {
                    CramponError::ExecutionError("insert returned an empty row".into())
                })?;
                model.set_primary_key(key)?;
            }
        }
        Ok(())
    }

    /// Inserts tracked `models`, then takes their inserted values, generated
    /// keys included, as the saved state.
    pub async fn insert_tracked<M: Model>(&self, models: &mut [Tracked<M>]) -> Result<()> {
        let mut plain: Vec<M> = models.iter().map(|model| model.get().clone()).collect();
        self.insert(&mut plain).await?;
        for (tracked, inserted) in models.iter_mut().zip(plain) {
            **tracked = inserted;
            tracked.mark_saved()?;
        }
        Ok(())
    }

    /// Writes the fields of `models` changed since they were loaded or last
    /// saved, matching rows by the saved primary key.
    ///
    /// Unchanged models send no statement. Each written model is marked
    /// saved. Fails with `QueryError` before touching the database when a
    /// changed model has no primary key.
    pub async fn update<M: Model>(&self, models: &mut [Tracked<M>]) -> Result<u64> {
        let statements = models
            .iter()
            .map(update_changes)
            .collect::<Result<Vec<_>>>()?;
        let mut affected = 0;
        for (model, statement) in models.iter_mut().zip(&statements) {
            let Some(statement) = statement else {
                continue;
            };
            affected += self.execute_statement(statement).await?;
            model.mark_saved()?;
        }
        Ok(affected)
    }

    /// Deletes `models` by primary key.
    pub async fn delete<M: Model>(&self, models: &[M]) -> Result<u64> {
        let statements = models
            .iter()
            .map(delete_instance)
            .collect::<Result<Vec<_>>>()?;
        let mut affected = 0;
        for statement in &statements {
            affected += self.execute_statement(statement).await?;
        }
        Ok(affected)
    }
}
