use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::{debug, instrument};

use crate::domain::repositories::repository::Result;
use crate::domain::repositories::{Fields, KeyedRepository, RecordId, Repository, RepositoryError};
use crate::infrastructure::driven::database::table::Table;

/// PostgreSQL-backed repository over the rows of one [`Table`], returning
/// them as `R`.
pub struct SqlRepository<R> {
    pool: Arc<PgPool>,
    table: Table,
    _record: PhantomData<fn() -> R>,
}

impl<R> SqlRepository<R> {
    pub fn new(pool: Arc<PgPool>, table: Table) -> Self {
        Self {
            pool,
            table,
            _record: PhantomData,
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Pushes `jsonb_populate_record(NULL::<table>, $n) AS r`, which lets the
    /// server convert every JSON value to the type of its column.
    fn push_populated_record(&self, builder: &mut QueryBuilder<'_, Postgres>, data: Fields) {
        builder.push("jsonb_populate_record(NULL::");
        builder.push(self.table.quoted_name());
        builder.push(", ");
        builder.push_bind(Json(Value::Object(data)));
        builder.push(") AS r");
    }

    fn select_statement(&self) -> String {
        format!("SELECT * FROM {}", self.table.quoted_name())
    }
}

#[async_trait]
impl<R> Repository for SqlRepository<R>
where
    R: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    type Record = R;

    #[instrument(level = "debug", skip(self, data), fields(table = %self.table.name()))]
    async fn add_one(&self, data: Fields) -> Result<RecordId> {
        self.table.check_writable(&data)?;

        let mut builder = QueryBuilder::<Postgres>::new("INSERT INTO ");
        builder.push(self.table.quoted_name());
        if data.is_empty() {
            builder.push(" DEFAULT VALUES");
        } else {
            let columns: Vec<String> = data.keys().map(|c| Table::quote(c)).collect();
            builder.push(" (");
            builder.push(columns.join(", "));
            builder.push(") SELECT ");
            builder.push(columns.iter().map(|c| format!("r.{}", c)).collect::<Vec<_>>().join(", "));
            builder.push(" FROM ");
            self.push_populated_record(&mut builder, data);
        }
        builder.push(" RETURNING ");
        builder.push(self.table.quoted_id_column());

        let mut tx = self.pool.begin().await?;
        let id = builder.build_query_scalar::<RecordId>().fetch_one(&mut *tx).await?;
        tx.commit().await?;

        debug!("add_one::{}", id);
        Ok(id)
    }

    #[instrument(level = "debug", skip(self), fields(table = %self.table.name()))]
    async fn find_all(&self) -> Result<Vec<R>> {
        let sql = format!(
            "{} ORDER BY {} DESC, {} DESC",
            self.select_statement(),
            self.table.quoted_created_at_column(),
            self.table.quoted_id_column(),
        );

        let mut conn = self.pool.acquire().await?;
        let records = sqlx::query_as::<_, R>(&sql).fetch_all(&mut *conn).await?;

        debug!("find_all::{} rows", records.len());
        Ok(records)
    }
}

#[async_trait]
impl<R> KeyedRepository for SqlRepository<R>
where
    R: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    #[instrument(level = "debug", skip(self), fields(table = %self.table.name()))]
    async fn find_one_by_id(&self, id: RecordId) -> Result<R> {
        let sql = format!("{} WHERE {} = $1", self.select_statement(), self.table.quoted_id_column());

        let mut conn = self.pool.acquire().await?;
        let record = sqlx::query_as::<_, R>(&sql).bind(id).fetch_optional(&mut *conn).await?;

        record.ok_or(RepositoryError::NotFound(id))
    }

    #[instrument(level = "debug", skip(self, data), fields(table = %self.table.name()))]
    async fn update(&self, id: RecordId, data: Fields) -> Result<()> {
        self.table.check_writable(&data)?;
        if data.is_empty() {
            debug!("update::{}: nothing to set", id);
            return Ok(());
        }

        let mut builder = QueryBuilder::<Postgres>::new("UPDATE ");
        builder.push(self.table.quoted_name());
        builder.push(" SET ");
        let assignments: Vec<String> = data
            .keys()
            .map(|c| {
                let column = Table::quote(c);
                format!("{} = r.{}", column, column)
            })
            .collect();
        builder.push(assignments.join(", "));
        builder.push(" FROM ");
        self.push_populated_record(&mut builder, data);
        builder.push(" WHERE ");
        builder.push(self.table.quoted_name());
        builder.push(".");
        builder.push(self.table.quoted_id_column());
        builder.push(" = ");
        builder.push_bind(id);

        let mut tx = self.pool.begin().await?;
        let result = builder.build().execute(&mut *tx).await?;
        tx.commit().await?;

        debug!("update::{}: {} rows", id, result.rows_affected());
        Ok(())
    }
}
