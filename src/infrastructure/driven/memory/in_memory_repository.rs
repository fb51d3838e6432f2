use std::collections::BTreeMap;
use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::domain::repositories::repository::Result;
use crate::domain::repositories::{Fields, KeyedRepository, RecordId, Repository, RepositoryError};
use crate::infrastructure::driven::database::Table;

#[derive(Debug, Clone)]
struct StoredRow {
    created_at: DateTime<Utc>,
    fields: Fields,
}

#[derive(Debug, Default)]
struct State {
    last_id: RecordId,
    last_created_at: Option<DateTime<Utc>>,
    rows: BTreeMap<RecordId, StoredRow>,
}

/// Process-local repository with the same contract as
/// [`SqlRepository`](crate::infrastructure::driven::database::SqlRepository).
///
/// Rows are kept as field mappings and turned into `R` through serde, with the
/// id and creation timestamp columns filled in the way the store would.
pub struct InMemoryRepository<R> {
    table: Table,
    state: RwLock<State>,
    _record: PhantomData<fn() -> R>,
}

impl<R> InMemoryRepository<R> {
    pub fn new(table: Table) -> Self {
        Self {
            table,
            state: RwLock::new(State::default()),
            _record: PhantomData,
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<R: DeserializeOwned> InMemoryRepository<R> {
    fn to_read_model(&self, id: RecordId, row: &StoredRow) -> Result<R> {
        let mut object = row.fields.clone();
        object.insert(self.table.id_column().to_string(), Value::from(id));
        object.insert(
            self.table.created_at_column().to_string(),
            serde_json::to_value(row.created_at)?,
        );
        Ok(serde_json::from_value(Value::Object(object))?)
    }
}

#[async_trait]
impl<R> Repository for InMemoryRepository<R>
where
    R: DeserializeOwned + Send,
{
    type Record = R;

    #[instrument(level = "debug", skip(self, data), fields(table = %self.table.name()))]
    async fn add_one(&self, data: Fields) -> Result<RecordId> {
        self.table.check_writable(&data)?;

        let mut state = self.state.write().await;
        // Creation timestamps never go backwards, even if the wall clock does.
        let now = Utc::now();
        let created_at = match state.last_created_at {
            Some(last) if last > now => last,
            _ => now,
        };
        state.last_id += 1;
        state.last_created_at = Some(created_at);

        let id = state.last_id;
        state.rows.insert(id, StoredRow { created_at, fields: data });

        debug!("add_one::{}", id);
        Ok(id)
    }

    #[instrument(level = "debug", skip(self), fields(table = %self.table.name()))]
    async fn find_all(&self) -> Result<Vec<R>> {
        let state = self.state.read().await;

        let mut rows: Vec<_> = state.rows.iter().collect();
        rows.sort_by(|(a_id, a), (b_id, b)| b.created_at.cmp(&a.created_at).then(b_id.cmp(a_id)));

        let records = rows
            .into_iter()
            .map(|(id, row)| self.to_read_model(*id, row))
            .collect::<Result<Vec<_>>>()?;

        debug!("find_all::{} rows", records.len());
        Ok(records)
    }
}

#[async_trait]
impl<R> KeyedRepository for InMemoryRepository<R>
where
    R: DeserializeOwned + Send,
{
    #[instrument(level = "debug", skip(self), fields(table = %self.table.name()))]
    async fn find_one_by_id(&self, id: RecordId) -> Result<R> {
        let state = self.state.read().await;
        match state.rows.get(&id) {
            Some(row) => self.to_read_model(id, row),
            None => Err(RepositoryError::NotFound(id)),
        }
    }

    #[instrument(level = "debug", skip(self, data), fields(table = %self.table.name()))]
    async fn update(&self, id: RecordId, data: Fields) -> Result<()> {
        self.table.check_writable(&data)?;

        let mut state = self.state.write().await;
        match state.rows.get_mut(&id) {
            Some(row) => {
                row.fields.extend(data);
                debug!("update::{}: 1 rows", id);
            }
            None => debug!("update::{}: 0 rows", id),
        }
        Ok(())
    }
}
