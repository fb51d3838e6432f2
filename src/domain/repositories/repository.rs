use async_trait::async_trait;

use crate::domain::repositories::error::RepositoryError;

/// Store-assigned identifier of a record.
pub type RecordId = i64;

/// Plain column name to value mapping handed to a repository on writes.
pub type Fields = serde_json::Map<String, serde_json::Value>;

pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Access to the records of a single table.
///
/// Every call runs in its own store session, so implementations hold no
/// connection between calls.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Read model each stored row is converted into before it is returned.
    type Record: Send;

    /// Inserts one row and returns the identifier the store assigned to it.
    async fn add_one(&self, data: Fields) -> Result<RecordId>;

    /// Returns every row, most recently created first.
    async fn find_all(&self) -> Result<Vec<Self::Record>>;
}

/// Identifier-addressed reads and writes on top of [`Repository`].
#[async_trait]
pub trait KeyedRepository: Repository {
    /// Fails with [`RepositoryError::NotFound`] when no row has `id`.
    async fn find_one_by_id(&self, id: RecordId) -> Result<Self::Record>;

    /// Sets `data` on the row with `id` in one committed write.
    ///
    /// A missing `id` is not an error: the write commits and touches no row.
    async fn update(&self, id: RecordId, data: Fields) -> Result<()>;
}
