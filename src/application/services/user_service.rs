use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::application::ports::in_ports::UserManagementUseCase;
use crate::domain::entities::user::{NewUser, User};
use crate::domain::repositories::repository::Result;
use crate::domain::repositories::{KeyedRepository, RecordId};

/// User operations backed by a single repository, fixed for the lifetime of
/// the service.
pub struct UserService<R: KeyedRepository<Record = User>> {
    users_repo: Arc<R>,
}

impl<R: KeyedRepository<Record = User>> UserService<R> {
    pub fn new(users_repo: Arc<R>) -> Self {
        Self { users_repo }
    }

    /// Builds the repository once, at construction time.
    pub fn from_factory<F>(factory: F) -> Self
    where
        F: FnOnce() -> R,
    {
        Self::new(Arc::new(factory()))
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.users_repo
    }
}

#[async_trait]
impl<R: KeyedRepository<Record = User>> UserManagementUseCase for UserService<R> {
    async fn add_user(&self, user: NewUser) -> Result<RecordId> {
        let user_id = self.users_repo.add_one(user.to_fields()).await?;
        debug!("add_user::{}", user_id);
        Ok(user_id)
    }

    async fn get_users(&self) -> Result<Vec<User>> {
        self.users_repo.find_all().await
    }

    async fn get_user(&self, id: RecordId) -> Result<User> {
        self.users_repo.find_one_by_id(id).await
    }
}
