use async_trait::async_trait;

use crate::domain::entities::user::{NewUser, User};
use crate::domain::repositories::repository::Result;
use crate::domain::repositories::RecordId;

#[async_trait]
pub trait UserManagementUseCase: Send + Sync {
    async fn add_user(&self, user: NewUser) -> Result<RecordId>;
    async fn get_users(&self) -> Result<Vec<User>>;
    async fn get_user(&self, id: RecordId) -> Result<User>;
}
