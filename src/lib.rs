pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::ports::in_ports::UserManagementUseCase;
pub use application::services::UserService;
pub use domain::entities::{NewUser, SchemaError, User};
pub use domain::repositories::{Fields, KeyedRepository, RecordId, Repository, RepositoryError};
pub use infrastructure::driven::database::{SqlRepository, Table};
pub use infrastructure::driven::memory::InMemoryRepository;
