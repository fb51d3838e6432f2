pub mod error;
pub mod repository;

pub use error::RepositoryError;
pub use repository::{Fields, KeyedRepository, RecordId, Repository};
