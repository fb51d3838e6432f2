pub mod sql_repository;
pub mod table;

pub use sql_repository::SqlRepository;
pub use table::Table;
