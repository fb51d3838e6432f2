pub mod user;

pub use user::{NewUser, SchemaError, User};
