use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::repositories::{Fields, RecordId};

const MAX_NAME_LEN: usize = 255;

/// Read model of a row in the `users` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SchemaError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("name is longer than {} characters", MAX_NAME_LEN)]
    NameTooLong,

    #[error("invalid email address: {0}")]
    InvalidEmail(String),
}

#[derive(Debug, Deserialize)]
struct RawNewUser {
    name: String,
    email: String,
}

/// Validated input for creating a user. Holding one means the fields passed
/// validation, whether it was built with [`NewUser::new`] or deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawNewUser")]
pub struct NewUser {
    name: String,
    email: String,
}

impl NewUser {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Result<Self, SchemaError> {
        let name = name.into().trim().to_string();
        let email = email.into().trim().to_string();

        if name.is_empty() {
            return Err(SchemaError::EmptyName);
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(SchemaError::NameTooLong);
        }
        if !is_valid_email(&email) {
            return Err(SchemaError::InvalidEmail(email));
        }

        Ok(Self { name, email })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Column mapping handed to the repository on insert.
    pub fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert("name".into(), self.name.clone().into());
        fields.insert("email".into(), self.email.clone().into());
        fields
    }
}

impl TryFrom<RawNewUser> for NewUser {
    type Error = SchemaError;

    fn try_from(raw: RawNewUser) -> Result<Self, Self::Error> {
        NewUser::new(raw.name, raw.email)
    }
}

fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@') && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}
