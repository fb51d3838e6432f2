use crate::domain::repositories::{Fields, RepositoryError};

/// Descriptor of the table a repository is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: String,
    id_column: String,
    created_at_column: String,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id_column: "id".to_string(),
            created_at_column: "created_at".to_string(),
        }
    }

    pub fn with_id_column(mut self, column: impl Into<String>) -> Self {
        self.id_column = column.into();
        self
    }

    pub fn with_created_at_column(mut self, column: impl Into<String>) -> Self {
        self.created_at_column = column.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    pub fn created_at_column(&self) -> &str {
        &self.created_at_column
    }

    pub(crate) fn quoted_name(&self) -> String {
        Self::quote(&self.name)
    }

    pub(crate) fn quoted_id_column(&self) -> String {
        Self::quote(&self.id_column)
    }

    pub(crate) fn quoted_created_at_column(&self) -> String {
        Self::quote(&self.created_at_column)
    }

    /// Quotes an identifier so that caller-supplied column names are never
    /// spliced into SQL verbatim.
    pub(crate) fn quote(ident: &str) -> String {
        format!("\"{}\"", ident.replace('"', "\"\""))
    }

    /// Rejects writes to the store-assigned columns.
    pub fn check_writable(&self, data: &Fields) -> Result<(), RepositoryError> {
        for column in [&self.id_column, &self.created_at_column] {
            if data.contains_key(column.as_str()) {
                return Err(RepositoryError::ImmutableField(column.clone()));
            }
        }
        Ok(())
    }
}
