use std::sync::Arc;

use storage::registry::StudentRegistry;
use tracing::info;
use tracker_core::model::StudentName;

use crate::error::StudentServiceError;

#[derive(Clone)]
pub struct StudentService {
    registry: Arc<StudentRegistry>,
}

impl StudentService {
    #[must_use]
    pub fn new(registry: Arc<StudentRegistry>) -> Self {
        Self { registry }
    }

    /// Registered students in the order they were added.
    ///
    /// # Errors
    ///
    /// Returns `StudentServiceError::Storage` if the registry cannot be read.
    pub async fn list(&self) -> Result<Vec<String>, StudentServiceError> {
        Ok(self.registry.list().await?)
    }

    /// Register a student and return the updated list.
    ///
    /// # Errors
    ///
    /// Returns `StudentServiceError::Name` for a blank name, or
    /// `StudentServiceError::Storage` if persistence fails.
    pub async fn add(&self, name: &str) -> Result<Vec<String>, StudentServiceError> {
        let name = StudentName::new(name)?;
        let names = self.registry.add(&name).await?;
        info!(student = %name, "added student");
        Ok(names)
    }
}
