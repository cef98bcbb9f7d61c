use thiserror::Error;

/// Validated student name (trimmed, non-empty).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StudentName(String);

impl StudentName {
    /// Create a validated student name.
    ///
    /// # Errors
    ///
    /// Returns `StudentNameError::Empty` if the name is empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, StudentNameError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(StudentNameError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StudentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StudentNameError {
    #[error("student name cannot be empty")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        let name = StudentName::new("  Ana ").unwrap();
        assert_eq!(name.as_str(), "Ana");
    }

    #[test]
    fn rejects_blank_names() {
        assert_eq!(StudentName::new(" \t"), Err(StudentNameError::Empty));
    }
}
