use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LockError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid target: {0}")]
    InvalidTarget(String),
    #[error("{function}: \"{method}\" must be a guarded method registered on the owner")]
    NotGuarded { function: String, method: String },
    #[error("Detached guard: \"{0}\" is no longer alive")]
    Detached(String),
}

impl LockError {
    pub fn not_guarded(function: &str, method: &str) -> Self {
        LockError::NotGuarded {
            function: function.to_string(),
            method: method.to_string(),
        }
    }
}

impl From<serde_json::Error> for LockError {
    fn from(error: serde_json::Error) -> Self {
        LockError::Configuration(error.to_string())
    }
}

impl Serialize for LockError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}

pub type LockResult<T> = Result<T, LockError>;

#[cfg(test)]
#[path = "tests/errors_tests.rs"]
mod tests;
