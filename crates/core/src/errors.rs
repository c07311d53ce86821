use thiserror::Error;

#[derive(Error, Debug)]
pub enum CareError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Storage error: {0}")]
    Storage(#[from] eyre::Report),

    #[error("Internal error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl CareError {
    /// Errors caused by the user's input rather than the environment.
    ///
    /// These are raised before any request leaves the device.
    pub fn is_user_error(&self) -> bool {
        matches!(self, CareError::Validation(_) | CareError::NotFound(_) | CareError::Conflict(_))
    }
}

pub type CareResult<T> = Result<T, CareError>;
