use thiserror::Error;

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Action not permitted for this role: {0}")]
    RoleForbidden(String),

    #[error("Not the owning teacher: {0}")]
    NotOwner(String),

    #[error("Not enrolled in this class: {0}")]
    NotEnrolled(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type BoardResult<T> = Result<T, BoardError>;
