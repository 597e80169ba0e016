#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Invalid submission id: {0}")]
    InvalidSubmissionId(String),

    #[error("Validation failed: {0}")]
    Validation(String),
}
