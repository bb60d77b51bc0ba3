use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiagnosisError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Submission failed: {0}")]
    SubmissionFailed(String),

    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<serde_json::Error> for DiagnosisError {
    fn from(e: serde_json::Error) -> Self {
        DiagnosisError::SerializationError(e.to_string())
    }
}

#[cfg(feature = "export")]
impl From<csv::Error> for DiagnosisError {
    fn from(e: csv::Error) -> Self {
        DiagnosisError::SerializationError(e.to_string())
    }
}

impl From<std::io::Error> for DiagnosisError {
    fn from(e: std::io::Error) -> Self {
        DiagnosisError::IoError(e.to_string())
    }
}
