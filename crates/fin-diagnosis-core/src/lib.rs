pub mod arithmetic;
pub mod diagnosis;
pub mod error;
pub mod kpi;
pub mod statements;
pub mod types;

pub use error::DiagnosisError;
pub use types::*;

/// Standard result type for all fallible diagnosis operations
pub type DiagnosisResult<T> = Result<T, DiagnosisError>;
