//! Report assembly and the outward-facing records built from it.

#[cfg(feature = "export")]
pub mod export;
pub mod report;
pub mod submission;

pub use report::{
    diagnose, evaluate, Diagnosis, DiagnosisInput, DiagnosisReport, Industry, SubmissionMetadata,
};
pub use submission::{submission_row, submit, Cell, MemorySink, SubmissionSink};
