use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use fin_diagnosis_core::diagnosis::submission::submission_columns;
use fin_diagnosis_core::diagnosis::{Cell, SubmissionSink};
use fin_diagnosis_core::DiagnosisResult;

/// Append-only CSV file standing in for the shared submission store.
/// The header row is written when the file is new or empty.
pub struct CsvFileSink {
    path: PathBuf,
}

impl CsvFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SubmissionSink for CsvFileSink {
    fn append_row(&self, row: &[Cell]) -> DiagnosisResult<()> {
        let is_new = fs::metadata(&self.path).map_or(true, |m| m.len() == 0);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut wtr = csv::Writer::from_writer(file);
        if is_new {
            wtr.write_record(submission_columns())?;
        }
        wtr.write_record(row.iter().map(|c| c.to_string()))?;
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fin_diagnosis_core::diagnosis::{evaluate, submission_row, submit, DiagnosisInput};
    use fin_diagnosis_core::diagnosis::submission::now_jst;

    #[test]
    fn test_header_written_once() {
        let path = std::env::temp_dir().join(format!("findiag-log-{}.csv", std::process::id()));
        let _ = fs::remove_file(&path);

        let input = DiagnosisInput::sample();
        let report = evaluate(&input.statements());
        let row = submission_row(&input.metadata, now_jst(), &report);
        let sink = CsvFileSink::new(&path);
        assert!(submit(&sink, &row));
        assert!(submit(&sink, &row));

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("timestamp,company_name,region,industry,overall_score"));
        assert!(lines[1].contains("Sample Trading Co."));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_unwritable_path_reports_failure() {
        let sink = CsvFileSink::new(std::env::temp_dir());
        let input = DiagnosisInput::sample();
        let report = evaluate(&input.statements());
        let row = submission_row(&input.metadata, now_jst(), &report);
        assert!(!submit(&sink, &row));
    }
}
