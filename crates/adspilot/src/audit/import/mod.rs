//! Batch scoring of audits exported as CSV (one form per row).

mod parser;

use super::advice::OwnedProducts;
use super::domain::AuditModule;
use super::report::verdict_label;
use super::scoring::{ScoringEngine, ScoringOutcome};
use serde::Serialize;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum AuditImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for AuditImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditImportError::Io(err) => write!(f, "failed to read audit export: {}", err),
            AuditImportError::Csv(err) => write!(f, "invalid audit CSV data: {}", err),
        }
    }
}

impl std::error::Error for AuditImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuditImportError::Io(err) => Some(err),
            AuditImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for AuditImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for AuditImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchRow {
    pub line: u64,
    pub name: String,
    pub verdict_label: &'static str,
    pub outcome: ScoringOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub module: AuditModule,
    pub rows: Vec<BatchRow>,
    pub ignored_columns: Vec<String>,
}

impl BatchReport {
    /// Rows that produced at least one parse warning.
    pub fn rows_with_warnings(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| !row.outcome.warnings.is_empty())
            .count()
    }
}

pub struct AuditCsvImporter;

impl AuditCsvImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        module: AuditModule,
    ) -> Result<BatchReport, AuditImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, module)
    }

    /// Scores every row with the given module. Bad numbers never reject a row;
    /// they surface as warnings on that row's outcome.
    pub fn from_reader<R: Read>(
        reader: R,
        module: AuditModule,
    ) -> Result<BatchReport, AuditImportError> {
        let engine = ScoringEngine::new();
        let owned = OwnedProducts::new();
        let parsed = parser::parse_rows(reader)?;

        let rows = parsed
            .rows
            .into_iter()
            .map(|row| {
                let outcome = engine.score(module, &row.input, &owned);
                BatchRow {
                    line: row.line,
                    name: row
                        .name
                        .unwrap_or_else(|| format!("ligne {}", row.line)),
                    verdict_label: verdict_label(&outcome.result),
                    outcome,
                }
            })
            .collect();

        Ok(BatchReport {
            module,
            rows,
            ignored_columns: parsed.ignored_columns,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::scoring::AuditResult;
    use std::io::Cursor;

    #[test]
    fn scores_each_row_with_the_requested_module() {
        let csv = "name,pmv,ltv,margin,target_volume,current_cpa,current_budget,emq_score,niche\n\
Boutique,75,120,60,50,90,5000,9,ecom_fashion\n\
Coaching,500,900,0.8,10,120,2000,4,coaching\n";

        let report = AuditCsvImporter::from_reader(Cursor::new(csv), AuditModule::Andromeda)
            .expect("import succeeds");

        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].name, "Boutique");
        assert_eq!(report.rows[0].verdict_label, "CPA hors de contrôle");
        assert_eq!(report.rows[1].outcome.benchmark.id, "coaching");
        assert!(matches!(
            report.rows[1].outcome.result,
            AuditResult::Andromeda(_)
        ));
        assert_eq!(report.rows_with_warnings(), 0);
    }

    #[test]
    fn bad_numbers_are_kept_as_row_warnings() {
        let csv = "pmv,current_cpa\nabc,20\n";
        let report = AuditCsvImporter::from_reader(Cursor::new(csv), AuditModule::Oracle)
            .expect("import succeeds");

        assert_eq!(report.rows[0].name, "ligne 2");
        assert_eq!(report.rows_with_warnings(), 1);
        assert_eq!(report.rows[0].outcome.warnings[0].field, "pmv");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let error = AuditCsvImporter::from_path("/nonexistent/audits.csv", AuditModule::Atlas)
            .expect_err("file is missing");
        assert!(matches!(error, AuditImportError::Io(_)));
    }
}
