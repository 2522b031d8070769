use super::super::advice::Advice;
use super::super::domain::AuditModule;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportFigure {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
}

/// Display-ready rendering of a scored audit, shared by the CLI and the API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditReportView {
    pub module: AuditModule,
    pub module_label: &'static str,
    pub niche_label: &'static str,
    pub headline: String,
    pub verdict_label: &'static str,
    pub figures: Vec<ReportFigure>,
    pub advice: Vec<Advice>,
    pub warnings: Vec<String>,
}
