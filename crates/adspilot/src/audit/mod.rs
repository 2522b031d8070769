//! Meta Ads audit scoring: form parsing, niche benchmarks, per-module results,
//! tiered advice, saved audits, and batch import.

pub mod advice;
pub mod benchmark;
pub mod creative;
pub mod domain;
pub mod fields;
pub mod import;
pub mod records;
pub mod report;
pub mod scoring;

pub use advice::{
    advise_all, classify, Advice, AdviceAxis, AdviceStatus, OwnedProducts, ProductId, Tier,
};
pub use benchmark::NicheBenchmark;
pub use creative::{CreativeChecklist, CreativeScan, CreativeScore};
pub use domain::{
    AuditInput, AuditMetrics, AuditModule, FieldWarning, NicheCategory, OptionalField,
};
pub use fields::select_applicable_fields;
pub use import::{AuditCsvImporter, AuditImportError, BatchReport, BatchRow};
pub use report::{format_eur, verdict_label, AuditReportView, ReportFigure};
pub use scoring::{compute_results, AuditResult, ScoringEngine, ScoringNotice, ScoringOutcome};
