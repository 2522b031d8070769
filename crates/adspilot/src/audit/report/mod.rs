pub mod format;
mod summary;
pub mod views;

pub use format::format_eur;
pub use summary::verdict_label;
pub use views::{AuditReportView, ReportFigure};
