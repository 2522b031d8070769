//! Saved audits, CRM access rules, and purchases that unlock the paid guides.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AuditDetail, AuditId, AuditRecord, AuditSubmission, AuditSummaryView, CheckoutEvent,
    CheckoutOutcome, Purchase, Viewer, ViewerRole,
};
pub use repository::{AuditRepository, LedgerError, PurchaseLedger, RepositoryError};
pub use router::{
    audit_router, viewer_from_headers, AuditApi, USER_ID_HEADER, USER_ROLE_HEADER,
    WEBHOOK_SECRET_HEADER,
};
pub use service::{AuditService, AuditServiceError, NOTE_MAX_CHARS};
