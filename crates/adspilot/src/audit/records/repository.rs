use super::super::advice::OwnedProducts;
use super::domain::{AuditId, AuditRecord, Purchase};

/// Storage abstraction over the hosted database so the service can be exercised in isolation.
pub trait AuditRepository: Send + Sync {
    fn insert(&self, record: AuditRecord) -> Result<AuditRecord, RepositoryError>;
    fn update(&self, record: AuditRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &AuditId) -> Result<Option<AuditRecord>, RepositoryError>;
    /// All records, or only those owned by `owner` when given.
    fn list(&self, owner: Option<&str>) -> Result<Vec<AuditRecord>, RepositoryError>;
    /// Returns `false` when nothing was stored under `id`.
    fn delete(&self, id: &AuditId) -> Result<bool, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Purchases received from the checkout webhook.
pub trait PurchaseLedger: Send + Sync {
    /// Returns `false` when the event id was already recorded.
    fn record(&self, purchase: Purchase) -> Result<bool, LedgerError>;
    fn products_for(&self, user_id: &str) -> Result<OwnedProducts, LedgerError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("purchase ledger unavailable: {0}")]
    Unavailable(String),
}
