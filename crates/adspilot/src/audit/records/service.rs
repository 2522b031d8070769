use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use super::super::advice::{self, OwnedProducts, ProductId};
use super::super::domain::{AuditInput, AuditModule};
use super::super::report::verdict_label;
use super::super::scoring::{ScoringEngine, ScoringOutcome};
use super::domain::{
    AuditDetail, AuditId, AuditRecord, AuditSubmission, AuditSummaryView, CheckoutEvent,
    CheckoutOutcome, Purchase, Viewer,
};
use super::repository::{AuditRepository, LedgerError, PurchaseLedger, RepositoryError};

pub const NOTE_MAX_CHARS: usize = 2000;

/// Checkout event types that confirm a paid order.
const COMPLETED_EVENTS: [&str; 2] = ["order.completed", "checkout.completed"];

/// Service composing the scoring engine, the audit store, and the purchase ledger.
pub struct AuditService<R, L> {
    engine: ScoringEngine,
    repository: Arc<R>,
    ledger: Arc<L>,
}

static AUDIT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_audit_id() -> (AuditId, String) {
    let id = AUDIT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    (AuditId(format!("audit-{id:06}")), format!("AP-{id:05}"))
}

impl<R, L> AuditService<R, L>
where
    R: AuditRepository + 'static,
    L: PurchaseLedger + 'static,
{
    pub fn new(repository: Arc<R>, ledger: Arc<L>) -> Self {
        Self {
            engine: ScoringEngine::new(),
            repository,
            ledger,
        }
    }

    /// Products bought by the viewer. Anonymous callers own nothing.
    pub fn owned_products(
        &self,
        viewer: Option<&Viewer>,
    ) -> Result<OwnedProducts, AuditServiceError> {
        match viewer {
            Some(viewer) => Ok(self.ledger.products_for(&viewer.user_id)?),
            None => Ok(OwnedProducts::new()),
        }
    }

    /// Score without persisting, with advice personalised for the viewer.
    pub fn score(
        &self,
        viewer: Option<&Viewer>,
        module: AuditModule,
        input: &AuditInput,
    ) -> Result<ScoringOutcome, AuditServiceError> {
        let owned = self.owned_products(viewer)?;
        Ok(self.engine.score(module, input, &owned))
    }

    /// Score and store a new audit owned by the viewer.
    pub fn submit(
        &self,
        viewer: &Viewer,
        submission: AuditSubmission,
    ) -> Result<AuditDetail, AuditServiceError> {
        let owned = self.owned_products(Some(viewer))?;
        let outcome = self
            .engine
            .score(submission.module, &submission.inputs, &owned);
        let (id, audit_id) = next_audit_id();

        let name = match submission.name.trim() {
            "" => format!("Audit {} {}", submission.module.name(), audit_id),
            name => name.to_string(),
        };

        let record = AuditRecord {
            id,
            audit_id,
            user_id: viewer.user_id.clone(),
            name,
            module: submission.module,
            created_at: Utc::now(),
            inputs: submission.inputs,
            verdict_label: verdict_label(&outcome.result).to_string(),
            results: outcome.result,
            note: None,
        };

        let stored = self.repository.insert(record)?;
        info!(
            audit_id = %stored.audit_id,
            user_id = %stored.user_id,
            module = stored.module.key(),
            "audit saved"
        );

        Ok(AuditDetail {
            record: stored,
            advice: outcome.advice,
        })
    }

    /// Fetch a saved audit with advice recomputed for whoever reads it.
    pub fn get(&self, viewer: &Viewer, id: &AuditId) -> Result<AuditDetail, AuditServiceError> {
        let record = self.fetch_authorized(viewer, id)?;
        let owned = self.owned_products(Some(viewer))?;
        let metrics = record.inputs.metrics();
        let advice = advice::advise_all(&metrics, &record.results, &owned);
        Ok(AuditDetail { record, advice })
    }

    /// Admins see every audit; users see their own. Newest first.
    pub fn list(&self, viewer: &Viewer) -> Result<Vec<AuditSummaryView>, AuditServiceError> {
        let owner = if viewer.is_admin() {
            None
        } else {
            Some(viewer.user_id.as_str())
        };

        let mut records = self.repository.list(owner)?;
        records.sort_by(|left, right| {
            right
                .created_at
                .cmp(&left.created_at)
                .then_with(|| right.id.cmp(&left.id))
        });
        Ok(records.iter().map(AuditRecord::summary_view).collect())
    }

    /// Attach or replace the CRM note. An empty note clears it.
    pub fn annotate(
        &self,
        viewer: &Viewer,
        id: &AuditId,
        note: &str,
    ) -> Result<AuditRecord, AuditServiceError> {
        let note = note.trim();
        let length = note.chars().count();
        if length > NOTE_MAX_CHARS {
            return Err(AuditServiceError::InvalidNote { length });
        }

        let mut record = self.fetch_authorized(viewer, id)?;
        record.note = if note.is_empty() {
            None
        } else {
            Some(note.to_string())
        };
        self.repository.update(record.clone())?;
        info!(
            audit_id = %record.audit_id,
            annotated_by = %viewer.user_id,
            cleared = record.note.is_none(),
            "audit note updated"
        );
        Ok(record)
    }

    pub fn delete(&self, viewer: &Viewer, id: &AuditId) -> Result<(), AuditServiceError> {
        let record = self.fetch_authorized(viewer, id)?;
        if !self.repository.delete(id)? {
            return Err(AuditServiceError::NotFound(id.clone()));
        }
        info!(
            audit_id = %record.audit_id,
            deleted_by = %viewer.user_id,
            "audit deleted"
        );
        Ok(())
    }

    /// Record a completed order for one of the guides. Replays are acknowledged
    /// without a second ledger entry.
    pub fn ingest_checkout(
        &self,
        event: CheckoutEvent,
    ) -> Result<CheckoutOutcome, AuditServiceError> {
        if !COMPLETED_EVENTS.contains(&event.event_type.trim()) {
            debug!(event_id = %event.event_id, event_type = %event.event_type, "checkout event ignored");
            return Ok(CheckoutOutcome::Ignored {
                reason: format!("event type '{}' not handled", event.event_type),
            });
        }

        let Some(product) = ProductId::parse(&event.product_name) else {
            debug!(event_id = %event.event_id, product = %event.product_name, "unknown product");
            return Ok(CheckoutOutcome::Ignored {
                reason: format!("unknown product '{}'", event.product_name),
            });
        };

        if event.event_id.trim().is_empty() {
            return Ok(CheckoutOutcome::Ignored {
                reason: "missing event id".to_string(),
            });
        }

        if event.user_id.trim().is_empty() {
            return Ok(CheckoutOutcome::Ignored {
                reason: "missing user id".to_string(),
            });
        }

        let purchase = Purchase {
            event_id: event.event_id.trim().to_string(),
            user_id: event.user_id.trim().to_string(),
            product,
            purchased_at: Utc::now(),
        };

        let event_id = purchase.event_id.clone();
        let user_id = purchase.user_id.clone();
        if self.ledger.record(purchase)? {
            info!(%event_id, %user_id, product = product.as_str(), "purchase recorded");
            Ok(CheckoutOutcome::Recorded { product })
        } else {
            info!(%event_id, "duplicate checkout event");
            Ok(CheckoutOutcome::Duplicate)
        }
    }

    fn fetch_authorized(
        &self,
        viewer: &Viewer,
        id: &AuditId,
    ) -> Result<AuditRecord, AuditServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or_else(|| AuditServiceError::NotFound(id.clone()))?;

        if !viewer.can_access(&record) {
            return Err(AuditServiceError::Forbidden(id.clone()));
        }
        Ok(record)
    }
}

/// Error raised by the audit service.
#[derive(Debug, thiserror::Error)]
pub enum AuditServiceError {
    #[error("audit {0} not found")]
    NotFound(AuditId),
    #[error("audit {0} belongs to another user")]
    Forbidden(AuditId),
    #[error("note is {length} characters, the limit is {max}", max = NOTE_MAX_CHARS)]
    InvalidNote { length: usize },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
