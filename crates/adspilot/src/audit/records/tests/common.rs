use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::audit::advice::OwnedProducts;
use crate::audit::domain::{AuditInput, AuditModule};
use crate::audit::records::domain::{AuditId, AuditRecord, AuditSubmission, Purchase};
use crate::audit::records::repository::{
    AuditRepository, LedgerError, PurchaseLedger, RepositoryError,
};
use crate::audit::records::{audit_router, AuditService};
use crate::config::AccessConfig;

pub(super) fn fashion_input() -> AuditInput {
    AuditInput {
        pmv: "75".to_string(),
        ltv: "120".to_string(),
        margin: "60".to_string(),
        target_roas: "3".to_string(),
        target_volume: "80".to_string(),
        current_cpa: "35".to_string(),
        current_budget: "5000".to_string(),
        emq_score: "6".to_string(),
        niche: "ecom_fashion".to_string(),
        ..AuditInput::default()
    }
}

pub(super) fn submission(name: &str) -> AuditSubmission {
    AuditSubmission {
        name: name.to_string(),
        module: AuditModule::Andromeda,
        inputs: fashion_input(),
    }
}

pub(super) fn build_service() -> (
    AuditService<MemoryRepository, MemoryLedger>,
    Arc<MemoryRepository>,
    Arc<MemoryLedger>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let ledger = Arc::new(MemoryLedger::default());
    let service = AuditService::new(repository.clone(), ledger.clone());
    (service, repository, ledger)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<AuditId, AuditRecord>>>,
}

impl AuditRepository for MemoryRepository {
    fn insert(&self, record: AuditRecord) -> Result<AuditRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: AuditRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &AuditId) -> Result<Option<AuditRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self, owner: Option<&str>) -> Result<Vec<AuditRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| owner.map_or(true, |owner| record.user_id == owner))
            .cloned()
            .collect())
    }

    fn delete(&self, id: &AuditId) -> Result<bool, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.remove(id).is_some())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryLedger {
    purchases: Arc<Mutex<BTreeMap<String, Purchase>>>,
}

impl MemoryLedger {
    pub(super) fn purchases(&self) -> Vec<Purchase> {
        self.purchases
            .lock()
            .expect("ledger mutex poisoned")
            .values()
            .cloned()
            .collect()
    }
}

impl PurchaseLedger for MemoryLedger {
    fn record(&self, purchase: Purchase) -> Result<bool, LedgerError> {
        let mut guard = self.purchases.lock().expect("ledger mutex poisoned");
        if guard.contains_key(&purchase.event_id) {
            return Ok(false);
        }
        guard.insert(purchase.event_id.clone(), purchase);
        Ok(true)
    }

    fn products_for(&self, user_id: &str) -> Result<OwnedProducts, LedgerError> {
        let guard = self.purchases.lock().expect("ledger mutex poisoned");
        Ok(guard
            .values()
            .filter(|purchase| purchase.user_id == user_id)
            .map(|purchase| purchase.product)
            .collect())
    }
}

pub(super) struct UnavailableRepository;

impl AuditRepository for UnavailableRepository {
    fn insert(&self, _record: AuditRecord) -> Result<AuditRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: AuditRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &AuditId) -> Result<Option<AuditRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self, _owner: Option<&str>) -> Result<Vec<AuditRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &AuditId) -> Result<bool, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) struct UnavailableLedger;

impl PurchaseLedger for UnavailableLedger {
    fn record(&self, _purchase: Purchase) -> Result<bool, LedgerError> {
        Err(LedgerError::Unavailable("ledger offline".to_string()))
    }

    fn products_for(&self, _user_id: &str) -> Result<OwnedProducts, LedgerError> {
        Err(LedgerError::Unavailable("ledger offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn admin_access(user_ids: &[&str]) -> AccessConfig {
    AccessConfig {
        admin_users: user_ids.iter().map(|id| id.to_string()).collect(),
        checkout_secret: None,
    }
}

pub(super) fn audit_router_with_service(
    service: AuditService<MemoryRepository, MemoryLedger>,
    access: AccessConfig,
) -> axum::Router {
    audit_router(Arc::new(service), access)
}
