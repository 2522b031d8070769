use adspilot::audit::records::{
    AuditId, AuditRecord, AuditRepository, LedgerError, Purchase, PurchaseLedger,
    RepositoryError,
};
use adspilot::audit::{AuditInput, AuditModule, OwnedProducts, ProductId};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

fn poisoned() -> RepositoryError {
    RepositoryError::Unavailable("repository lock poisoned".to_string())
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAuditRepository {
    records: Arc<Mutex<HashMap<AuditId, AuditRecord>>>,
}

impl AuditRepository for InMemoryAuditRepository {
    fn insert(&self, record: AuditRecord) -> Result<AuditRecord, RepositoryError> {
        let mut guard = self.records.lock().map_err(|_| poisoned())?;
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: AuditRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().map_err(|_| poisoned())?;
        if guard.contains_key(&record.id) {
            guard.insert(record.id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &AuditId) -> Result<Option<AuditRecord>, RepositoryError> {
        let guard = self.records.lock().map_err(|_| poisoned())?;
        Ok(guard.get(id).cloned())
    }

    fn list(&self, owner: Option<&str>) -> Result<Vec<AuditRecord>, RepositoryError> {
        let guard = self.records.lock().map_err(|_| poisoned())?;
        Ok(guard
            .values()
            .filter(|record| owner.map_or(true, |owner| record.user_id == owner))
            .cloned()
            .collect())
    }

    fn delete(&self, id: &AuditId) -> Result<bool, RepositoryError> {
        let mut guard = self.records.lock().map_err(|_| poisoned())?;
        Ok(guard.remove(id).is_some())
    }
}

/// Purchases keyed by checkout event id so webhook replays are no-ops.
#[derive(Default, Clone)]
pub(crate) struct InMemoryPurchaseLedger {
    purchases: Arc<Mutex<BTreeMap<String, Purchase>>>,
}

impl PurchaseLedger for InMemoryPurchaseLedger {
    fn record(&self, purchase: Purchase) -> Result<bool, LedgerError> {
        let mut guard = self
            .purchases
            .lock()
            .map_err(|_| LedgerError::Unavailable("ledger lock poisoned".to_string()))?;
        if guard.contains_key(&purchase.event_id) {
            return Ok(false);
        }
        guard.insert(purchase.event_id.clone(), purchase);
        Ok(true)
    }

    fn products_for(&self, user_id: &str) -> Result<OwnedProducts, LedgerError> {
        let guard = self
            .purchases
            .lock()
            .map_err(|_| LedgerError::Unavailable("ledger lock poisoned".to_string()))?;
        Ok(guard
            .values()
            .filter(|purchase| purchase.user_id == user_id)
            .map(|purchase| purchase.product)
            .collect())
    }
}

pub(crate) fn parse_module(raw: &str) -> Result<AuditModule, String> {
    AuditModule::parse(raw).ok_or_else(|| {
        let known: Vec<&str> = AuditModule::ordered()
            .into_iter()
            .map(AuditModule::key)
            .collect();
        format!("unknown module '{raw}' (expected one of {})", known.join(", "))
    })
}

pub(crate) fn parse_product(raw: &str) -> Result<ProductId, String> {
    ProductId::parse(raw).ok_or_else(|| {
        let known: Vec<&str> = ProductId::ordered()
            .into_iter()
            .map(ProductId::as_str)
            .collect();
        format!("unknown product '{raw}' (expected one of {})", known.join(", "))
    })
}

/// Reads a form payload saved as JSON (the same shape the web form posts).
pub(crate) fn load_input(path: &Path) -> Result<AuditInput, std::io::Error> {
    let file = std::fs::File::open(path)?;
    let input = serde_json::from_reader(std::io::BufReader::new(file))?;
    Ok(input)
}
