//! Saved audits and guide purchases through the public service facade and HTTP router.

mod common {
    use std::collections::{BTreeMap, HashMap};
    use std::sync::{Arc, Mutex};

    use adspilot::audit::records::{
        AuditId, AuditRecord, AuditRepository, AuditService, AuditSubmission, LedgerError,
        Purchase, PurchaseLedger, RepositoryError,
    };
    use adspilot::audit::{AuditInput, AuditModule, OwnedProducts};

    #[derive(Default)]
    pub(super) struct Repository {
        records: Mutex<HashMap<AuditId, AuditRecord>>,
    }

    impl AuditRepository for Repository {
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

    #[derive(Default)]
    pub(super) struct Ledger {
        purchases: Mutex<BTreeMap<String, Purchase>>,
    }

    impl PurchaseLedger for Ledger {
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

    pub(super) fn service() -> Arc<AuditService<Repository, Ledger>> {
        Arc::new(AuditService::new(
            Arc::new(Repository::default()),
            Arc::new(Ledger::default()),
        ))
    }

    pub(super) fn atlas_submission() -> AuditSubmission {
        let mut inputs = AuditInput::default();
        for (name, value) in [
            ("pmv", "49"),
            ("ltv", "160"),
            ("margin", "70"),
            ("targetRoas", "2"),
            ("currentCpa", "18"),
            ("currentBudget", "3000"),
            ("emqScore", "8.5"),
            ("niche", "ecom_beauty"),
        ] {
            inputs.set(name, value);
        }
        AuditSubmission {
            name: "Sérum vitamine C".to_string(),
            module: AuditModule::Atlas,
            inputs,
        }
    }
}

use adspilot::audit::records::{
    audit_router, AuditServiceError, CheckoutEvent, CheckoutOutcome, Viewer, USER_ID_HEADER,
    USER_ROLE_HEADER,
};
use adspilot::audit::{AdviceAxis, AdviceStatus, AuditResult, ProductId};
use adspilot::config::AccessConfig;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::*;
use tower::ServiceExt;

#[test]
fn scaling_guide_purchase_changes_saved_audit_advice() {
    let service = service();
    let client = Viewer::user("client-1");

    let saved = service
        .submit(&client, atlas_submission())
        .expect("submit succeeds");
    assert!(matches!(saved.record.results, AuditResult::Atlas(_)));
    assert_eq!(saved.record.verdict_label, "Prêt à scaler");
    let scaling = &saved.advice[2];
    assert_eq!(scaling.axis, AdviceAxis::Scaling);
    assert_eq!(scaling.status, AdviceStatus::Green);

    let outcome = service
        .ingest_checkout(CheckoutEvent {
            event_id: "ord_1001".to_string(),
            event_type: "order.completed".to_string(),
            user_id: "client-1".to_string(),
            product_name: "scale & sniper".to_string(),
        })
        .expect("ingest");
    assert_eq!(
        outcome,
        CheckoutOutcome::Recorded {
            product: ProductId::ScaleSniper
        }
    );

    let reread = service
        .get(&client, &saved.record.id)
        .expect("owner reads audit");
    assert_eq!(reread.record, saved.record);
    assert_eq!(reread.advice[2].status, AdviceStatus::Mastered);

    let admin_view = service
        .get(&Viewer::admin("coach"), &saved.record.id)
        .expect("admin reads audit");
    assert_eq!(admin_view.advice[2].status, AdviceStatus::Green);
}

#[test]
fn other_clients_cannot_touch_an_audit() {
    let service = service();
    let saved = service
        .submit(&Viewer::user("client-1"), atlas_submission())
        .expect("submit succeeds");
    let stranger = Viewer::user("client-2");

    assert!(matches!(
        service.annotate(&stranger, &saved.record.id, "hello"),
        Err(AuditServiceError::Forbidden(_))
    ));
    assert!(matches!(
        service.delete(&stranger, &saved.record.id),
        Err(AuditServiceError::Forbidden(_))
    ));
    assert!(service.list(&stranger).expect("list").is_empty());
}

#[tokio::test]
async fn admin_allow_list_grants_crm_access_over_http() {
    let service = service();
    let saved = service
        .submit(&Viewer::user("client-1"), atlas_submission())
        .expect("submit succeeds");

    let mut access = AccessConfig::default();
    access.admin_users.insert("ops@adspilot.fr".to_string());
    let router = audit_router(service, access);

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/audits")
                .header(USER_ID_HEADER, "ops@adspilot.fr")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    let listed: serde_json::Value = serde_json::from_slice(&body).expect("json payload");
    assert_eq!(listed[0]["audit_id"], saved.record.audit_id.as_str());
    assert_eq!(listed[0]["verdict_label"], "Prêt à scaler");

    let response = router
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/audits/{}", saved.record.id))
                .header(USER_ID_HEADER, "client-2")
                .header(USER_ROLE_HEADER, "user")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
