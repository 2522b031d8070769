use crate::infra::AppState;
use adspilot::audit::records::{audit_router, AuditRepository, AuditService, PurchaseLedger};
use adspilot::audit::{AuditCsvImporter, AuditModule, BatchReport};
use adspilot::config::AccessConfig;
use adspilot::error::AppError;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct BatchScoreRequest {
    #[serde(alias = "type")]
    pub(crate) module: AuditModule,
    pub(crate) csv: String,
}

pub(crate) fn with_audit_routes<R, L>(
    service: Arc<AuditService<R, L>>,
    access: AccessConfig,
) -> axum::Router
where
    R: AuditRepository + 'static,
    L: PurchaseLedger + 'static,
{
    audit_router(service, access)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/audits/batch",
            axum::routing::post(batch_score_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Scores a pasted CSV export without saving anything.
pub(crate) async fn batch_score_endpoint(
    Json(payload): Json<BatchScoreRequest>,
) -> Result<Json<BatchReport>, AppError> {
    let reader = Cursor::new(payload.csv.into_bytes());
    let report = AuditCsvImporter::from_reader(reader, payload.module)?;
    Ok(Json(report))
}
