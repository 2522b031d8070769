use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::super::benchmark;
use super::super::creative::CreativeScan;
use super::super::domain::{AuditInput, AuditModule};
use super::super::fields::select_applicable_fields;
use super::domain::{AuditId, AuditSubmission, CheckoutEvent, Viewer, ViewerRole};
use super::repository::{AuditRepository, PurchaseLedger, RepositoryError};
use super::service::{AuditService, AuditServiceError};
use crate::config::AccessConfig;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";
pub const WEBHOOK_SECRET_HEADER: &str = "x-webhook-secret";

/// Router state: the service plus the access rules.
pub struct AuditApi<R, L> {
    pub(crate) service: Arc<AuditService<R, L>>,
    pub(crate) access: Arc<AccessConfig>,
}

impl<R, L> Clone for AuditApi<R, L> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            access: Arc::clone(&self.access),
        }
    }
}

impl<R, L> AuditApi<R, L> {
    pub fn new(service: Arc<AuditService<R, L>>, access: AccessConfig) -> Self {
        Self {
            service,
            access: Arc::new(access),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    #[serde(alias = "type")]
    pub module: AuditModule,
    #[serde(default)]
    pub inputs: AuditInput,
}

#[derive(Debug, Deserialize)]
pub struct NoteRequest {
    #[serde(default)]
    pub note: String,
}

/// Router builder exposing scoring, saved audits, and the checkout webhook.
pub fn audit_router<R, L>(service: Arc<AuditService<R, L>>, access: AccessConfig) -> Router
where
    R: AuditRepository + 'static,
    L: PurchaseLedger + 'static,
{
    Router::new()
        .route("/api/v1/benchmarks", get(benchmarks_handler))
        .route("/api/v1/niches/:niche/fields", get(fields_handler))
        .route("/api/v1/creative/score", post(creative_handler))
        .route("/api/v1/audits/score", post(score_handler::<R, L>))
        .route(
            "/api/v1/audits",
            get(list_handler::<R, L>).post(submit_handler::<R, L>),
        )
        .route(
            "/api/v1/audits/:audit_id",
            get(detail_handler::<R, L>).delete(delete_handler::<R, L>),
        )
        .route("/api/v1/audits/:audit_id/note", put(note_handler::<R, L>))
        .route("/api/v1/webhooks/checkout", post(checkout_handler::<R, L>))
        .with_state(AuditApi::new(service, access))
}

/// Identity forwarded by the auth gateway. Users listed in the admin allow-list
/// are promoted whatever the role header says.
pub fn viewer_from_headers(headers: &HeaderMap, access: &AccessConfig) -> Option<Viewer> {
    let user_id = headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())?;

    let role = headers
        .get(USER_ROLE_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(ViewerRole::from_header)
        .unwrap_or(ViewerRole::User);

    let role = if access.is_admin(user_id) {
        ViewerRole::Admin
    } else {
        role
    };

    Some(Viewer {
        user_id: user_id.to_string(),
        role,
    })
}

fn unauthenticated() -> Response {
    let payload = json!({
        "error": "missing x-user-id header",
    });
    (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response()
}

fn error_response(error: AuditServiceError) -> Response {
    let status = match &error {
        AuditServiceError::NotFound(_) | AuditServiceError::Repository(RepositoryError::NotFound) => {
            StatusCode::NOT_FOUND
        }
        AuditServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
        AuditServiceError::InvalidNote { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        AuditServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn benchmarks_handler() -> Response {
    (StatusCode::OK, axum::Json(benchmark::all())).into_response()
}

pub(crate) async fn fields_handler(Path(niche): Path<String>) -> Response {
    let Some(benchmark) = benchmark::find(&niche) else {
        let payload = json!({
            "error": format!("unknown niche '{niche}'"),
        });
        return (StatusCode::NOT_FOUND, axum::Json(payload)).into_response();
    };

    let fields: Vec<_> = select_applicable_fields(benchmark.id)
        .into_iter()
        .map(|field| json!({ "key": field.key(), "label": field.label() }))
        .collect();
    let payload = json!({
        "niche": benchmark.id,
        "category": benchmark.category,
        "fields": fields,
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn creative_handler(axum::Json(scan): axum::Json<CreativeScan>) -> Response {
    (StatusCode::OK, axum::Json(scan.score())).into_response()
}

pub(crate) async fn score_handler<R, L>(
    State(api): State<AuditApi<R, L>>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<ScoreRequest>,
) -> Response
where
    R: AuditRepository + 'static,
    L: PurchaseLedger + 'static,
{
    let viewer = viewer_from_headers(&headers, &api.access);
    match api
        .service
        .score(viewer.as_ref(), request.module, &request.inputs)
    {
        Ok(outcome) => {
            let report = outcome.report();
            let payload = json!({
                "outcome": outcome,
                "report": report,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_handler<R, L>(
    State(api): State<AuditApi<R, L>>,
    headers: HeaderMap,
    axum::Json(submission): axum::Json<AuditSubmission>,
) -> Response
where
    R: AuditRepository + 'static,
    L: PurchaseLedger + 'static,
{
    let Some(viewer) = viewer_from_headers(&headers, &api.access) else {
        return unauthenticated();
    };

    match api.service.submit(&viewer, submission) {
        Ok(detail) => (StatusCode::CREATED, axum::Json(detail)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<R, L>(
    State(api): State<AuditApi<R, L>>,
    headers: HeaderMap,
) -> Response
where
    R: AuditRepository + 'static,
    L: PurchaseLedger + 'static,
{
    let Some(viewer) = viewer_from_headers(&headers, &api.access) else {
        return unauthenticated();
    };

    match api.service.list(&viewer) {
        Ok(audits) => (StatusCode::OK, axum::Json(audits)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn detail_handler<R, L>(
    State(api): State<AuditApi<R, L>>,
    headers: HeaderMap,
    Path(audit_id): Path<String>,
) -> Response
where
    R: AuditRepository + 'static,
    L: PurchaseLedger + 'static,
{
    let Some(viewer) = viewer_from_headers(&headers, &api.access) else {
        return unauthenticated();
    };

    match api.service.get(&viewer, &AuditId(audit_id)) {
        Ok(detail) => (StatusCode::OK, axum::Json(detail)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn note_handler<R, L>(
    State(api): State<AuditApi<R, L>>,
    headers: HeaderMap,
    Path(audit_id): Path<String>,
    axum::Json(request): axum::Json<NoteRequest>,
) -> Response
where
    R: AuditRepository + 'static,
    L: PurchaseLedger + 'static,
{
    let Some(viewer) = viewer_from_headers(&headers, &api.access) else {
        return unauthenticated();
    };

    match api
        .service
        .annotate(&viewer, &AuditId(audit_id), &request.note)
    {
        Ok(record) => (StatusCode::OK, axum::Json(record.summary_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_handler<R, L>(
    State(api): State<AuditApi<R, L>>,
    headers: HeaderMap,
    Path(audit_id): Path<String>,
) -> Response
where
    R: AuditRepository + 'static,
    L: PurchaseLedger + 'static,
{
    let Some(viewer) = viewer_from_headers(&headers, &api.access) else {
        return unauthenticated();
    };

    match api.service.delete(&viewer, &AuditId(audit_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn checkout_handler<R, L>(
    State(api): State<AuditApi<R, L>>,
    headers: HeaderMap,
    axum::Json(event): axum::Json<CheckoutEvent>,
) -> Response
where
    R: AuditRepository + 'static,
    L: PurchaseLedger + 'static,
{
    let provided = headers
        .get(WEBHOOK_SECRET_HEADER)
        .and_then(|value| value.to_str().ok());
    if !api.access.accepts_checkout_secret(provided) {
        let payload = json!({
            "error": "invalid webhook secret",
        });
        return (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response();
    }

    match api.service.ingest_checkout(event) {
        Ok(outcome) => (StatusCode::ACCEPTED, axum::Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}
