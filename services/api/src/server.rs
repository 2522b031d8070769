use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryAuditRepository, InMemoryPurchaseLedger};
use crate::routes::with_audit_routes;
use adspilot::audit::records::AuditService;
use adspilot::config::AppConfig;
use adspilot::error::AppError;
use adspilot::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let audit_service = Arc::new(AuditService::new(
        Arc::new(InMemoryAuditRepository::default()),
        Arc::new(InMemoryPurchaseLedger::default()),
    ));
    let admin_count = config.access.admin_users.len();

    let app = with_audit_routes(audit_service, config.access.clone())
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, admin_count, "audit engine ready");

    axum::serve(listener, app).await?;
    Ok(())
}
