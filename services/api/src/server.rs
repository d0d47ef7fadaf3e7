use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemorySessionStore, RecordingSubmissionGateway};
use crate::routes::with_intake_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use taxmate_intake::config::AppConfig;
use taxmate_intake::error::AppError;
use taxmate_intake::intake::IntakeWizardService;
use taxmate_intake::telemetry;
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

    let store = Arc::new(InMemorySessionStore::default());
    let gateway = Arc::new(RecordingSubmissionGateway::default());
    let wizard_service = Arc::new(IntakeWizardService::new(store, gateway));

    let app = with_intake_routes(wizard_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "taxmate intake service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
