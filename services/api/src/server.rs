use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryApplicationRepository, InMemoryCatalogStore};
use crate::routes::with_admission_routes;
use admission::catalog::{seed_from_reader, CatalogService};
use admission::config::AppConfig;
use admission::context::AuditContext;
use admission::error::AppError;
use admission::intake::IntakeService;
use admission::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::fs::File;
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

    let store = Arc::new(InMemoryCatalogStore::default());
    let repository = Arc::new(InMemoryApplicationRepository::default());
    let catalog_service = Arc::new(CatalogService::new(store.clone()));
    let intake_service = Arc::new(IntakeService::new(store, repository, config.paging));

    if let Some(path) = args.seed.take() {
        let file = File::open(&path)?;
        let ctx = AuditContext::at_wall_clock("seed");
        let report = seed_from_reader(file, &catalog_service, &ctx)?;
        info!(
            faculties = report.faculties,
            exam_dates = report.exam_dates,
            seed = %path.display(),
            "catalog seeded"
        );
    }

    let app = with_admission_routes(catalog_service, intake_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "admission service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
