use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryEventStore, InMemoryProposalRepository, InMemoryRegistrationStore,
    LoggingNotifier, LoggingRosterExporter,
};
use crate::routes::with_cpd_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use cpd_hub::config::AppConfig;
use cpd_hub::directory::{AcademyDirectory, FacilitatorAllowlist};
use cpd_hub::error::AppError;
use cpd_hub::telemetry;
use cpd_hub::workflows::cpd::events::{DashboardState, EventRegistry};
use cpd_hub::workflows::cpd::proposals::ProposalService;
use cpd_hub::workflows::cpd::registrations::RegistrationLedger;
use std::sync::atomic::Ordering;
use std::sync::{Arc, RwLock};
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

    let proposal_repository = Arc::new(InMemoryProposalRepository::default());
    let notifier = Arc::new(LoggingNotifier::default());
    let event_store = Arc::new(InMemoryEventStore::default());
    let registration_store = Arc::new(InMemoryRegistrationStore::default());
    let exporter = Arc::new(LoggingRosterExporter);

    let proposals = Arc::new(ProposalService::new(proposal_repository, notifier));
    let registry = Arc::new(EventRegistry::new(event_store.clone()));
    let ledger = Arc::new(RegistrationLedger::new(
        event_store.clone(),
        registration_store.clone(),
        exporter,
    ));
    let dashboard = Arc::new(DashboardState {
        events: event_store,
        registrations: registration_store,
        directory: AcademyDirectory,
    });
    let allowlist = Arc::new(RwLock::new(FacilitatorAllowlist::default()));

    let app = with_cpd_routes(proposals, registry, ledger, dashboard, allowlist)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "cpd hub ready");

    axum::serve(listener, app).await?;
    Ok(())
}
