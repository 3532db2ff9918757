use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use cpd_hub::directory::{allowlist_router, FacilitatorAllowlist};
use cpd_hub::workflows::cpd::events::{
    dashboard_router, event_router, DashboardState, EventRegistry, EventStore,
};
use cpd_hub::workflows::cpd::proposals::{
    proposal_router, Notifier, ProposalRepository, ProposalService,
};
use cpd_hub::workflows::cpd::registrations::{
    registration_router, RegistrationLedger, RegistrationStore, RosterExporter,
};
use serde_json::json;
use std::sync::{Arc, RwLock};

/// Compose the workflow routers with the operational endpoints.
pub(crate) fn with_cpd_routes<R, N, E, S, X>(
    proposals: Arc<ProposalService<R, N>>,
    registry: Arc<EventRegistry<E>>,
    ledger: Arc<RegistrationLedger<E, S, X>>,
    dashboard: Arc<DashboardState<E, S>>,
    allowlist: Arc<RwLock<FacilitatorAllowlist>>,
) -> axum::Router
where
    R: ProposalRepository + 'static,
    N: Notifier + 'static,
    E: EventStore + 'static,
    S: RegistrationStore + 'static,
    X: RosterExporter + 'static,
{
    proposal_router(proposals)
        .merge(event_router(registry))
        .merge(registration_router(ledger))
        .merge(dashboard_router(dashboard))
        .merge(allowlist_router(allowlist))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
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
