use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;

use super::super::events::domain::EventId;
use super::super::events::registry::EventStore;
use super::domain::{RegistrationIntent, RegistrationRequest};
use super::ledger::{
    RegistrationLedger, RegistrationLedgerError, RegistrationStore, RosterExporter,
};

/// Router builder exposing the participant-facing registration endpoints.
pub fn registration_router<E, S, X>(ledger: Arc<RegistrationLedger<E, S, X>>) -> Router
where
    E: EventStore + 'static,
    S: RegistrationStore + 'static,
    X: RosterExporter + 'static,
{
    Router::new()
        .route(
            "/api/v1/cpd/events/:event_id/registrations",
            post(register_handler::<E, S, X>).get(roster_handler::<E, S, X>),
        )
        .route(
            "/api/v1/cpd/events/:event_id/occupancy",
            get(occupancy_handler::<E, S, X>),
        )
        .with_state(ledger)
}

/// Sign-up body; the event comes from the path.
#[derive(Debug, Deserialize)]
pub(crate) struct SignUpRequest {
    pub full_name: String,
    pub email: String,
    pub academy: String,
    pub role: super::super::domain::RoleCategory,
    #[serde(default)]
    pub accessibility_needs: Option<String>,
    #[serde(default)]
    pub dietary_requirements: Option<String>,
    #[serde(default)]
    pub intent: RegistrationIntent,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OccupancyParams {
    /// Reference date override, mainly for reviewing past terms.
    #[serde(default)]
    today: Option<NaiveDate>,
}

pub(crate) async fn register_handler<E, S, X>(
    State(ledger): State<Arc<RegistrationLedger<E, S, X>>>,
    Path(event_id): Path<String>,
    axum::Json(body): axum::Json<SignUpRequest>,
) -> Response
where
    E: EventStore + 'static,
    S: RegistrationStore + 'static,
    X: RosterExporter + 'static,
{
    let request = RegistrationRequest {
        event_id: EventId(event_id),
        full_name: body.full_name,
        email: body.email,
        academy: body.academy,
        role: body.role,
        accessibility_needs: body.accessibility_needs,
        dietary_requirements: body.dietary_requirements,
        intent: body.intent,
    };
    match ledger.register(request) {
        Ok(registration) => (StatusCode::CREATED, axum::Json(registration)).into_response(),
        Err(RegistrationLedgerError::EventNotFound) => event_not_found(),
        Err(RegistrationLedgerError::Validation(error)) => {
            let payload = json!({ "error": error.to_string(), "missing": error.0 });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn roster_handler<E, S, X>(
    State(ledger): State<Arc<RegistrationLedger<E, S, X>>>,
    Path(event_id): Path<String>,
) -> Response
where
    E: EventStore + 'static,
    S: RegistrationStore + 'static,
    X: RosterExporter + 'static,
{
    match ledger.list_for(&EventId(event_id)) {
        Ok(roster) => (StatusCode::OK, axum::Json(roster)).into_response(),
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn occupancy_handler<E, S, X>(
    State(ledger): State<Arc<RegistrationLedger<E, S, X>>>,
    Path(event_id): Path<String>,
    Query(params): Query<OccupancyParams>,
) -> Response
where
    E: EventStore + 'static,
    S: RegistrationStore + 'static,
    X: RosterExporter + 'static,
{
    let today = params.today.unwrap_or_else(|| Utc::now().date_naive());
    match ledger.occupancy(&EventId(event_id), today) {
        Ok(occupancy) => (StatusCode::OK, axum::Json(occupancy)).into_response(),
        Err(RegistrationLedgerError::EventNotFound) => event_not_found(),
        Err(other) => internal_error(other),
    }
}

fn event_not_found() -> Response {
    let payload = json!({ "error": "event not found" });
    (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
}

fn internal_error(error: RegistrationLedgerError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
