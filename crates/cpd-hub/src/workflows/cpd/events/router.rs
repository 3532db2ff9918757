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

use crate::directory::{AcademyDirectory, Region};

use super::super::classification::CpdStatus;
use super::super::registrations::ledger::RegistrationStore;
use super::domain::{EventDraft, EventId};
use super::registry::{EventQuery, EventRegistry, EventRegistryError, EventStore};
use super::views::{DashboardFilters, DashboardReport};

/// Router builder for the event registry endpoints.
pub fn event_router<S>(registry: Arc<EventRegistry<S>>) -> Router
where
    S: EventStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/cpd/events",
            post(publish_handler::<S>).get(list_handler::<S>),
        )
        .route("/api/v1/cpd/events/:event_id", get(fetch_handler::<S>))
        .with_state(registry)
}

pub(crate) async fn publish_handler<S>(
    State(registry): State<Arc<EventRegistry<S>>>,
    axum::Json(draft): axum::Json<EventDraft>,
) -> Response
where
    S: EventStore + 'static,
{
    match registry.publish(draft) {
        Ok(event) => (StatusCode::CREATED, axum::Json(event)).into_response(),
        Err(EventRegistryError::Validation(error)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn list_handler<S>(
    State(registry): State<Arc<EventRegistry<S>>>,
    Query(query): Query<EventQuery>,
) -> Response
where
    S: EventStore + 'static,
{
    match registry.list(&query) {
        Ok(events) => (StatusCode::OK, axum::Json(events)).into_response(),
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn fetch_handler<S>(
    State(registry): State<Arc<EventRegistry<S>>>,
    Path(event_id): Path<String>,
) -> Response
where
    S: EventStore + 'static,
{
    let id = EventId(event_id);
    match registry.get(&id) {
        Ok(event) => (StatusCode::OK, axum::Json(event)).into_response(),
        Err(EventRegistryError::NotFound) => {
            let payload = json!({ "error": "event not found", "event_id": id.0 });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

/// Shared state for the dashboard endpoint: the report reads straight
/// from both stores.
pub struct DashboardState<E, S> {
    pub events: Arc<E>,
    pub registrations: Arc<S>,
    pub directory: AcademyDirectory,
}

/// Router builder for the leadership dashboard.
pub fn dashboard_router<E, S>(state: Arc<DashboardState<E, S>>) -> Router
where
    E: EventStore + 'static,
    S: RegistrationStore + 'static,
{
    Router::new()
        .route("/api/v1/cpd/dashboard", get(dashboard_handler::<E, S>))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub(crate) struct DashboardParams {
    #[serde(default)]
    region: Option<Region>,
    #[serde(default)]
    status: Option<CpdStatus>,
    /// Reference date override, mainly for reviewing past terms.
    #[serde(default)]
    today: Option<NaiveDate>,
}

pub(crate) async fn dashboard_handler<E, S>(
    State(state): State<Arc<DashboardState<E, S>>>,
    Query(params): Query<DashboardParams>,
) -> Response
where
    E: EventStore + 'static,
    S: RegistrationStore + 'static,
{
    let events = match state.events.list() {
        Ok(events) => events,
        Err(error) => return internal_error(error.into()),
    };
    let registrations = match state.registrations.list() {
        Ok(registrations) => registrations,
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            return (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response();
        }
    };

    let filters = DashboardFilters {
        region: params.region,
        status: params.status,
    };
    let today = params.today.unwrap_or_else(|| Utc::now().date_naive());
    let report = DashboardReport::build(&events, &registrations, &state.directory, &filters, today);
    (StatusCode::OK, axum::Json(report)).into_response()
}

fn internal_error(error: EventRegistryError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
