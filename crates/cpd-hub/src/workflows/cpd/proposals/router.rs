use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::super::classification::CpdStatus;
use super::domain::{ProposalDecision, ProposalId, ProposalStatus, ProposalSubmission};
use super::repository::{Notifier, ProposalRepository, ProposalStoreError};
use super::service::{ProposalService, ProposalServiceError};
use super::triage::TriageScores;

/// Router builder exposing HTTP endpoints for the proposal workflow.
pub fn proposal_router<R, N>(service: Arc<ProposalService<R, N>>) -> Router
where
    R: ProposalRepository + 'static,
    N: Notifier + 'static,
{
    Router::new()
        .route(
            "/api/v1/cpd/proposals",
            post(submit_handler::<R, N>).get(list_handler::<R, N>),
        )
        .route(
            "/api/v1/cpd/proposals/:proposal_id/triage",
            post(triage_handler::<R, N>),
        )
        .route(
            "/api/v1/cpd/proposals/:proposal_id/event-template",
            get(template_handler::<R, N>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListParams {
    #[serde(default)]
    status: Option<ProposalStatus>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TriageRequest {
    pub decision: ProposalDecision,
    pub scores: TriageScores,
    #[serde(default)]
    pub feedback: String,
    pub confirmed_status: CpdStatus,
}

pub(crate) async fn submit_handler<R, N>(
    State(service): State<Arc<ProposalService<R, N>>>,
    axum::Json(submission): axum::Json<ProposalSubmission>,
) -> Response
where
    R: ProposalRepository + 'static,
    N: Notifier + 'static,
{
    match service.submit(submission) {
        Ok(proposal) => {
            (StatusCode::ACCEPTED, axum::Json(proposal.status_view())).into_response()
        }
        Err(ProposalServiceError::Validation(error)) => {
            let payload = json!({ "error": error.to_string(), "missing": error.0 });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn list_handler<R, N>(
    State(service): State<Arc<ProposalService<R, N>>>,
    Query(params): Query<ListParams>,
) -> Response
where
    R: ProposalRepository + 'static,
    N: Notifier + 'static,
{
    match service.list(params.status) {
        Ok(proposals) => {
            let views: Vec<_> = proposals.iter().map(|p| p.status_view()).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn triage_handler<R, N>(
    State(service): State<Arc<ProposalService<R, N>>>,
    Path(proposal_id): Path<String>,
    axum::Json(request): axum::Json<TriageRequest>,
) -> Response
where
    R: ProposalRepository + 'static,
    N: Notifier + 'static,
{
    let id = ProposalId(proposal_id);
    match service.triage(
        &id,
        request.decision,
        request.scores,
        request.feedback,
        request.confirmed_status,
    ) {
        Ok(proposal) => (StatusCode::OK, axum::Json(proposal.status_view())).into_response(),
        Err(ProposalServiceError::Score(error)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(ProposalServiceError::Store(ProposalStoreError::NotFound)) => {
            let payload = json!({ "error": "proposal not found", "proposal_id": id.0 });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(ProposalServiceError::Store(ProposalStoreError::NotPending { current })) => {
            let payload = json!({
                "error": "proposal already decided",
                "status": current.label(),
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn template_handler<R, N>(
    State(service): State<Arc<ProposalService<R, N>>>,
    Path(proposal_id): Path<String>,
) -> Response
where
    R: ProposalRepository + 'static,
    N: Notifier + 'static,
{
    let id = ProposalId(proposal_id);
    match service.event_template(&id) {
        Ok(template) => (StatusCode::OK, axum::Json(template)).into_response(),
        Err(ProposalServiceError::Store(ProposalStoreError::NotFound)) => {
            let payload = json!({ "error": "proposal not found", "proposal_id": id.0 });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

fn internal_error(error: ProposalServiceError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
