use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::warn;

use super::super::classification::CpdStatus;
use super::super::events::domain::EventDraft;
use super::domain::{
    CpdProposal, ProposalDecision, ProposalId, ProposalStatus, ProposalSubmission, TriageRecord,
};
use super::repository::{Notification, Notifier, ProposalRepository, ProposalStoreError};
use super::triage::{ScoreOutOfRange, TriageScores};

/// Inbox address for the PDI review team.
const REVIEW_TEAM_ADDRESS: &str = "pdi@coopacademies.co.uk";

static PROPOSAL_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_proposal_id() -> ProposalId {
    let id = PROPOSAL_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ProposalId(format!("prop-{id:06}"))
}

/// Service driving the Stage 1 proposal workflow: submission, triage, and
/// Stage 2 template derivation.
pub struct ProposalService<R, N> {
    repository: Arc<R>,
    notifier: Arc<N>,
}

impl<R, N> ProposalService<R, N>
where
    R: ProposalRepository + 'static,
    N: Notifier + 'static,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    /// Submit a new Proposal of Intent. Assigns a fresh id and server
    /// timestamp and stores it as `Pending`, then tells the review team.
    pub fn submit(
        &self,
        submission: ProposalSubmission,
    ) -> Result<CpdProposal, ProposalServiceError> {
        validate_submission(&submission)?;

        let proposal = CpdProposal {
            id: next_proposal_id(),
            submitted_at: Utc::now(),
            status: ProposalStatus::Pending,
            triage: None,
            submitted_by: submission.submitted_by,
            title: submission.title,
            category: submission.category,
            description: submission.description,
            learning_objectives: submission.learning_objectives,
            target_audience: submission.target_audience,
            proposed_status: submission.proposed_status,
            intended_impact: submission.intended_impact,
            rough_format: submission.rough_format,
            date_window: submission.date_window,
            additional_notes: submission.additional_notes,
        };

        let stored = self.repository.insert(proposal)?;

        self.send_best_effort(Notification {
            recipient: REVIEW_TEAM_ADDRESS.to_string(),
            subject: "New CPD Proposal".to_string(),
            body: format!(
                "{} by {} ({})",
                stored.title, stored.submitted_by.name, stored.submitted_by.academy
            ),
        });

        Ok(stored)
    }

    /// Triage a pending proposal. The decision, scores, feedback, and
    /// confirmed status land atomically; a proposal that has already been
    /// decided is refused with its current status.
    pub fn triage(
        &self,
        id: &ProposalId,
        decision: ProposalDecision,
        scores: TriageScores,
        feedback: String,
        confirmed_status: CpdStatus,
    ) -> Result<CpdProposal, ProposalServiceError> {
        scores.validate()?;

        let triage = TriageRecord {
            scores,
            feedback,
            confirmed_status,
            decided_at: Utc::now(),
        };

        let updated = self.repository.decide(id, decision, triage)?;

        self.send_best_effort(Notification {
            recipient: updated.submitted_by.email.clone(),
            subject: format!("CPD Proposal Update - {}", decision.label()),
            body: match &updated.triage {
                Some(record) => format!("Feedback: {}", record.feedback),
                None => "Your proposal has been reviewed.".to_string(),
            },
        });

        Ok(updated)
    }

    /// Stage 2 prefill for a proposal. Pure derivation: no event is
    /// created until the facilitator completes and submits the draft.
    pub fn event_template(&self, id: &ProposalId) -> Result<EventDraft, ProposalServiceError> {
        let proposal = self
            .repository
            .fetch(id)?
            .ok_or(ProposalStoreError::NotFound)?;
        Ok(proposal.event_template())
    }

    pub fn get(&self, id: &ProposalId) -> Result<CpdProposal, ProposalServiceError> {
        let proposal = self
            .repository
            .fetch(id)?
            .ok_or(ProposalStoreError::NotFound)?;
        Ok(proposal)
    }

    pub fn list(
        &self,
        status: Option<ProposalStatus>,
    ) -> Result<Vec<CpdProposal>, ProposalServiceError> {
        Ok(self.repository.list(status)?)
    }

    /// Notifications never fail the primary state transition.
    fn send_best_effort(&self, notification: Notification) {
        if let Err(err) = self.notifier.notify(notification) {
            warn!(error = %err, "proposal notification dropped");
        }
    }
}

fn validate_submission(submission: &ProposalSubmission) -> Result<(), MissingFields> {
    let mut missing = Vec::new();
    if submission.title.trim().is_empty() {
        missing.push("title");
    }
    if submission.category.trim().is_empty() {
        missing.push("category");
    }
    if submission.description.trim().is_empty() {
        missing.push("description");
    }
    if submission.learning_objectives.trim().is_empty() {
        missing.push("learning_objectives");
    }
    if submission.submitted_by.email.trim().is_empty() {
        missing.push("submitted_by.email");
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(MissingFields(missing))
    }
}

/// Required fields absent from a submission. No partial record is stored.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub struct MissingFields(pub Vec<&'static str>);

impl fmt::Display for MissingFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing required field(s): {}", self.0.join(", "))
    }
}

/// Error raised by the proposal service.
#[derive(Debug, thiserror::Error)]
pub enum ProposalServiceError {
    #[error(transparent)]
    Validation(#[from] MissingFields),
    #[error(transparent)]
    Score(#[from] ScoreOutOfRange),
    #[error(transparent)]
    Store(#[from] ProposalStoreError),
}

/// Sanitized representation of a proposal's workflow position.
#[derive(Debug, Clone, Serialize)]
pub struct ProposalStatusView {
    pub proposal_id: ProposalId,
    pub title: String,
    pub status: &'static str,
    pub feedback: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_score: Option<u8>,
}

impl CpdProposal {
    pub fn status_view(&self) -> ProposalStatusView {
        ProposalStatusView {
            proposal_id: self.id.clone(),
            title: self.title.clone(),
            status: self.status.label(),
            feedback: self
                .triage
                .as_ref()
                .map(|record| record.feedback.clone())
                .unwrap_or_else(|| "awaiting triage".to_string()),
            total_score: self.triage.as_ref().map(|record| record.scores.total()),
        }
    }
}
