use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::classification::CpdStatus;
use super::super::events::domain::EventDraft;
use super::triage::TriageScores;

/// Identifier wrapper for Stage 1 proposals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProposalId(pub String);

/// Who submitted the proposal. Supplied by the session collaborator and
/// trusted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submitter {
    pub name: String,
    pub email: String,
    pub role: String,
    pub academy: String,
}

/// Free-text audience descriptor captured at Stage 1. Coarser than the
/// structured selection events carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalAudience {
    pub phase: String,
    pub roles: String,
}

/// Rough delivery sketch; firmed up during Stage 2.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoughFormat {
    pub kind: String,
    pub duration: String,
    pub expected_numbers: String,
}

/// Workflow state of a proposal. `MoreDetailRequired` and `Declined` are
/// terminal; there is no resubmission transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    Pending,
    Approved,
    MoreDetailRequired,
    Declined,
}

impl ProposalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ProposalStatus::Pending => "Pending",
            ProposalStatus::Approved => "Approved",
            ProposalStatus::MoreDetailRequired => "More Detail Required",
            ProposalStatus::Declined => "Declined",
        }
    }
}

/// Reviewer decision applied during triage. Excludes `Pending` so a triage
/// call can never leave a proposal undecided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalDecision {
    Approved,
    MoreDetailRequired,
    Declined,
}

impl ProposalDecision {
    pub const fn into_status(self) -> ProposalStatus {
        match self {
            ProposalDecision::Approved => ProposalStatus::Approved,
            ProposalDecision::MoreDetailRequired => ProposalStatus::MoreDetailRequired,
            ProposalDecision::Declined => ProposalStatus::Declined,
        }
    }

    pub const fn label(self) -> &'static str {
        self.into_status().label()
    }
}

/// Inbound Stage 1 submission, before an id and timestamp are assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalSubmission {
    pub submitted_by: Submitter,
    pub title: String,
    pub category: String,
    pub description: String,
    pub learning_objectives: String,
    pub target_audience: ProposalAudience,
    pub proposed_status: CpdStatus,
    pub intended_impact: String,
    pub rough_format: RoughFormat,
    pub date_window: String,
    #[serde(default)]
    pub additional_notes: String,
}

/// Triage output attached to a proposal together with its decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageRecord {
    pub scores: TriageScores,
    pub feedback: String,
    pub confirmed_status: CpdStatus,
    pub decided_at: DateTime<Utc>,
}

/// A Proposal of Intent moving through the Stage 1 workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpdProposal {
    pub id: ProposalId,
    pub submitted_by: Submitter,
    pub submitted_at: DateTime<Utc>,
    pub title: String,
    pub category: String,
    pub description: String,
    pub learning_objectives: String,
    pub target_audience: ProposalAudience,
    pub proposed_status: CpdStatus,
    pub intended_impact: String,
    pub rough_format: RoughFormat,
    pub date_window: String,
    pub additional_notes: String,
    pub status: ProposalStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triage: Option<TriageRecord>,
}

impl CpdProposal {
    /// Status confirmed at triage, falling back to what the facilitator
    /// proposed when no triage has happened yet.
    pub fn effective_status(&self) -> CpdStatus {
        self.triage
            .as_ref()
            .map(|record| record.confirmed_status)
            .unwrap_or(self.proposed_status)
    }

    /// Stage 2 prefill: map the proposal onto a partial event draft. The
    /// audience mapping is lossy (the Stage 1 phase becomes the draft's
    /// audience main; the free-text roles cannot be split into the richer
    /// structured model), so the facilitator completes the rest by hand.
    pub fn event_template(&self) -> EventDraft {
        let flags =
            super::super::classification::ClassificationFlags::for_status(self.effective_status());

        let mut draft = EventDraft::default();
        draft.proposal_id = Some(self.id.clone());
        draft.title = Some(self.title.clone());
        draft.category = Some(self.category.clone());
        draft.description = Some(self.description.clone());
        draft.learning_outcomes = Some(self.learning_objectives.clone());
        draft.audience_main = Some(self.target_audience.phase.clone());
        draft.flags = flags;
        draft
    }
}
