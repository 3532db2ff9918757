use serde::{Deserialize, Serialize};

use super::domain::{CpdProposal, ProposalDecision, ProposalId, ProposalStatus, TriageRecord};

/// Storage abstraction so the proposal workflow can be exercised in
/// isolation. Implementations keep insertion order for `list`.
pub trait ProposalRepository: Send + Sync {
    fn insert(&self, proposal: CpdProposal) -> Result<CpdProposal, ProposalStoreError>;
    fn fetch(&self, id: &ProposalId) -> Result<Option<CpdProposal>, ProposalStoreError>;
    fn list(
        &self,
        status: Option<ProposalStatus>,
    ) -> Result<Vec<CpdProposal>, ProposalStoreError>;

    /// Apply a triage decision. The status check must happen inside the
    /// store's own critical section so two reviewers can never both decide
    /// the same proposal: implementations return `NotPending` when the
    /// stored status has already moved on.
    fn decide(
        &self,
        id: &ProposalId,
        decision: ProposalDecision,
        triage: TriageRecord,
    ) -> Result<CpdProposal, ProposalStoreError>;
}

/// Error enumeration for proposal store failures.
#[derive(Debug, thiserror::Error)]
pub enum ProposalStoreError {
    #[error("proposal already exists")]
    Conflict,
    #[error("proposal not found")]
    NotFound,
    #[error("proposal already decided as '{}'", current.label())]
    NotPending { current: ProposalStatus },
    #[error("proposal store unavailable: {0}")]
    Unavailable(String),
}

/// Outbound notification payload for the mail collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// Trait describing the fire-and-forget mail hook. Delivery is
/// best-effort; the workflows log failures and carry on.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification) -> Result<(), NotifyError>;
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
