//! Stage 1 proposal intake and triage.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub mod triage;

pub use domain::{
    CpdProposal, ProposalAudience, ProposalDecision, ProposalId, ProposalStatus,
    ProposalSubmission, RoughFormat, Submitter, TriageRecord,
};
pub use repository::{
    Notification, Notifier, NotifyError, ProposalRepository, ProposalStoreError,
};
pub use router::proposal_router;
pub use service::{MissingFields, ProposalService, ProposalServiceError, ProposalStatusView};
pub use triage::{
    suggest_action, RubricCriterion, RubricWeight, ScoreOutOfRange, SuggestedAction, TriageScores,
    MAX_CRITERION_SCORE, MAX_TOTAL_SCORE,
};
