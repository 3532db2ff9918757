use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::domain::RoleCategory;
use super::super::events::domain::EventId;

/// Identifier wrapper for ledger entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegistrationId(pub String);

/// Outcome of a sign-up, resolved by the ledger at append time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    /// A confirmed place.
    Registered,
    /// Awaiting facilitator approval on a request-mode event.
    Requested,
    /// Joined the waiting list for a full event.
    Waitlisted,
}

impl RegistrationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            RegistrationStatus::Registered => "Registered",
            RegistrationStatus::Requested => "Requested",
            RegistrationStatus::Waitlisted => "Waitlisted",
        }
    }
}

/// What the participant asked for. The ledger, not the caller, decides
/// the resulting status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationIntent {
    #[default]
    Standard,
    Waitlist,
}

/// Sign-up payload supplied by the participant portal.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationRequest {
    pub event_id: EventId,
    pub full_name: String,
    pub email: String,
    pub academy: String,
    pub role: RoleCategory,
    #[serde(default)]
    pub accessibility_needs: Option<String>,
    #[serde(default)]
    pub dietary_requirements: Option<String>,
    #[serde(default)]
    pub intent: RegistrationIntent,
}

/// A ledger entry. Append-only; a participant's status never changes
/// after the entry is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub id: RegistrationId,
    pub event_id: EventId,
    pub full_name: String,
    pub email: String,
    pub academy: String,
    pub role: RoleCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessibility_needs: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_requirements: Option<String>,
    pub status: RegistrationStatus,
    pub registered_at: DateTime<Utc>,
}

/// How an event currently presents to a prospective participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    /// The event date has passed.
    Past,
    /// Confirmed places have reached capacity; only the waiting list
    /// remains.
    Full,
    /// Places are granted on request.
    RequestOnly,
    /// Open places remain.
    Open,
}
