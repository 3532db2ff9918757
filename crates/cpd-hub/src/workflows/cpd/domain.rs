//! Shared vocabulary for the CPD workflows: delivery formats, attendance
//! policies, audience descriptors, and the Trust's fixed category and
//! priority lists.

use serde::{Deserialize, Serialize};

/// Delivery format of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventFormat {
    OnlineLive,
    OnlineAsynchronous,
    InPerson,
}

impl EventFormat {
    pub const fn label(self) -> &'static str {
        match self {
            EventFormat::OnlineLive => "Online Live",
            EventFormat::OnlineAsynchronous => "Online Asynchronous",
            EventFormat::InPerson => "In-Person",
        }
    }
}

/// Policy governing how participants join an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceMode {
    /// Open sign-up for any colleague.
    Open,
    /// Places granted on request, subject to facilitator approval.
    Request,
    /// Fixed cohort chosen ahead of time.
    Defined,
    /// Invite-only.
    Invite,
    /// Attendance fixed by programme membership.
    Programme,
}

impl AttendanceMode {
    pub const fn label(self) -> &'static str {
        match self {
            AttendanceMode::Open => "Open sign-up",
            AttendanceMode::Request => "Request a place",
            AttendanceMode::Defined => "Defined cohort",
            AttendanceMode::Invite => "Invite only",
            AttendanceMode::Programme => "Programme cohort",
        }
    }

    /// Cohort-style events are tracked separately on the dashboard.
    pub const fn is_cohort(self) -> bool {
        matches!(
            self,
            AttendanceMode::Defined | AttendanceMode::Invite | AttendanceMode::Programme
        )
    }
}

/// Scheduling constraint expressed by the facilitator. Stored as a stable
/// tag; the original long-form wording lives in `label`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateRequirement {
    SpecificDay,
    FlexiblePeriod,
    DuringSchoolDay,
    Twilight,
    NoPreference,
}

impl DateRequirement {
    pub const fn label(self) -> &'static str {
        match self {
            DateRequirement::SpecificDay => "My CPD/Event must happen on a specific day:",
            DateRequirement::FlexiblePeriod => {
                "I am flexible, and the CPD/Event can take place within a general time period:"
            }
            DateRequirement::DuringSchoolDay => "My CPD/Event must happen during the school day",
            DateRequirement::Twilight => "My CPD/Event can be a twilight session",
            DateRequirement::NoPreference => "I have no strong preference for date or time",
        }
    }
}

/// Whether the session runs once or is repeated with identical content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Repetition {
    SingleOccurrence,
    RepeatedSameContent,
}

impl Repetition {
    pub const fn label(self) -> &'static str {
        match self {
            Repetition::SingleOccurrence => "Single occurrence",
            Repetition::RepeatedSameContent => "Repeated on multiple dates with same content",
        }
    }
}

/// Structured audience selection on an event. New records populate this
/// form; the flat legacy audience list is kept alongside for older data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudienceSelection {
    pub main: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Named facilitator attached to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facilitator {
    pub name: String,
    pub email: String,
}

/// Role category recorded on registrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleCategory {
    Teacher,
    SupportStaff,
    MiddleLeader,
    SeniorLeader,
    CentralTeam,
    Specialist,
    Other,
}

impl RoleCategory {
    pub const fn label(self) -> &'static str {
        match self {
            RoleCategory::Teacher => "Teacher",
            RoleCategory::SupportStaff => "Support Staff",
            RoleCategory::MiddleLeader => "Middle Leader",
            RoleCategory::SeniorLeader => "Senior Leader",
            RoleCategory::CentralTeam => "Central Team",
            RoleCategory::Specialist => "Specialist",
            RoleCategory::Other => "Other",
        }
    }
}

/// Application role of the acting user. The workflows trust the identity
/// they are handed; capability checks happen at the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Pdi,
    Facilitator,
    Colleague,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Pdi => "PDI",
            Role::Facilitator => "Facilitator",
            Role::Colleague => "Colleague",
        }
    }

    /// Default capability tags granted at first login.
    pub fn default_capabilities(self) -> &'static [&'static str] {
        match self {
            Role::Pdi => &[
                "dashboard",
                "facilitator",
                "catalog",
                "participant",
                "proposals",
            ],
            Role::Facilitator => &["facilitator", "catalog", "participant"],
            Role::Colleague => &["participant"],
        }
    }
}

/// Identity supplied by the session collaborator on each call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub academy: Option<String>,
}

/// The Trust's strategic priorities, in dashboard order.
pub const TRUST_PRIORITIES: [&str; 8] = [
    "Raising attainment and curriculum excellence",
    "Strengthening teaching, learning and assessment",
    "Inclusion, SEND and equity",
    "Safeguarding and pupil wellbeing",
    "Attendance and behaviour",
    "Leadership development and talent pipeline",
    "Digital, data and operational effectiveness",
    "Trust culture, identity and community engagement",
];

/// Fixed CPD category list events and proposals are filed under.
pub const CPD_CATEGORIES: [&str; 11] = [
    "Externally Facing Events",
    "Leadership and Professional Practice",
    "Safeguarding and Pupil Wellbeing",
    "SEND and Inclusion",
    "IT, Data, Compliance, and Operations",
    "Teaching, Learning and Assessment",
    "Behaviour & Attendance",
    "Curriculum and Subject Networks",
    "Primary and EYFS Networks",
    "Culture, Values, and Engagement",
    "Initial Teacher Training (SCITT and ITaP)",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cohort_modes_cover_defined_invite_programme() {
        assert!(AttendanceMode::Defined.is_cohort());
        assert!(AttendanceMode::Invite.is_cohort());
        assert!(AttendanceMode::Programme.is_cohort());
        assert!(!AttendanceMode::Open.is_cohort());
        assert!(!AttendanceMode::Request.is_cohort());
    }

    #[test]
    fn pdi_capabilities_include_dashboard_and_proposals() {
        let tabs = Role::Pdi.default_capabilities();
        assert!(tabs.contains(&"dashboard"));
        assert!(tabs.contains(&"proposals"));
        assert!(!Role::Colleague.default_capabilities().contains(&"dashboard"));
    }
}
