use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::classification::{ClassificationFlags, CpdStatus};
use super::super::domain::{
    AttendanceMode, AudienceSelection, DateRequirement, EventFormat, Facilitator, Repetition,
};
use super::super::proposals::domain::ProposalId;

/// Identifier wrapper for published events.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub String);

/// A scheduled CPD activity. Immutable once published; there are no edit
/// or delete operations on the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpdEvent {
    pub id: EventId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposal_id: Option<ProposalId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    pub title: String,
    pub description: String,
    pub learning_outcomes: String,
    pub category: String,
    pub trust_priorities: Vec<String>,
    pub flags: ClassificationFlags,
    /// Always the cascade of `flags`; recomputed by the draft builder,
    /// never set directly.
    pub final_status: CpdStatus,
    pub audience: AudienceSelection,
    /// Flat audience strings kept for records predating the structured
    /// selection. New events leave this empty.
    #[serde(default)]
    pub legacy_audience: Vec<String>,
    pub format: EventFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_requirement: Option<DateRequirement>,
    pub venue: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveTime>,
    pub capacity: u32,
    pub attendance: AttendanceMode,
    pub repetition: Repetition,
    #[serde(default)]
    pub facilitators: Vec<Facilitator>,
    pub created_at: DateTime<Utc>,
}

/// Progressively-filled Stage 2 form. `build` is the single validation
/// step: it either yields a complete `CpdEvent` or names every missing
/// required field, and it recomputes the final status from the flags so
/// the classification invariant cannot be bypassed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposal_id: Option<ProposalId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub learning_outcomes: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub trust_priorities: Vec<String>,
    #[serde(default)]
    pub flags: ClassificationFlags,
    #[serde(default)]
    pub audience_main: Option<String>,
    #[serde(default)]
    pub audience_sub: Option<String>,
    #[serde(default)]
    pub audience_phase: Option<String>,
    #[serde(default)]
    pub audience_region: Option<String>,
    #[serde(default)]
    pub audience_detail: Option<String>,
    #[serde(default)]
    pub format: Option<EventFormat>,
    #[serde(default)]
    pub sub_format: Option<String>,
    #[serde(default)]
    pub date_requirement: Option<DateRequirement>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub attendance: Option<AttendanceMode>,
    #[serde(default)]
    pub repetition: Option<Repetition>,
    #[serde(default)]
    pub facilitators: Vec<Facilitator>,
}

/// Capacity offered when the form leaves it blank.
const DEFAULT_CAPACITY: u32 = 30;

impl EventDraft {
    /// Finalize the draft into an immutable event. Required fields are
    /// title, date, audience main, and format; a zero capacity is refused.
    pub fn build(self, id: EventId, created_at: DateTime<Utc>) -> Result<CpdEvent, EventValidationError> {
        let mut missing = Vec::new();
        if self.title.as_deref().map_or(true, |t| t.trim().is_empty()) {
            missing.push("title");
        }
        if self.date.is_none() {
            missing.push("date");
        }
        if self
            .audience_main
            .as_deref()
            .map_or(true, |a| a.trim().is_empty())
        {
            missing.push("audience.main");
        }
        if self.format.is_none() {
            missing.push("format");
        }
        if !missing.is_empty() {
            return Err(EventValidationError::MissingFields(missing));
        }

        if self.capacity == Some(0) {
            return Err(EventValidationError::ZeroCapacity);
        }

        let flags = self.flags;
        Ok(CpdEvent {
            id,
            proposal_id: self.proposal_id,
            course_id: self.course_id,
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            learning_outcomes: self.learning_outcomes.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            trust_priorities: self.trust_priorities,
            flags,
            final_status: flags.status(),
            audience: AudienceSelection {
                main: self.audience_main.unwrap_or_default(),
                sub: self.audience_sub,
                phase: self.audience_phase,
                region: self.audience_region,
                detail: self.audience_detail,
            },
            legacy_audience: Vec::new(),
            format: self.format.expect("format presence checked above"),
            sub_format: self.sub_format,
            date_requirement: self.date_requirement,
            venue: self.venue.unwrap_or_default(),
            date: self.date.expect("date presence checked above"),
            start_time: self.start_time,
            end_time: self.end_time,
            capacity: self.capacity.unwrap_or(DEFAULT_CAPACITY),
            attendance: self.attendance.unwrap_or(AttendanceMode::Open),
            repetition: self.repetition.unwrap_or(Repetition::SingleOccurrence),
            facilitators: self.facilitators,
            created_at,
        })
    }
}

/// Raised when a draft cannot be finalized. No partial event is stored.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventValidationError {
    MissingFields(Vec<&'static str>),
    ZeroCapacity,
}

impl fmt::Display for EventValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventValidationError::MissingFields(fields) => {
                write!(f, "missing required field(s): {}", fields.join(", "))
            }
            EventValidationError::ZeroCapacity => {
                write!(f, "capacity must be a positive number of places")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_draft() -> EventDraft {
        let mut draft = EventDraft::default();
        draft.title = Some("Annual Safeguarding Update".to_string());
        draft.date = NaiveDate::from_ymd_opt(2026, 6, 12);
        draft.audience_main = Some("Whole-staff / mixed roles".to_string());
        draft.format = Some(EventFormat::OnlineLive);
        draft
    }

    #[test]
    fn build_names_every_missing_required_field() {
        let err = EventDraft::default()
            .build(EventId("evt-test".to_string()), Utc::now())
            .expect_err("empty draft must fail");
        match err {
            EventValidationError::MissingFields(fields) => {
                assert_eq!(fields, vec!["title", "date", "audience.main", "format"]);
            }
            other => panic!("expected missing fields, got {other:?}"),
        }
    }

    #[test]
    fn blank_title_counts_as_missing() {
        let mut draft = complete_draft();
        draft.title = Some("   ".to_string());
        let err = draft
            .build(EventId("evt-test".to_string()), Utc::now())
            .expect_err("blank title must fail");
        assert!(matches!(
            err,
            EventValidationError::MissingFields(ref fields) if fields == &vec!["title"]
        ));
    }

    #[test]
    fn zero_capacity_is_refused() {
        let mut draft = complete_draft();
        draft.capacity = Some(0);
        let err = draft
            .build(EventId("evt-test".to_string()), Utc::now())
            .expect_err("zero capacity must fail");
        assert_eq!(err, EventValidationError::ZeroCapacity);
    }

    #[test]
    fn final_status_always_tracks_the_flags() {
        let mut draft = complete_draft();
        draft.flags.set_mandatory(true);
        let event = draft
            .build(EventId("evt-test".to_string()), Utc::now())
            .expect("complete draft builds");
        assert_eq!(event.final_status, CpdStatus::Mandatory);
        assert_eq!(event.final_status, event.flags.status());
        assert_eq!(event.capacity, DEFAULT_CAPACITY);
        assert_eq!(event.attendance, AttendanceMode::Open);
    }
}
