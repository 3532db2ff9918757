//! CPD event lifecycle workflows.
//!
//! The lifecycle runs in two stages: a lightweight Proposal of Intent is
//! triaged by the review team, and an approved proposal can be promoted
//! into a full event draft. Published events then accept participant
//! registrations, and the dashboard views aggregate both collections.

pub mod assist;
pub mod classification;
pub mod domain;
pub mod events;
pub mod proposals;
pub mod registrations;

pub use classification::{classify, ClassificationFlags, CpdStatus};
pub use domain::{
    Actor, AttendanceMode, AudienceSelection, DateRequirement, EventFormat, Facilitator,
    Repetition, Role, RoleCategory, CPD_CATEGORIES, TRUST_PRIORITIES,
};
