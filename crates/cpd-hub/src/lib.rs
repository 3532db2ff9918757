//! Core library for the Co-op Academies Trust CPD hub.
//!
//! The crate models the event lifecycle end to end: facilitators submit
//! Stage 1 proposals, the PDI review team triages them against the Trust
//! rubric, approved proposals are materialized into Stage 2 event drafts,
//! published events accept participant registrations, and the dashboard
//! module aggregates everything into chart-ready views. All storage and
//! outbound collaborators (notifications, roster export, generative AI)
//! sit behind traits so the workflows can be exercised in isolation.

pub mod config;
pub mod directory;
pub mod error;
pub mod telemetry;
pub mod workflows;
