//! The event registry: Stage 2 drafts, published events, catalog
//! queries, and the leadership dashboard.

pub mod domain;
pub mod registry;
pub mod router;
pub mod views;

pub use domain::{CpdEvent, EventDraft, EventId, EventValidationError};
pub use registry::{EventQuery, EventRegistry, EventRegistryError, EventSort, EventStore, EventStoreError};
pub use router::{dashboard_router, event_router, DashboardState};
pub use views::{DashboardFilters, DashboardReport};
