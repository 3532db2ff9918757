//! Participant sign-ups against published events.

pub mod domain;
pub mod ledger;
pub mod router;

pub use domain::{
    Availability, Registration, RegistrationId, RegistrationIntent, RegistrationRequest,
    RegistrationStatus,
};
pub use ledger::{
    ExportError, Occupancy, RegistrationLedger, RegistrationLedgerError,
    RegistrationMissingFields, RegistrationStore, RegistrationStoreError, RosterExporter,
};
pub use router::registration_router;
