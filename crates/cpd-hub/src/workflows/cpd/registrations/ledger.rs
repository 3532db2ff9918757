use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::warn;

use super::super::domain::AttendanceMode;
use super::super::events::domain::{CpdEvent, EventId};
use super::super::events::registry::{EventStore, EventStoreError};
use super::domain::{
    Availability, Registration, RegistrationId, RegistrationIntent, RegistrationRequest,
    RegistrationStatus,
};

static REGISTRATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_registration_id() -> RegistrationId {
    let id = REGISTRATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    RegistrationId(format!("reg-{id:06}"))
}

/// Append-only persistence seam for the registration ledger.
pub trait RegistrationStore: Send + Sync {
    fn append(&self, registration: Registration) -> Result<Registration, RegistrationStoreError>;
    fn list_for(&self, event_id: &EventId) -> Result<Vec<Registration>, RegistrationStoreError>;
    fn list(&self) -> Result<Vec<Registration>, RegistrationStoreError>;
}

/// Error raised by a registration store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationStoreError {
    #[error("a registration with this identifier already exists")]
    Conflict,
    #[error("registration store unavailable: {0}")]
    Unavailable(String),
}

/// Downstream roster integration, e.g. a shared attendance sheet. Export
/// happens only for confirmed places and never blocks the sign-up.
pub trait RosterExporter: Send + Sync {
    fn export(&self, event: &CpdEvent, registration: &Registration) -> Result<(), ExportError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("roster export failed: {0}")]
    Transport(String),
}

/// Service recording sign-ups against published events.
pub struct RegistrationLedger<E, S, X> {
    events: Arc<E>,
    store: Arc<S>,
    exporter: Arc<X>,
}

impl<E, S, X> RegistrationLedger<E, S, X>
where
    E: EventStore + 'static,
    S: RegistrationStore + 'static,
    X: RosterExporter + 'static,
{
    pub fn new(events: Arc<E>, store: Arc<S>, exporter: Arc<X>) -> Self {
        Self {
            events,
            store,
            exporter,
        }
    }

    /// Record a sign-up. The resulting status is resolved here: an
    /// explicit waiting-list intent wins, then the event's request mode,
    /// otherwise the place is confirmed. Confirmed places are pushed to
    /// the roster exporter on a best-effort basis.
    pub fn register(
        &self,
        request: RegistrationRequest,
    ) -> Result<Registration, RegistrationLedgerError> {
        let event = self
            .events
            .fetch(&request.event_id)?
            .ok_or(RegistrationLedgerError::EventNotFound)?;

        validate_request(&request)?;

        let status = match (request.intent, event.attendance) {
            (RegistrationIntent::Waitlist, _) => RegistrationStatus::Waitlisted,
            (RegistrationIntent::Standard, AttendanceMode::Request) => {
                RegistrationStatus::Requested
            }
            (RegistrationIntent::Standard, _) => RegistrationStatus::Registered,
        };

        let registration = Registration {
            id: next_registration_id(),
            event_id: request.event_id,
            full_name: request.full_name,
            email: request.email,
            academy: request.academy,
            role: request.role,
            accessibility_needs: request.accessibility_needs,
            dietary_requirements: request.dietary_requirements,
            status,
            registered_at: Utc::now(),
        };

        let stored = self.store.append(registration)?;

        if stored.status == RegistrationStatus::Registered {
            if let Err(err) = self.exporter.export(&event, &stored) {
                warn!(
                    error = %err,
                    event_id = %event.id.0,
                    "roster export dropped"
                );
            }
        }

        Ok(stored)
    }

    /// Ledger entries held against an event, whatever their status.
    /// Capacity comparisons and the dashboard both use this figure; the
    /// reconciliation view picks up any resulting over-capacity events.
    pub fn count_for(&self, event_id: &EventId) -> Result<usize, RegistrationLedgerError> {
        Ok(self.store.list_for(event_id)?.len())
    }

    pub fn list_for(
        &self,
        event_id: &EventId,
    ) -> Result<Vec<Registration>, RegistrationLedgerError> {
        Ok(self.store.list_for(event_id)?)
    }

    /// Occupancy snapshot for an event: confirmed places against
    /// capacity, plus the participant-facing state on `today`.
    pub fn occupancy(
        &self,
        event_id: &EventId,
        today: NaiveDate,
    ) -> Result<Occupancy, RegistrationLedgerError> {
        let event = self
            .events
            .fetch(event_id)?
            .ok_or(RegistrationLedgerError::EventNotFound)?;
        let count = self.count_for(event_id)?;
        let state = self.availability(&event, today)?;
        Ok(Occupancy {
            event_id: event.id,
            count,
            capacity: event.capacity,
            state,
        })
    }

    /// How the event presents to a prospective participant on `today`.
    pub fn availability(
        &self,
        event: &CpdEvent,
        today: NaiveDate,
    ) -> Result<Availability, RegistrationLedgerError> {
        if event.date < today {
            return Ok(Availability::Past);
        }
        if self.count_for(&event.id)? >= event.capacity as usize {
            return Ok(Availability::Full);
        }
        if event.attendance == AttendanceMode::Request {
            return Ok(Availability::RequestOnly);
        }
        Ok(Availability::Open)
    }
}

fn validate_request(request: &RegistrationRequest) -> Result<(), RegistrationMissingFields> {
    let mut missing = Vec::new();
    if request.full_name.trim().is_empty() {
        missing.push("full_name");
    }
    if request.email.trim().is_empty() {
        missing.push("email");
    }
    if request.academy.trim().is_empty() {
        missing.push("academy");
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(RegistrationMissingFields(missing))
    }
}

/// Published occupancy figures for a single event.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Occupancy {
    pub event_id: EventId,
    pub count: usize,
    pub capacity: u32,
    pub state: Availability,
}

/// Required fields absent from a sign-up. No ledger entry is written.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub struct RegistrationMissingFields(pub Vec<&'static str>);

impl fmt::Display for RegistrationMissingFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing required field(s): {}", self.0.join(", "))
    }
}

/// Error raised by the registration ledger.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationLedgerError {
    #[error("event not found")]
    EventNotFound,
    #[error(transparent)]
    Validation(#[from] RegistrationMissingFields),
    #[error(transparent)]
    Events(#[from] EventStoreError),
    #[error(transparent)]
    Store(#[from] RegistrationStoreError),
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    use super::super::super::domain::{EventFormat, RoleCategory};
    use super::super::super::events::domain::EventDraft;
    use super::*;

    #[derive(Default)]
    struct VecEventStore {
        events: Mutex<Vec<CpdEvent>>,
    }

    impl EventStore for VecEventStore {
        fn append(&self, event: CpdEvent) -> Result<CpdEvent, EventStoreError> {
            self.events.lock().unwrap().push(event.clone());
            Ok(event)
        }

        fn fetch(&self, id: &EventId) -> Result<Option<CpdEvent>, EventStoreError> {
            Ok(self
                .events
                .lock()
                .unwrap()
                .iter()
                .find(|e| &e.id == id)
                .cloned())
        }

        fn list(&self) -> Result<Vec<CpdEvent>, EventStoreError> {
            Ok(self.events.lock().unwrap().clone())
        }
    }

    #[derive(Default)]
    struct VecRegistrationStore {
        entries: Mutex<Vec<Registration>>,
    }

    impl RegistrationStore for VecRegistrationStore {
        fn append(
            &self,
            registration: Registration,
        ) -> Result<Registration, RegistrationStoreError> {
            self.entries.lock().unwrap().push(registration.clone());
            Ok(registration)
        }

        fn list_for(
            &self,
            event_id: &EventId,
        ) -> Result<Vec<Registration>, RegistrationStoreError> {
            Ok(self
                .entries
                .lock()
                .unwrap()
                .iter()
                .filter(|r| &r.event_id == event_id)
                .cloned()
                .collect())
        }

        fn list(&self) -> Result<Vec<Registration>, RegistrationStoreError> {
            Ok(self.entries.lock().unwrap().clone())
        }
    }

    #[derive(Default)]
    struct CountingExporter {
        exports: AtomicUsize,
        fail: bool,
    }

    impl RosterExporter for CountingExporter {
        fn export(&self, _: &CpdEvent, _: &Registration) -> Result<(), ExportError> {
            if self.fail {
                return Err(ExportError::Transport("sheet offline".to_string()));
            }
            self.exports.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Fixture {
        ledger: RegistrationLedger<VecEventStore, VecRegistrationStore, CountingExporter>,
        events: Arc<VecEventStore>,
        exporter: Arc<CountingExporter>,
    }

    fn fixture(exporter: CountingExporter) -> Fixture {
        let events = Arc::new(VecEventStore::default());
        let exporter = Arc::new(exporter);
        let ledger = RegistrationLedger::new(
            Arc::clone(&events),
            Arc::new(VecRegistrationStore::default()),
            Arc::clone(&exporter),
        );
        Fixture {
            ledger,
            events,
            exporter,
        }
    }

    fn publish(
        events: &VecEventStore,
        id: &str,
        attendance: AttendanceMode,
        capacity: u32,
        date: NaiveDate,
    ) -> CpdEvent {
        let mut draft = EventDraft::default();
        draft.title = Some("Coaching Clinic".to_string());
        draft.date = Some(date);
        draft.audience_main = Some("Middle Leaders".to_string());
        draft.format = Some(EventFormat::InPerson);
        draft.capacity = Some(capacity);
        draft.attendance = Some(attendance);
        let event = draft
            .build(EventId(id.to_string()), Utc::now())
            .expect("complete draft builds");
        events.append(event.clone()).unwrap();
        event
    }

    fn request(event_id: &EventId, intent: RegistrationIntent) -> RegistrationRequest {
        RegistrationRequest {
            event_id: event_id.clone(),
            full_name: "Sam Okafor".to_string(),
            email: "sam.okafor@coopacademies.co.uk".to_string(),
            academy: "Co-op Academy Manchester".to_string(),
            role: RoleCategory::Teacher,
            accessibility_needs: None,
            dietary_requirements: None,
            intent,
        }
    }

    fn future_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 3, 14).unwrap()
    }

    #[test]
    fn open_event_yields_registered_and_exports_once() {
        let fx = fixture(CountingExporter::default());
        let event = publish(&fx.events, "evt-a", AttendanceMode::Open, 30, future_date());
        let entry = fx.ledger.register(request(&event.id, RegistrationIntent::Standard)).unwrap();
        assert_eq!(entry.status, RegistrationStatus::Registered);
        assert_eq!(fx.exporter.exports.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn request_mode_yields_requested_with_no_export() {
        let fx = fixture(CountingExporter::default());
        let event = publish(
            &fx.events,
            "evt-b",
            AttendanceMode::Request,
            30,
            future_date(),
        );
        let entry = fx.ledger.register(request(&event.id, RegistrationIntent::Standard)).unwrap();
        assert_eq!(entry.status, RegistrationStatus::Requested);
        assert_eq!(fx.exporter.exports.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn waitlist_intent_wins_even_on_an_open_event() {
        let fx = fixture(CountingExporter::default());
        let event = publish(&fx.events, "evt-c", AttendanceMode::Open, 30, future_date());
        let entry = fx.ledger.register(request(&event.id, RegistrationIntent::Waitlist)).unwrap();
        assert_eq!(entry.status, RegistrationStatus::Waitlisted);
        assert_eq!(fx.exporter.exports.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn export_failure_does_not_fail_the_registration() {
        let fx = fixture(CountingExporter {
            exports: AtomicUsize::new(0),
            fail: true,
        });
        let event = publish(&fx.events, "evt-d", AttendanceMode::Open, 30, future_date());
        let entry = fx.ledger.register(request(&event.id, RegistrationIntent::Standard)).unwrap();
        assert_eq!(entry.status, RegistrationStatus::Registered);
        assert_eq!(fx.ledger.count_for(&event.id).unwrap(), 1);
    }

    #[test]
    fn unknown_event_is_refused() {
        let fx = fixture(CountingExporter::default());
        let err = fx
            .ledger
            .register(request(
                &EventId("evt-missing".to_string()),
                RegistrationIntent::Standard,
            ))
            .expect_err("unknown event must be refused");
        assert!(matches!(err, RegistrationLedgerError::EventNotFound));
    }

    #[test]
    fn count_for_includes_every_ledger_status() {
        let fx = fixture(CountingExporter::default());
        let event = publish(&fx.events, "evt-e", AttendanceMode::Open, 30, future_date());
        fx.ledger.register(request(&event.id, RegistrationIntent::Standard)).unwrap();
        fx.ledger.register(request(&event.id, RegistrationIntent::Waitlist)).unwrap();
        assert_eq!(fx.ledger.count_for(&event.id).unwrap(), 2);
    }

    #[test]
    fn availability_walks_past_full_request_open() {
        let fx = fixture(CountingExporter::default());
        let today = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();

        let past = publish(
            &fx.events,
            "evt-past",
            AttendanceMode::Open,
            30,
            NaiveDate::from_ymd_opt(2026, 4, 30).unwrap(),
        );
        assert_eq!(fx.ledger.availability(&past, today).unwrap(), Availability::Past);

        let tight = publish(&fx.events, "evt-tight", AttendanceMode::Open, 1, future_date());
        assert_eq!(fx.ledger.availability(&tight, today).unwrap(), Availability::Open);
        fx.ledger.register(request(&tight.id, RegistrationIntent::Standard)).unwrap();
        assert_eq!(fx.ledger.availability(&tight, today).unwrap(), Availability::Full);

        let gated = publish(
            &fx.events,
            "evt-gated",
            AttendanceMode::Request,
            30,
            future_date(),
        );
        assert_eq!(
            fx.ledger.availability(&gated, today).unwrap(),
            Availability::RequestOnly
        );
    }
}
