use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use super::super::classification::CpdStatus;
use super::super::domain::EventFormat;
use super::domain::{CpdEvent, EventDraft, EventId, EventValidationError};

static EVENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_event_id() -> EventId {
    let id = EVENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    EventId(format!("evt-{id:06}"))
}

/// Append-only persistence seam for published events. Implementations
/// must preserve insertion order in `list` and never mutate or remove a
/// stored event.
pub trait EventStore: Send + Sync {
    fn append(&self, event: CpdEvent) -> Result<CpdEvent, EventStoreError>;
    fn fetch(&self, id: &EventId) -> Result<Option<CpdEvent>, EventStoreError>;
    fn list(&self) -> Result<Vec<CpdEvent>, EventStoreError>;
}

/// Error raised by an event store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventStoreError {
    #[error("an event with this identifier already exists")]
    Conflict,
    #[error("event store unavailable: {0}")]
    Unavailable(String),
}

/// Catalog filter. All populated criteria must match (conjunction);
/// string comparisons are exact.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventQuery {
    #[serde(default)]
    pub status: Option<CpdStatus>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub audience_main: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub format: Option<EventFormat>,
    #[serde(default)]
    pub sub_format: Option<String>,
    #[serde(default)]
    pub phase: Option<String>,
    #[serde(default)]
    pub sort: EventSort,
}

impl EventQuery {
    fn matches(&self, event: &CpdEvent) -> bool {
        if let Some(status) = self.status {
            if event.final_status != status {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if &event.category != category {
                return false;
            }
        }
        if let Some(main) = &self.audience_main {
            if &event.audience.main != main {
                return false;
            }
        }
        if let Some(priority) = &self.priority {
            if !event.trust_priorities.iter().any(|p| p == priority) {
                return false;
            }
        }
        if let Some(format) = self.format {
            if event.format != format {
                return false;
            }
        }
        if let Some(sub_format) = &self.sub_format {
            if event.sub_format.as_deref() != Some(sub_format.as_str()) {
                return false;
            }
        }
        if let Some(phase) = &self.phase {
            if event.audience.phase.as_deref() != Some(phase.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Catalog ordering. Ties keep insertion order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSort {
    #[default]
    TitleAscending,
    /// Most recently published first, regardless of when the event is
    /// scheduled to run.
    NewestFirst,
}

/// Service fronting the event registry: publication of completed drafts
/// and catalog queries.
pub struct EventRegistry<S> {
    store: Arc<S>,
}

impl<S> EventRegistry<S>
where
    S: EventStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Finalize a Stage 2 draft and append it to the registry. The id and
    /// creation timestamp are assigned here, never by the caller.
    pub fn publish(&self, draft: EventDraft) -> Result<CpdEvent, EventRegistryError> {
        let event = draft.build(next_event_id(), Utc::now())?;
        let stored = self.store.append(event)?;
        info!(
            event_id = %stored.id.0,
            status = stored.final_status.label(),
            "event published"
        );
        Ok(stored)
    }

    pub fn get(&self, id: &EventId) -> Result<CpdEvent, EventRegistryError> {
        self.store
            .fetch(id)?
            .ok_or(EventRegistryError::NotFound)
    }

    /// Filtered, sorted catalog view. Filters are conjunctive; sorting is
    /// stable so ties fall back to insertion order.
    pub fn list(&self, query: &EventQuery) -> Result<Vec<CpdEvent>, EventRegistryError> {
        let mut events: Vec<CpdEvent> = self
            .store
            .list()?
            .into_iter()
            .filter(|event| query.matches(event))
            .collect();
        match query.sort {
            EventSort::TitleAscending => {
                events.sort_by(|a, b| a.title.cmp(&b.title));
            }
            EventSort::NewestFirst => {
                events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            }
        }
        Ok(events)
    }
}

/// Error raised by the registry service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventRegistryError {
    #[error("event not found")]
    NotFound,
    #[error(transparent)]
    Validation(#[from] EventValidationError),
    #[error(transparent)]
    Store(#[from] EventStoreError),
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::NaiveDate;

    use super::super::super::domain::EventFormat;
    use super::*;

    #[derive(Default)]
    struct VecStore {
        events: Mutex<Vec<CpdEvent>>,
    }

    impl EventStore for VecStore {
        fn append(&self, event: CpdEvent) -> Result<CpdEvent, EventStoreError> {
            let mut events = self.events.lock().unwrap();
            if events.iter().any(|e| e.id == event.id) {
                return Err(EventStoreError::Conflict);
            }
            events.push(event.clone());
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

    fn draft(title: &str, day: u32) -> EventDraft {
        let mut draft = EventDraft::default();
        draft.title = Some(title.to_string());
        draft.date = NaiveDate::from_ymd_opt(2026, 9, day);
        draft.audience_main = Some("Teachers".to_string());
        draft.format = Some(EventFormat::InPerson);
        draft
    }

    fn registry() -> EventRegistry<VecStore> {
        EventRegistry::new(Arc::new(VecStore::default()))
    }

    #[test]
    fn published_events_get_unique_ids_and_are_readable_back() {
        let registry = registry();
        let first = registry.publish(draft("Phonics Network", 1)).unwrap();
        let second = registry.publish(draft("Behaviour Curve", 2)).unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(registry.get(&first.id).unwrap(), first);
    }

    #[test]
    fn incomplete_draft_is_rejected_and_nothing_is_stored() {
        let registry = registry();
        let err = registry
            .publish(EventDraft::default())
            .expect_err("incomplete draft must be rejected");
        assert!(matches!(err, EventRegistryError::Validation(_)));
        assert!(registry.list(&EventQuery::default()).unwrap().is_empty());
    }

    #[test]
    fn default_sort_is_title_ascending() {
        let registry = registry();
        registry.publish(draft("Zoning for EYFS", 1)).unwrap();
        registry.publish(draft("Adaptive Teaching", 2)).unwrap();
        let titles: Vec<String> = registry
            .list(&EventQuery::default())
            .unwrap()
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, vec!["Adaptive Teaching", "Zoning for EYFS"]);
    }

    #[test]
    fn newest_first_orders_by_publication_not_schedule() {
        let store = Arc::new(VecStore::default());
        let registry = EventRegistry::new(store.clone());

        // The later-published event carries the earlier scheduled date.
        let first_published = Utc::now();
        let second_published = first_published + chrono::Duration::minutes(5);
        store
            .append(
                draft("Scheduled Late", 20)
                    .build(EventId("evt-older".to_string()), first_published)
                    .unwrap(),
            )
            .unwrap();
        store
            .append(
                draft("Scheduled Early", 1)
                    .build(EventId("evt-newer".to_string()), second_published)
                    .unwrap(),
            )
            .unwrap();

        let query = EventQuery {
            sort: EventSort::NewestFirst,
            ..EventQuery::default()
        };
        let titles: Vec<String> = registry
            .list(&query)
            .unwrap()
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, vec!["Scheduled Early", "Scheduled Late"]);
    }

    #[test]
    fn filters_are_conjunctive() {
        let registry = registry();
        let mut a = draft("SEND Clinic", 1);
        a.category = Some("SEND and Inclusion".to_string());
        a.flags.set_mandatory(true);
        registry.publish(a).unwrap();

        let mut b = draft("SEND Briefing", 2);
        b.category = Some("SEND and Inclusion".to_string());
        registry.publish(b).unwrap();

        let query = EventQuery {
            category: Some("SEND and Inclusion".to_string()),
            status: Some(CpdStatus::Mandatory),
            ..EventQuery::default()
        };
        let matches = registry.list(&query).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].title, "SEND Clinic");
    }
}
