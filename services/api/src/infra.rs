use chrono::NaiveDate;
use cpd_hub::workflows::cpd::assist::{AssistClient, AssistError};
use cpd_hub::workflows::cpd::events::{CpdEvent, EventId, EventStore, EventStoreError};
use cpd_hub::workflows::cpd::proposals::{
    CpdProposal, Notification, Notifier, NotifyError, ProposalDecision, ProposalId,
    ProposalRepository, ProposalStatus, ProposalStoreError, TriageRecord,
};
use cpd_hub::workflows::cpd::registrations::{
    ExportError, Registration, RegistrationStore, RegistrationStoreError, RosterExporter,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryProposalRepository {
    records: Arc<Mutex<ProposalRecords>>,
}

#[derive(Default)]
struct ProposalRecords {
    by_id: HashMap<ProposalId, CpdProposal>,
    order: Vec<ProposalId>,
}

impl ProposalRepository for InMemoryProposalRepository {
    fn insert(&self, proposal: CpdProposal) -> Result<CpdProposal, ProposalStoreError> {
        let mut guard = self.records.lock().expect("proposal mutex poisoned");
        if guard.by_id.contains_key(&proposal.id) {
            return Err(ProposalStoreError::Conflict);
        }
        guard.order.push(proposal.id.clone());
        guard.by_id.insert(proposal.id.clone(), proposal.clone());
        Ok(proposal)
    }

    fn fetch(&self, id: &ProposalId) -> Result<Option<CpdProposal>, ProposalStoreError> {
        let guard = self.records.lock().expect("proposal mutex poisoned");
        Ok(guard.by_id.get(id).cloned())
    }

    fn list(
        &self,
        status: Option<ProposalStatus>,
    ) -> Result<Vec<CpdProposal>, ProposalStoreError> {
        let guard = self.records.lock().expect("proposal mutex poisoned");
        Ok(guard
            .order
            .iter()
            .filter_map(|id| guard.by_id.get(id))
            .filter(|proposal| status.map_or(true, |s| proposal.status == s))
            .cloned()
            .collect())
    }

    // The pending check and the write happen under one lock, so a second
    // reviewer hitting the same proposal gets NotPending, never a
    // silent overwrite.
    fn decide(
        &self,
        id: &ProposalId,
        decision: ProposalDecision,
        triage: TriageRecord,
    ) -> Result<CpdProposal, ProposalStoreError> {
        let mut guard = self.records.lock().expect("proposal mutex poisoned");
        let proposal = guard.by_id.get_mut(id).ok_or(ProposalStoreError::NotFound)?;
        if proposal.status != ProposalStatus::Pending {
            return Err(ProposalStoreError::NotPending {
                current: proposal.status,
            });
        }
        proposal.status = decision.into_status();
        proposal.triage = Some(triage);
        Ok(proposal.clone())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryEventStore {
    events: Arc<Mutex<Vec<CpdEvent>>>,
}

impl EventStore for InMemoryEventStore {
    fn append(&self, event: CpdEvent) -> Result<CpdEvent, EventStoreError> {
        let mut guard = self.events.lock().expect("event mutex poisoned");
        if guard.iter().any(|existing| existing.id == event.id) {
            return Err(EventStoreError::Conflict);
        }
        guard.push(event.clone());
        Ok(event)
    }

    fn fetch(&self, id: &EventId) -> Result<Option<CpdEvent>, EventStoreError> {
        let guard = self.events.lock().expect("event mutex poisoned");
        Ok(guard.iter().find(|event| &event.id == id).cloned())
    }

    fn list(&self) -> Result<Vec<CpdEvent>, EventStoreError> {
        let guard = self.events.lock().expect("event mutex poisoned");
        Ok(guard.clone())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryRegistrationStore {
    entries: Arc<Mutex<Vec<Registration>>>,
}

impl RegistrationStore for InMemoryRegistrationStore {
    fn append(&self, registration: Registration) -> Result<Registration, RegistrationStoreError> {
        let mut guard = self.entries.lock().expect("registration mutex poisoned");
        if guard.iter().any(|existing| existing.id == registration.id) {
            return Err(RegistrationStoreError::Conflict);
        }
        guard.push(registration.clone());
        Ok(registration)
    }

    fn list_for(&self, event_id: &EventId) -> Result<Vec<Registration>, RegistrationStoreError> {
        let guard = self.entries.lock().expect("registration mutex poisoned");
        Ok(guard
            .iter()
            .filter(|entry| &entry.event_id == event_id)
            .cloned()
            .collect())
    }

    fn list(&self) -> Result<Vec<Registration>, RegistrationStoreError> {
        let guard = self.entries.lock().expect("registration mutex poisoned");
        Ok(guard.clone())
    }
}

/// Notifier that records deliveries and surfaces them in the log stream.
/// Stands in for the mail integration until one is wired up.
#[derive(Default, Clone)]
pub(crate) struct LoggingNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
}

impl Notifier for LoggingNotifier {
    fn notify(&self, notification: Notification) -> Result<(), NotifyError> {
        info!(
            recipient = %notification.recipient,
            subject = %notification.subject,
            "notification dispatched"
        );
        let mut guard = self.sent.lock().expect("notifier mutex poisoned");
        guard.push(notification);
        Ok(())
    }
}

impl LoggingNotifier {
    pub(crate) fn sent(&self) -> Vec<Notification> {
        self.sent.lock().expect("notifier mutex poisoned").clone()
    }
}

/// Roster exporter that writes the flattened roster line to the log
/// stream instead of a shared sheet.
#[derive(Default, Clone)]
pub(crate) struct LoggingRosterExporter;

impl RosterExporter for LoggingRosterExporter {
    fn export(&self, event: &CpdEvent, registration: &Registration) -> Result<(), ExportError> {
        info!(
            event = %event.title,
            date = %event.date,
            name = %registration.full_name,
            email = %registration.email,
            academy = %registration.academy,
            role = registration.role.label(),
            "roster entry exported"
        );
        Ok(())
    }
}

/// Offline stand-in for the hosted model: answers classification prompts
/// with a keyword heuristic so the advisory flow works without network
/// access or an API key.
#[derive(Default, Clone)]
pub(crate) struct HeuristicAssistClient;

impl AssistClient for HeuristicAssistClient {
    fn complete(&self, prompt: &str) -> Result<String, AssistError> {
        let lower = prompt.to_lowercase();
        let reply = if lower.contains("safeguard") || lower.contains("statutory") {
            "STATUTORY - safeguarding duties are a legal requirement for all staff."
        } else if lower.contains("induction") || lower.contains("policy") {
            "MANDATORY - trust policy requires completion by the named audience."
        } else if lower.contains("leader") || lower.contains("coaching") {
            "TRUST PRIORITY - supports the leadership development strategic goal."
        } else {
            "OPTIONAL - valuable general-interest development."
        };
        Ok(reply.to_string())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
