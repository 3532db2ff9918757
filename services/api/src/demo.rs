use crate::infra::{
    HeuristicAssistClient, InMemoryEventStore, InMemoryProposalRepository,
    InMemoryRegistrationStore, LoggingNotifier, LoggingRosterExporter,
};
use chrono::{Local, NaiveDate, NaiveTime};
use clap::Args;
use cpd_hub::directory::{AcademyDirectory, FacilitatorAllowlist};
use cpd_hub::workflows::cpd::assist::StatusAdvisor;
use cpd_hub::error::AppError;
use cpd_hub::workflows::cpd::classification::CpdStatus;
use cpd_hub::workflows::cpd::domain::{
    Actor, AttendanceMode, EventFormat, Facilitator, Role, RoleCategory,
};
use cpd_hub::workflows::cpd::events::{
    DashboardFilters, DashboardReport, EventDraft, EventId, EventRegistry, EventStore,
};
use cpd_hub::workflows::cpd::proposals::{
    ProposalAudience, ProposalDecision, ProposalService, ProposalSubmission, RoughFormat,
    Submitter, TriageScores,
};
use cpd_hub::workflows::cpd::registrations::{
    RegistrationIntent, RegistrationLedger, RegistrationRequest, RegistrationStore,
};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the reporting date (defaults to today).
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    let proposal_repository = Arc::new(InMemoryProposalRepository::default());
    let notifier = Arc::new(LoggingNotifier::default());
    let event_store = Arc::new(InMemoryEventStore::default());
    let registration_store = Arc::new(InMemoryRegistrationStore::default());

    let proposals = Arc::new(ProposalService::new(
        proposal_repository,
        notifier.clone(),
    ));
    let registry = Arc::new(EventRegistry::new(event_store.clone()));
    let ledger = Arc::new(RegistrationLedger::new(
        event_store.clone(),
        registration_store.clone(),
        Arc::new(LoggingRosterExporter),
    ));

    println!("CPD hub demo (evaluated {today})");

    println!("\nSeeding the published catalog");
    let seeded = seed_catalog(&registry)?;
    for event in &seeded {
        println!(
            "- {} [{}] {} @ {} on {}",
            event.id.0,
            event.final_status.label(),
            event.title,
            event.venue,
            event.date
        );
    }
    seed_registrations(&ledger, &seeded)?;

    println!("\nFacilitator access");
    let register = "\
regular.facilitator@coopacademies.co.uk,Regular Facilitator,Co-op Academy Manchester
science.lead@coop.co.uk,Science Lead,Co-op Academy Leeds
";
    let mut allowlist = FacilitatorAllowlist::default();
    let added = allowlist.ingest(register.as_bytes())?;
    println!("- Allowlist loaded ({added} entries)");

    let facilitator = Actor {
        name: "Regular Facilitator".to_string(),
        email: "regular.facilitator@coopacademies.co.uk".to_string(),
        role: Role::Facilitator,
        academy: Some("Co-op Academy Manchester".to_string()),
    };
    if !allowlist.contains(&facilitator.email) {
        println!("- {} is not on the facilitator allowlist, stopping", facilitator.name);
        return Ok(());
    }
    println!(
        "- {} signed in as {} (tabs: {})",
        facilitator.name,
        facilitator.role.label(),
        facilitator.role.default_capabilities().join(", ")
    );

    println!("\nStage 1: Proposal of Intent");
    let submission = ProposalSubmission {
        submitted_by: Submitter {
            name: facilitator.name.clone(),
            email: facilitator.email.clone(),
            role: "Facilitator".to_string(),
            academy: "Co-op Academy Manchester".to_string(),
        },
        title: "Middle Leader Coaching".to_string(),
        category: "Leadership and Professional Practice".to_string(),
        description: "A 3-part series on coaching conversations for new middle leaders."
            .to_string(),
        learning_objectives: "Effective feedback, GROW model, holding to account.".to_string(),
        target_audience: ProposalAudience {
            phase: "Secondary".to_string(),
            roles: "Middle Leaders".to_string(),
        },
        proposed_status: CpdStatus::Priority,
        intended_impact: "Better line management conversations.".to_string(),
        rough_format: RoughFormat {
            kind: "In-Person".to_string(),
            duration: "3 x 2hrs".to_string(),
            expected_numbers: "Medium (21-60)".to_string(),
        },
        date_window: "Autumn Term".to_string(),
        additional_notes: String::new(),
    };
    let proposal = proposals.submit(submission)?;
    println!(
        "- Received {} -> status {}",
        proposal.id.0,
        proposal.status.label()
    );

    let advisor = StatusAdvisor::new(Arc::new(HeuristicAssistClient));
    match advisor.suggest_status(
        &proposal.title,
        &proposal.description,
        &proposal.target_audience.roles,
    ) {
        Ok(suggestion) => {
            println!(
                "- Advisory classification: {} ({})",
                suggestion
                    .suggested
                    .map(|status| status.label())
                    .unwrap_or("no suggestion"),
                suggestion.rationale
            );
        }
        Err(err) => println!("- Advisory classification unavailable: {err}"),
    }

    let scores = TriageScores {
        strategic_alignment: 3,
        status_justification: 3,
        clarity: 2,
        audience: 3,
        added_value: 3,
        feasibility: 2,
        impact: 3,
    };
    println!(
        "- Rubric total {}/21, suggested action: {}",
        scores.total(),
        scores.suggested_action().label()
    );
    let decided = proposals.triage(
        &proposal.id,
        ProposalDecision::Approved,
        scores,
        "Strong fit with the leadership pipeline priority.".to_string(),
        CpdStatus::Priority,
    )?;
    println!(
        "- Triaged as {} ({})",
        decided.status.label(),
        decided
            .triage
            .as_ref()
            .map(|record| record.confirmed_status.label())
            .unwrap_or("unclassified")
    );

    println!("\nStage 2: completing the event draft");
    let mut draft: EventDraft = proposals.event_template(&decided.id)?;
    draft.format = Some(EventFormat::InPerson);
    draft.sub_format = Some("Workshop".to_string());
    draft.date = NaiveDate::from_ymd_opt(2026, 10, 6);
    draft.start_time = NaiveTime::from_hms_opt(13, 0, 0);
    draft.end_time = NaiveTime::from_hms_opt(15, 0, 0);
    draft.venue = Some("Co-op Academy Manchester".to_string());
    draft.capacity = Some(40);
    draft.trust_priorities =
        vec!["Leadership development and talent pipeline".to_string()];
    draft.facilitators = vec![Facilitator {
        name: "Regular Facilitator".to_string(),
        email: "regular.facilitator@coopacademies.co.uk".to_string(),
    }];
    let published = registry.publish(draft)?;
    println!(
        "- Published {} [{}] {}",
        published.id.0,
        published.final_status.label(),
        published.title
    );

    println!("\nParticipant registration");
    let entry = ledger.register(RegistrationRequest {
        event_id: published.id.clone(),
        full_name: "Priya Patel".to_string(),
        email: "priya.patel@coopacademies.co.uk".to_string(),
        academy: "Co-op Academy Leeds".to_string(),
        role: RoleCategory::MiddleLeader,
        accessibility_needs: None,
        dietary_requirements: Some("Vegetarian".to_string()),
        intent: RegistrationIntent::Standard,
    })?;
    println!("- {} -> {}", entry.full_name, entry.status.label());
    let occupancy = ledger.occupancy(&published.id, today)?;
    println!(
        "- Occupancy {}/{} ({:?})",
        occupancy.count, occupancy.capacity, occupancy.state
    );

    println!("\nNotifications dispatched");
    for notification in notifier.sent() {
        println!("- {} <- {}", notification.recipient, notification.subject);
    }

    let events = event_store.list()?;
    let registrations = registration_store.list()?;
    let report = DashboardReport::build(
        &events,
        &registrations,
        &AcademyDirectory,
        &DashboardFilters::default(),
        today,
    );
    render_dashboard(&report);

    Ok(())
}

fn seed_catalog(
    registry: &EventRegistry<InMemoryEventStore>,
) -> Result<Vec<cpd_hub::workflows::cpd::events::CpdEvent>, AppError> {
    let mut published = Vec::new();

    let mut safeguarding = EventDraft::default();
    safeguarding.title = Some("Annual Safeguarding Update 2026".to_string());
    safeguarding.description =
        Some("Essential safeguarding updates aligned to KCSIE 2024. Required for all staff.".to_string());
    safeguarding.learning_outcomes = Some("Understand new KCSIE updates".to_string());
    safeguarding.category = Some("Safeguarding and Pupil Wellbeing".to_string());
    safeguarding.flags.set_statutory(true);
    safeguarding.trust_priorities = vec!["Safeguarding and pupil wellbeing".to_string()];
    safeguarding.audience_main = Some("Whole-staff / mixed roles".to_string());
    safeguarding.format = Some(EventFormat::OnlineLive);
    safeguarding.sub_format = Some("Conference / large event".to_string());
    safeguarding.venue = Some("Co-op Academy Manchester".to_string());
    safeguarding.date = NaiveDate::from_ymd_opt(2026, 6, 12);
    safeguarding.start_time = NaiveTime::from_hms_opt(9, 0, 0);
    safeguarding.end_time = NaiveTime::from_hms_opt(12, 0, 0);
    safeguarding.capacity = Some(100);
    safeguarding.facilitators = vec![Facilitator {
        name: "Trust Safeguarding Lead".to_string(),
        email: "safeguarding@coop.co.uk".to_string(),
    }];
    published.push(registry.publish(safeguarding)?);

    let mut phonics = EventDraft::default();
    phonics.title = Some("Phonics Rollout: Phase 2".to_string());
    phonics.description =
        Some("Specialist training for Primary staff on the new trust-wide phonics approach.".to_string());
    phonics.learning_outcomes = Some("Apply Phase 2 phonics".to_string());
    phonics.category = Some("Primary and EYFS Networks".to_string());
    phonics.flags.set_mandatory(true);
    phonics.trust_priorities = vec!["Raising attainment and curriculum excellence".to_string()];
    phonics.audience_main = Some("Teachers".to_string());
    phonics.audience_sub = Some("Classroom teachers".to_string());
    phonics.audience_phase = Some("Primary".to_string());
    phonics.audience_region = Some("West Yorkshire".to_string());
    phonics.format = Some(EventFormat::InPerson);
    phonics.sub_format = Some("Network meeting".to_string());
    phonics.venue = Some("West Yorkshire Hub".to_string());
    phonics.date = NaiveDate::from_ymd_opt(2026, 3, 15);
    phonics.start_time = NaiveTime::from_hms_opt(13, 0, 0);
    phonics.end_time = NaiveTime::from_hms_opt(15, 30, 0);
    published.push(registry.publish(phonics)?);

    let mut moderation = EventDraft::default();
    moderation.title = Some("Secondary Science Moderation: Biology".to_string());
    moderation.description = Some(
        "Cross-trust moderation of Year 11 Biology mock exams to ensure consistency in marking and feedback."
            .to_string(),
    );
    moderation.learning_outcomes = Some("Accurate assessment of student work".to_string());
    moderation.category = Some("Curriculum and Subject Networks".to_string());
    moderation.flags.set_priority(true);
    moderation.trust_priorities = vec!["Raising attainment and curriculum excellence".to_string()];
    moderation.audience_main = Some("Teachers".to_string());
    moderation.audience_sub = Some("Classroom teachers".to_string());
    moderation.audience_phase = Some("Secondary".to_string());
    moderation.format = Some(EventFormat::InPerson);
    moderation.sub_format = Some("Network meeting".to_string());
    moderation.venue = Some("Co-op Academy Leeds".to_string());
    moderation.date = NaiveDate::from_ymd_opt(2026, 4, 22);
    moderation.capacity = Some(40);
    moderation.attendance = Some(AttendanceMode::Defined);
    published.push(registry.publish(moderation)?);

    let mut induction = EventDraft::default();
    induction.title = Some("New Staff Culture Induction".to_string());
    induction.description = Some(
        "Welcome event for all new colleagues joining the Trust, covering our values, history, and strategic plan."
            .to_string(),
    );
    induction.learning_outcomes = Some("Align with Trust values and vision".to_string());
    induction.category = Some("Culture, Values, and Engagement".to_string());
    induction.flags.set_mandatory(true);
    induction.flags.set_priority(true);
    induction.trust_priorities =
        vec!["Trust culture, identity and community engagement".to_string()];
    induction.audience_main = Some("All Staff".to_string());
    induction.format = Some(EventFormat::OnlineLive);
    induction.sub_format = Some("Conference / large event".to_string());
    induction.venue = Some("Online (Google Meet)".to_string());
    induction.date = NaiveDate::from_ymd_opt(2026, 9, 15);
    induction.capacity = Some(500);
    published.push(registry.publish(induction)?);

    Ok(published)
}

fn seed_registrations(
    ledger: &RegistrationLedger<InMemoryEventStore, InMemoryRegistrationStore, LoggingRosterExporter>,
    seeded: &[cpd_hub::workflows::cpd::events::CpdEvent],
) -> Result<(), AppError> {
    let colleagues: [(&str, &str, &str, RoleCategory, &EventId); 3] = [
        (
            "Jane Doe",
            "jane.doe@coop.co.uk",
            "Co-op Academy Manchester",
            RoleCategory::Teacher,
            &seeded[1].id,
        ),
        (
            "John Smith",
            "john.smith@coop.co.uk",
            "Co-op Academy Leeds",
            RoleCategory::Teacher,
            &seeded[2].id,
        ),
        (
            "Sarah Connor",
            "sarah.connor@coop.co.uk",
            "Co-op Academy Belle Vue",
            RoleCategory::SupportStaff,
            &seeded[0].id,
        ),
    ];

    for (name, email, academy, role, event_id) in colleagues {
        ledger.register(RegistrationRequest {
            event_id: event_id.clone(),
            full_name: name.to_string(),
            email: email.to_string(),
            academy: academy.to_string(),
            role,
            accessibility_needs: None,
            dietary_requirements: None,
            intent: RegistrationIntent::Standard,
        })?;
    }
    Ok(())
}

fn render_dashboard(report: &DashboardReport) {
    println!("\nLeadership dashboard");
    println!(
        "- {} live events | {} enrolments | {:.1} avg engagement",
        report.live_events, report.enrolments, report.average_engagement
    );

    println!("Classification profile:");
    for entry in &report.status_profile {
        println!("  - {}: {}", entry.status_label, entry.count);
    }

    println!("Regional distribution:");
    for entry in &report.region_distribution {
        println!("  - {}: {}", entry.region_label, entry.count);
    }

    println!("Strategic priority coverage:");
    for entry in report.priority_coverage.iter().filter(|e| e.count > 0) {
        println!("  - {}: {}", entry.name, entry.count);
    }

    if !report.cohort_events.is_empty() {
        println!("Cohort and programme groups:");
        for cohort in &report.cohort_events {
            println!(
                "  - {} ({}, {})",
                cohort.title, cohort.attendance_label, cohort.audience
            );
        }
    }

    if report.over_capacity.is_empty() {
        println!("Over-capacity events: none");
    } else {
        println!("Over-capacity events:");
        for entry in &report.over_capacity {
            println!(
                "  - {} ({}/{})",
                entry.title, entry.registrations, entry.capacity
            );
        }
    }
}
