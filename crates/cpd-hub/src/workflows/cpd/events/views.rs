use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::directory::{AcademyDirectory, Region};

use super::super::classification::CpdStatus;
use super::super::domain::TRUST_PRIORITIES;
use super::super::registrations::domain::Registration;
use super::domain::{CpdEvent, EventId};

/// Optional narrowing applied to the report. `today` splits attendance
/// into attended and expected.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct DashboardFilters {
    #[serde(default)]
    pub region: Option<Region>,
    #[serde(default)]
    pub status: Option<CpdStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusProfileEntry {
    pub status: CpdStatus,
    pub status_label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegionDistributionEntry {
    pub region: Region,
    pub region_label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AudienceAnalysisEntry {
    pub audience: String,
    pub compliance: usize,
    pub development: usize,
    pub dev_ratio: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoverageEntry {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogisticsView {
    pub format_breakdown: Vec<CoverageEntry>,
    pub top_venues: Vec<CoverageEntry>,
    pub total_events: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AcademyAttendanceEntry {
    pub academy: &'static str,
    pub region: Region,
    pub attended: usize,
    pub expected: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CohortEventView {
    pub event_id: EventId,
    pub title: String,
    pub date: NaiveDate,
    pub attendance_label: &'static str,
    pub audience: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OverCapacityEntry {
    pub event_id: EventId,
    pub title: String,
    pub registrations: usize,
    pub capacity: u32,
}

/// Aggregated leadership view over the registry and ledger.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub live_events: usize,
    pub enrolments: usize,
    pub average_engagement: f32,
    pub status_profile: Vec<StatusProfileEntry>,
    pub region_distribution: Vec<RegionDistributionEntry>,
    pub audience_analysis: Vec<AudienceAnalysisEntry>,
    pub priority_coverage: Vec<CoverageEntry>,
    pub category_coverage: Vec<CoverageEntry>,
    pub logistics: LogisticsView,
    pub phase_breakdown: Vec<CoverageEntry>,
    pub academy_attendance: Vec<AcademyAttendanceEntry>,
    pub cohort_events: Vec<CohortEventView>,
    pub over_capacity: Vec<OverCapacityEntry>,
}

impl DashboardReport {
    /// Build the report from a snapshot of events and registrations.
    /// `today` is the reference date for attended-versus-expected splits.
    pub fn build(
        events: &[CpdEvent],
        registrations: &[Registration],
        directory: &AcademyDirectory,
        filters: &DashboardFilters,
        today: NaiveDate,
    ) -> Self {
        let live_events = events.len();
        let enrolments = registrations.len();
        let average_engagement = if live_events > 0 {
            enrolments as f32 / live_events as f32
        } else {
            0.0
        };

        DashboardReport {
            live_events,
            enrolments,
            average_engagement,
            status_profile: status_profile(events),
            region_distribution: region_distribution(registrations, directory),
            audience_analysis: audience_analysis(events),
            priority_coverage: priority_coverage(events),
            category_coverage: category_coverage(events),
            logistics: logistics(events),
            phase_breakdown: phase_breakdown(events),
            academy_attendance: academy_attendance(
                events,
                registrations,
                directory,
                filters,
                today,
            ),
            cohort_events: cohort_events(events),
            over_capacity: over_capacity(events, registrations),
        }
    }
}

/// Stage 1 outcomes in cascade order; empty buckets are dropped.
fn status_profile(events: &[CpdEvent]) -> Vec<StatusProfileEntry> {
    CpdStatus::ordered()
        .into_iter()
        .map(|status| StatusProfileEntry {
            status,
            status_label: status.label(),
            count: events.iter().filter(|e| e.final_status == status).count(),
        })
        .filter(|entry| entry.count > 0)
        .collect()
}

/// Where colleagues are signing up from. Every region appears even when
/// empty, busiest first.
fn region_distribution(
    registrations: &[Registration],
    directory: &AcademyDirectory,
) -> Vec<RegionDistributionEntry> {
    let mut counts: HashMap<Region, usize> = HashMap::new();
    for region in Region::ordered() {
        counts.insert(region, 0);
    }
    for registration in registrations {
        *counts
            .entry(directory.region_of(&registration.academy))
            .or_insert(0) += 1;
    }
    let mut entries: Vec<RegionDistributionEntry> = Region::ordered()
        .into_iter()
        .map(|region| RegionDistributionEntry {
            region,
            region_label: region.label(),
            count: counts[&region],
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}

/// Compliance (statutory or mandatory) against developmental training per
/// audience group, busiest group first.
fn audience_analysis(events: &[CpdEvent]) -> Vec<AudienceAnalysisEntry> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, (usize, usize)> = HashMap::new();
    for event in events {
        let audience = if event.audience.main.is_empty() {
            "Unknown".to_string()
        } else {
            event.audience.main.clone()
        };
        if !groups.contains_key(&audience) {
            order.push(audience.clone());
        }
        let bucket = groups.entry(audience).or_insert((0, 0));
        if event.final_status.is_compliance() {
            bucket.0 += 1;
        } else {
            bucket.1 += 1;
        }
    }
    let mut entries: Vec<AudienceAnalysisEntry> = order
        .into_iter()
        .map(|audience| {
            let (compliance, development) = groups[&audience];
            let total = compliance + development;
            AudienceAnalysisEntry {
                audience,
                compliance,
                development,
                dev_ratio: if total > 0 {
                    development as f32 / total as f32
                } else {
                    0.0
                },
            }
        })
        .collect();
    entries.sort_by(|a, b| (b.compliance + b.development).cmp(&(a.compliance + a.development)));
    entries
}

/// Events supporting each strategic priority. All eight priorities are
/// pre-seeded so gaps show as zeros.
fn priority_coverage(events: &[CpdEvent]) -> Vec<CoverageEntry> {
    let mut entries: Vec<CoverageEntry> = TRUST_PRIORITIES
        .iter()
        .map(|priority| CoverageEntry {
            name: (*priority).to_string(),
            count: events
                .iter()
                .filter(|e| e.trust_priorities.iter().any(|p| p == priority))
                .count(),
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}

fn category_coverage(events: &[CpdEvent]) -> Vec<CoverageEntry> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for event in events {
        if !counts.contains_key(&event.category) {
            order.push(event.category.clone());
        }
        *counts.entry(event.category.clone()).or_insert(0) += 1;
    }
    let mut entries: Vec<CoverageEntry> = order
        .into_iter()
        .map(|name| {
            let count = counts[&name];
            CoverageEntry { name, count }
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}

/// Delivery breakdown keyed on the sub-format where one was given, and
/// the five busiest venues.
fn logistics(events: &[CpdEvent]) -> LogisticsView {
    let mut format_order: Vec<String> = Vec::new();
    let mut format_counts: HashMap<String, usize> = HashMap::new();
    let mut venue_counts: HashMap<String, usize> = HashMap::new();
    for event in events {
        let key = event
            .sub_format
            .clone()
            .unwrap_or_else(|| event.format.label().to_string());
        if !format_counts.contains_key(&key) {
            format_order.push(key.clone());
        }
        *format_counts.entry(key).or_insert(0) += 1;

        if !event.venue.is_empty() {
            *venue_counts.entry(event.venue.clone()).or_insert(0) += 1;
        }
    }

    let format_breakdown = format_order
        .into_iter()
        .map(|name| {
            let count = format_counts[&name];
            CoverageEntry { name, count }
        })
        .collect();

    let mut top_venues: Vec<CoverageEntry> = venue_counts
        .into_iter()
        .map(|(name, count)| CoverageEntry { name, count })
        .collect();
    top_venues.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    top_venues.truncate(5);

    LogisticsView {
        format_breakdown,
        top_venues,
        total_events: events.len(),
    }
}

fn phase_breakdown(events: &[CpdEvent]) -> Vec<CoverageEntry> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for event in events {
        let phase = event
            .audience
            .phase
            .clone()
            .unwrap_or_else(|| "Unspecified".to_string());
        if !counts.contains_key(&phase) {
            order.push(phase.clone());
        }
        *counts.entry(phase).or_insert(0) += 1;
    }
    order
        .into_iter()
        .map(|name| {
            let count = counts[&name];
            CoverageEntry { name, count }
        })
        .collect()
}

/// Attended (past) and expected (future) registrations per academy. The
/// status filter narrows which events count; the region filter narrows
/// which academies are listed.
fn academy_attendance(
    events: &[CpdEvent],
    registrations: &[Registration],
    directory: &AcademyDirectory,
    filters: &DashboardFilters,
    today: NaiveDate,
) -> Vec<AcademyAttendanceEntry> {
    let counted: HashMap<&EventId, &CpdEvent> = events
        .iter()
        .filter(|e| filters.status.map_or(true, |s| e.final_status == s))
        .map(|e| (&e.id, e))
        .collect();

    let mut entries: Vec<AcademyAttendanceEntry> = directory
        .academies()
        .iter()
        .filter(|academy| filters.region.map_or(true, |r| academy.region == r))
        .map(|academy| {
            let mut attended = 0;
            let mut expected = 0;
            for registration in registrations {
                if registration.academy != academy.name {
                    continue;
                }
                let Some(event) = counted.get(&registration.event_id) else {
                    continue;
                };
                if event.date < today {
                    attended += 1;
                } else {
                    expected += 1;
                }
            }
            AcademyAttendanceEntry {
                academy: academy.name,
                region: academy.region,
                attended,
                expected,
                total: attended + expected,
            }
        })
        .collect();
    entries.sort_by(|a, b| b.total.cmp(&a.total));
    entries
}

/// Fixed or invited attendee bases, e.g. NPQ cohorts and network leads.
fn cohort_events(events: &[CpdEvent]) -> Vec<CohortEventView> {
    events
        .iter()
        .filter(|e| e.attendance.is_cohort())
        .map(|e| CohortEventView {
            event_id: e.id.clone(),
            title: e.title.clone(),
            date: e.date,
            attendance_label: e.attendance.label(),
            audience: match &e.audience.sub {
                Some(sub) => format!("{} ({sub})", e.audience.main),
                None => e.audience.main.clone(),
            },
        })
        .collect()
}

/// Events whose ledger has outgrown their capacity. Registration does not
/// block at capacity, so this is where the excess surfaces for manual
/// reconciliation.
fn over_capacity(events: &[CpdEvent], registrations: &[Registration]) -> Vec<OverCapacityEntry> {
    events
        .iter()
        .filter_map(|event| {
            let count = registrations
                .iter()
                .filter(|r| r.event_id == event.id)
                .count();
            (count > event.capacity as usize).then(|| OverCapacityEntry {
                event_id: event.id.clone(),
                title: event.title.clone(),
                registrations: count,
                capacity: event.capacity,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::super::super::domain::{AttendanceMode, EventFormat, RoleCategory};
    use super::super::super::registrations::domain::{RegistrationId, RegistrationStatus};
    use super::super::domain::EventDraft;
    use super::*;

    fn event(id: &str, title: &str, date: NaiveDate) -> EventDraft {
        let mut draft = EventDraft::default();
        draft.title = Some(title.to_string());
        draft.date = Some(date);
        draft.audience_main = Some("Teachers".to_string());
        draft.format = Some(EventFormat::OnlineLive);
        draft.category = Some("Teaching, Learning and Assessment".to_string());
        let _ = id;
        draft
    }

    fn published(id: &str, title: &str, date: NaiveDate, f: impl FnOnce(&mut EventDraft)) -> CpdEvent {
        let mut draft = event(id, title, date);
        f(&mut draft);
        draft
            .build(EventId(id.to_string()), Utc::now())
            .expect("complete draft builds")
    }

    fn registration(event_id: &str, academy: &str) -> Registration {
        Registration {
            id: RegistrationId(format!("reg-{event_id}-{academy}")),
            event_id: EventId(event_id.to_string()),
            full_name: "A Colleague".to_string(),
            email: "a.colleague@coopacademies.co.uk".to_string(),
            academy: academy.to_string(),
            role: RoleCategory::Teacher,
            accessibility_needs: None,
            dietary_requirements: None,
            status: RegistrationStatus::Registered,
            registered_at: Utc::now(),
        }
    }

    fn june(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, day).unwrap()
    }

    #[test]
    fn status_profile_drops_empty_buckets_and_keeps_cascade_order() {
        let events = vec![
            published("e1", "Safeguarding", june(1), |d| {
                d.flags.set_statutory(true);
            }),
            published("e2", "Coaching", june(2), |_| {}),
            published("e3", "More Coaching", june(3), |_| {}),
        ];
        let profile = status_profile(&events);
        assert_eq!(profile.len(), 2);
        assert_eq!(profile[0].status, CpdStatus::Statutory);
        assert_eq!(profile[0].count, 1);
        assert_eq!(profile[1].status, CpdStatus::Optional);
        assert_eq!(profile[1].count, 2);
    }

    #[test]
    fn region_distribution_buckets_unknown_academies_trust_wide() {
        let registrations = vec![
            registration("e1", "Co-op Academy Leeds"),
            registration("e1", "Co-op Academy Grange"),
            registration("e1", "Trust Wide"),
        ];
        let distribution = region_distribution(&registrations, &AcademyDirectory);
        assert_eq!(distribution.len(), 5);
        assert_eq!(distribution[0].region, Region::WestYorkshire);
        assert_eq!(distribution[0].count, 2);
        let trust_wide = distribution
            .iter()
            .find(|d| d.region == Region::TrustWide)
            .unwrap();
        assert_eq!(trust_wide.count, 1);
    }

    #[test]
    fn audience_analysis_reports_dev_ratio() {
        let events = vec![
            published("e1", "Safeguarding", june(1), |d| {
                d.flags.set_statutory(true);
            }),
            published("e2", "Coaching", june(2), |_| {}),
        ];
        let analysis = audience_analysis(&events);
        assert_eq!(analysis.len(), 1);
        assert_eq!(analysis[0].compliance, 1);
        assert_eq!(analysis[0].development, 1);
        assert!((analysis[0].dev_ratio - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn priority_coverage_seeds_every_priority() {
        let events = vec![published("e1", "Coaching", june(1), |d| {
            d.trust_priorities = vec![TRUST_PRIORITIES[0].to_string()];
        })];
        let coverage = priority_coverage(&events);
        assert_eq!(coverage.len(), TRUST_PRIORITIES.len());
        assert_eq!(coverage[0].name, TRUST_PRIORITIES[0]);
        assert_eq!(coverage[0].count, 1);
        assert!(coverage[1..].iter().all(|c| c.count == 0));
    }

    #[test]
    fn logistics_falls_back_to_the_main_format_and_caps_venues_at_five() {
        let mut events = vec![published("e1", "Coaching", june(1), |d| {
            d.sub_format = Some("Webinar".to_string());
            d.venue = Some("Angel Square".to_string());
        })];
        for i in 0..6u32 {
            events.push(published(&format!("v{i}"), "Session", june(2), |d| {
                d.venue = Some(format!("Venue {i}"));
            }));
        }
        let view = logistics(&events);
        assert!(view.format_breakdown.iter().any(|f| f.name == "Webinar"));
        assert!(view
            .format_breakdown
            .iter()
            .any(|f| f.name == EventFormat::OnlineLive.label()));
        assert_eq!(view.top_venues.len(), 5);
        assert_eq!(view.total_events, 7);
    }

    #[test]
    fn academy_attendance_splits_on_today_and_honours_filters() {
        let events = vec![
            published("past", "Past Session", june(1), |d| {
                d.flags.set_statutory(true);
            }),
            published("future", "Future Session", june(20), |_| {}),
        ];
        let registrations = vec![
            registration("past", "Co-op Academy Leeds"),
            registration("future", "Co-op Academy Leeds"),
            registration("future", "Co-op Academy Stoke"),
        ];
        let today = june(10);

        let unfiltered = academy_attendance(
            &events,
            &registrations,
            &AcademyDirectory,
            &DashboardFilters::default(),
            today,
        );
        let leeds = unfiltered
            .iter()
            .find(|a| a.academy == "Co-op Academy Leeds")
            .unwrap();
        assert_eq!((leeds.attended, leeds.expected), (1, 1));

        let statutory_only = academy_attendance(
            &events,
            &registrations,
            &AcademyDirectory,
            &DashboardFilters {
                status: Some(CpdStatus::Statutory),
                region: None,
            },
            today,
        );
        let leeds = statutory_only
            .iter()
            .find(|a| a.academy == "Co-op Academy Leeds")
            .unwrap();
        assert_eq!((leeds.attended, leeds.expected), (1, 0));

        let west_yorkshire = academy_attendance(
            &events,
            &registrations,
            &AcademyDirectory,
            &DashboardFilters {
                status: None,
                region: Some(Region::WestYorkshire),
            },
            today,
        );
        assert!(west_yorkshire
            .iter()
            .all(|a| a.region == Region::WestYorkshire));
    }

    #[test]
    fn over_capacity_lists_only_events_past_their_limit() {
        let events = vec![
            published("tight", "Tight Session", june(20), |d| {
                d.capacity = Some(1);
            }),
            published("roomy", "Roomy Session", june(21), |_| {}),
        ];
        let registrations = vec![
            registration("tight", "Co-op Academy Leeds"),
            registration("tight", "Co-op Academy Stoke"),
            registration("roomy", "Co-op Academy Leeds"),
        ];
        let excess = over_capacity(&events, &registrations);
        assert_eq!(excess.len(), 1);
        assert_eq!(excess[0].event_id, EventId("tight".to_string()));
        assert_eq!(excess[0].registrations, 2);
        assert_eq!(excess[0].capacity, 1);
    }

    #[test]
    fn cohort_view_covers_defined_invite_and_programme() {
        let events = vec![
            published("open", "Open Session", june(1), |_| {}),
            published("npq", "NPQ Cohort", june(2), |d| {
                d.attendance = Some(AttendanceMode::Programme);
                d.audience_sub = Some("NPQ Leading Teaching".to_string());
            }),
        ];
        let cohorts = cohort_events(&events);
        assert_eq!(cohorts.len(), 1);
        assert_eq!(cohorts[0].title, "NPQ Cohort");
        assert_eq!(cohorts[0].audience, "Teachers (NPQ Leading Teaching)");
    }
}
