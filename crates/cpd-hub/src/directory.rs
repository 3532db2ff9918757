//! Static Trust directory data: academies, their regions, and the
//! facilitator allowlist ingested from bulk CSV uploads.

use std::collections::BTreeSet;
use std::io::Read;
use std::sync::{Arc, RwLock};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

/// Geographic grouping used for dashboard rollups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    GreaterManchester,
    WestYorkshire,
    StokeStaffordshire,
    Merseyside,
    TrustWide,
}

impl Region {
    pub const fn label(self) -> &'static str {
        match self {
            Region::GreaterManchester => "Greater Manchester",
            Region::WestYorkshire => "West Yorkshire",
            Region::StokeStaffordshire => "Stoke & Staffordshire",
            Region::Merseyside => "Merseyside",
            Region::TrustWide => "Trust Wide",
        }
    }

    pub const fn ordered() -> [Region; 5] {
        [
            Region::GreaterManchester,
            Region::WestYorkshire,
            Region::StokeStaffordshire,
            Region::Merseyside,
            Region::TrustWide,
        ]
    }
}

/// One academy in the Trust estate.
#[derive(Debug, Clone, Copy)]
pub struct Academy {
    pub name: &'static str,
    pub region: Region,
}

const ACADEMIES: &[Academy] = &[
    Academy { name: "Co-op Academy Belle Vue", region: Region::GreaterManchester },
    Academy { name: "Co-op Academy Broadhurst", region: Region::GreaterManchester },
    Academy { name: "Co-op Academy Failsworth", region: Region::GreaterManchester },
    Academy { name: "Co-op Academy Manchester", region: Region::GreaterManchester },
    Academy { name: "Co-op Academy Medlock", region: Region::GreaterManchester },
    Academy { name: "Co-op Academy New Islington", region: Region::GreaterManchester },
    Academy { name: "Co-op Academy North Manchester", region: Region::GreaterManchester },
    Academy { name: "Co-op Academy Swinton", region: Region::GreaterManchester },
    Academy { name: "Co-op Academy Walkden", region: Region::GreaterManchester },
    Academy { name: "Connell Co-op College", region: Region::GreaterManchester },
    Academy { name: "Co-op Academy Beckfield", region: Region::WestYorkshire },
    Academy { name: "Co-op Academy Brierley", region: Region::WestYorkshire },
    Academy { name: "Co-op Academy Delius", region: Region::WestYorkshire },
    Academy { name: "Co-op Academy Grange", region: Region::WestYorkshire },
    Academy { name: "Co-op Academy Leeds", region: Region::WestYorkshire },
    Academy { name: "Co-op Academy Nightingale", region: Region::WestYorkshire },
    Academy { name: "Co-op Academy Parkland", region: Region::WestYorkshire },
    Academy { name: "Co-op Academy Penny Oaks", region: Region::WestYorkshire },
    Academy { name: "Co-op Academy Priesthorpe", region: Region::WestYorkshire },
    Academy { name: "Co-op Academy Princeville", region: Region::WestYorkshire },
    Academy { name: "Co-op Academy Smithies Moor", region: Region::WestYorkshire },
    Academy { name: "Co-op Academy Southfield", region: Region::WestYorkshire },
    Academy { name: "Co-op Academy Woodlands", region: Region::WestYorkshire },
    Academy { name: "Co-op Academy Brownhill", region: Region::WestYorkshire },
    Academy { name: "Co-op Academy Oakwood", region: Region::WestYorkshire },
    Academy { name: "Co-op Academy Clarice Cliff", region: Region::StokeStaffordshire },
    Academy { name: "Co-op Academy Friarswood", region: Region::StokeStaffordshire },
    Academy { name: "Co-op Academy Glebe", region: Region::StokeStaffordshire },
    Academy { name: "Co-op Academy Hamilton", region: Region::StokeStaffordshire },
    Academy { name: "Co-op Academy Northwood", region: Region::StokeStaffordshire },
    Academy { name: "Co-op Academy Stoke", region: Region::StokeStaffordshire },
    Academy { name: "Co-op Academy Grove", region: Region::StokeStaffordshire },
    Academy { name: "Co-op Academy Florence MacWilliams", region: Region::StokeStaffordshire },
    Academy { name: "Co-op Academy Bebington", region: Region::Merseyside },
    Academy { name: "Co-op Academy Portland", region: Region::Merseyside },
    Academy { name: "Co-op Academy Rathbone", region: Region::Merseyside },
    Academy { name: "Co-op Academy Hillside", region: Region::Merseyside },
    Academy { name: "Co-op Academy Woodslee", region: Region::Merseyside },
];

/// Lookup over the static academy table.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcademyDirectory;

impl AcademyDirectory {
    pub fn academies(&self) -> &'static [Academy] {
        ACADEMIES
    }

    /// Region for an academy name. Central team colleagues register under
    /// "Trust Wide", and anything unrecognized buckets there too.
    pub fn region_of(&self, academy: &str) -> Region {
        ACADEMIES
            .iter()
            .find(|entry| entry.name == academy)
            .map(|entry| entry.region)
            .unwrap_or(Region::TrustWide)
    }
}

/// Corporate domains accepted for facilitator access.
const ACCEPTED_DOMAINS: &[&str] = &["coop.co.uk", "coopacademies.co.uk"];

/// Deduplicated, lower-cased set of emails allowed to use the facilitator
/// surface. Populated by bulk CSV upload from the dashboard.
#[derive(Debug, Clone, Default)]
pub struct FacilitatorAllowlist {
    emails: BTreeSet<String>,
}

impl FacilitatorAllowlist {
    pub fn contains(&self, email: &str) -> bool {
        self.emails.contains(&email.trim().to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }

    pub fn emails(&self) -> impl Iterator<Item = &str> {
        self.emails.iter().map(String::as_str)
    }

    /// Merge emails from an uploaded register. Only the first field of each
    /// row is considered, and only addresses on the accepted corporate
    /// domains survive the filter. Returns how many new entries were added.
    pub fn ingest<R: Read>(&mut self, reader: R) -> Result<usize, csv::Error> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let before = self.emails.len();
        for record in csv_reader.records() {
            let record = record?;
            let Some(first) = record.get(0) else {
                continue;
            };
            let candidate = first.trim().to_ascii_lowercase();
            if !candidate.contains('@') {
                continue;
            }
            if !ACCEPTED_DOMAINS
                .iter()
                .any(|domain| candidate.ends_with(domain))
            {
                continue;
            }
            self.emails.insert(candidate);
        }

        Ok(self.emails.len() - before)
    }
}

/// Routes for managing the facilitator allowlist: bulk CSV upload, a
/// listing for the PDI console, and a per-address membership check.
pub fn allowlist_router(allowlist: Arc<RwLock<FacilitatorAllowlist>>) -> Router {
    Router::new()
        .route(
            "/api/v1/cpd/facilitators/allowlist",
            post(upload_allowlist).get(list_allowlist),
        )
        .route(
            "/api/v1/cpd/facilitators/allowlist/:email",
            get(check_allowlist),
        )
        .with_state(allowlist)
}

async fn upload_allowlist(
    State(allowlist): State<Arc<RwLock<FacilitatorAllowlist>>>,
    body: String,
) -> Response {
    let mut allowlist = allowlist.write().expect("allowlist lock poisoned");
    match allowlist.ingest(body.as_bytes()) {
        Ok(added) => {
            info!(added, total = allowlist.len(), "facilitator allowlist updated");
            (
                StatusCode::OK,
                Json(json!({ "added": added, "total": allowlist.len() })),
            )
                .into_response()
        }
        Err(err) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
    }
}

async fn list_allowlist(State(allowlist): State<Arc<RwLock<FacilitatorAllowlist>>>) -> Response {
    let allowlist = allowlist.read().expect("allowlist lock poisoned");
    let emails: Vec<String> = allowlist.emails().map(str::to_string).collect();
    Json(json!({ "total": emails.len(), "emails": emails })).into_response()
}

async fn check_allowlist(
    State(allowlist): State<Arc<RwLock<FacilitatorAllowlist>>>,
    Path(email): Path<String>,
) -> Response {
    let allowed = allowlist
        .read()
        .expect("allowlist lock poisoned")
        .contains(&email);
    Json(json!({ "email": email, "allowed": allowed })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_academy_maps_to_its_region() {
        let directory = AcademyDirectory;
        assert_eq!(
            directory.region_of("Co-op Academy Leeds"),
            Region::WestYorkshire
        );
        assert_eq!(
            directory.region_of("Co-op Academy Stoke"),
            Region::StokeStaffordshire
        );
    }

    #[test]
    fn unknown_academy_falls_back_to_trust_wide() {
        let directory = AcademyDirectory;
        assert_eq!(directory.region_of("Trust Wide"), Region::TrustWide);
        assert_eq!(directory.region_of("Central Team"), Region::TrustWide);
    }

    #[test]
    fn ingest_keeps_first_field_and_accepted_domains_only() {
        let upload = "\
jane.doe@coopacademies.co.uk,Jane Doe,Leeds
JOHN.SMITH@coop.co.uk,John Smith
visitor@gmail.com,External
not-an-email
jane.doe@coopacademies.co.uk,duplicate row
";
        let mut allowlist = FacilitatorAllowlist::default();
        let added = allowlist.ingest(upload.as_bytes()).expect("parse upload");

        assert_eq!(added, 2);
        assert!(allowlist.contains("jane.doe@coopacademies.co.uk"));
        assert!(allowlist.contains("john.smith@coop.co.uk"));
        assert!(!allowlist.contains("visitor@gmail.com"));
    }

    #[test]
    fn ingest_is_a_set_union() {
        let mut allowlist = FacilitatorAllowlist::default();
        allowlist
            .ingest("first.person@coop.co.uk\n".as_bytes())
            .expect("first upload");
        let added = allowlist
            .ingest("first.person@coop.co.uk\nsecond.person@coop.co.uk\n".as_bytes())
            .expect("second upload");

        assert_eq!(added, 1);
        assert_eq!(allowlist.len(), 2);
    }
}
