//! Status classification for CPD events.
//!
//! Three independent booleans model one underlying policy hierarchy
//! (statutory obligation > trust-mandatory policy > strategic priority >
//! optional), so the flags are kept mutually exclusive by a cascade and
//! the final status is always recomputed rather than stored by hand.

use serde::{Deserialize, Serialize};

/// Final classification attached to every event and proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CpdStatus {
    Statutory,
    Mandatory,
    Priority,
    Optional,
}

impl CpdStatus {
    pub const fn label(self) -> &'static str {
        match self {
            CpdStatus::Statutory => "Statutory",
            CpdStatus::Mandatory => "Mandatory",
            CpdStatus::Priority => "Trust Priority",
            CpdStatus::Optional => "Optional",
        }
    }

    pub const fn ordered() -> [CpdStatus; 4] {
        [
            CpdStatus::Statutory,
            CpdStatus::Mandatory,
            CpdStatus::Priority,
            CpdStatus::Optional,
        ]
    }

    /// Statutory and Mandatory events count as compliance training on the
    /// dashboard; Priority and Optional count as development.
    pub const fn is_compliance(self) -> bool {
        matches!(self, CpdStatus::Statutory | CpdStatus::Mandatory)
    }
}

/// Derive the single status from the flag triple. First match wins.
pub const fn classify(statutory: bool, mandatory: bool, priority: bool) -> CpdStatus {
    if statutory {
        CpdStatus::Statutory
    } else if mandatory {
        CpdStatus::Mandatory
    } else if priority {
        CpdStatus::Priority
    } else {
        CpdStatus::Optional
    }
}

/// The three classification booleans with the authoring cascade applied on
/// every edit. Construct via the setters (or [`ClassificationFlags::for_status`])
/// so the mutual-exclusivity invariant holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationFlags {
    pub statutory: bool,
    pub mandatory: bool,
    pub priority: bool,
}

impl ClassificationFlags {
    /// Flag triple whose cascade yields the given status. Used when a
    /// triaged status must be re-expanded into flags for Stage 2.
    pub const fn for_status(status: CpdStatus) -> Self {
        Self {
            statutory: matches!(status, CpdStatus::Statutory),
            mandatory: matches!(status, CpdStatus::Mandatory),
            priority: matches!(status, CpdStatus::Priority),
        }
    }

    pub const fn status(self) -> CpdStatus {
        classify(self.statutory, self.mandatory, self.priority)
    }

    /// Marking an event statutory clears the weaker flags.
    pub fn set_statutory(&mut self, value: bool) {
        self.statutory = value;
        if value {
            self.mandatory = false;
            self.priority = false;
        }
    }

    /// Marking an event mandatory clears the priority flag. Has no effect
    /// on the statutory flag.
    pub fn set_mandatory(&mut self, value: bool) {
        self.mandatory = value;
        if value {
            self.priority = false;
        }
    }

    pub fn set_priority(&mut self, value: bool) {
        self.priority = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_is_total_with_strict_precedence() {
        let table = [
            ((false, false, false), CpdStatus::Optional),
            ((false, false, true), CpdStatus::Priority),
            ((false, true, false), CpdStatus::Mandatory),
            ((false, true, true), CpdStatus::Mandatory),
            ((true, false, false), CpdStatus::Statutory),
            ((true, false, true), CpdStatus::Statutory),
            ((true, true, false), CpdStatus::Statutory),
            ((true, true, true), CpdStatus::Statutory),
        ];

        for ((statutory, mandatory, priority), expected) in table {
            assert_eq!(classify(statutory, mandatory, priority), expected);
        }
    }

    #[test]
    fn setting_statutory_clears_weaker_flags_from_any_state() {
        let starting_states = [
            ClassificationFlags { statutory: false, mandatory: true, priority: false },
            ClassificationFlags { statutory: false, mandatory: false, priority: true },
            ClassificationFlags { statutory: false, mandatory: true, priority: true },
            ClassificationFlags::default(),
        ];

        for mut flags in starting_states {
            flags.set_statutory(true);
            assert_eq!(
                flags,
                ClassificationFlags { statutory: true, mandatory: false, priority: false }
            );
            assert_eq!(flags.status(), CpdStatus::Statutory);
        }
    }

    #[test]
    fn setting_mandatory_clears_priority_only() {
        let mut flags = ClassificationFlags::default();
        flags.set_priority(true);
        flags.set_mandatory(true);
        assert!(!flags.priority);
        assert_eq!(flags.status(), CpdStatus::Mandatory);
    }

    #[test]
    fn clearing_a_flag_leaves_the_others_untouched() {
        let mut flags = ClassificationFlags::for_status(CpdStatus::Mandatory);
        flags.set_statutory(false);
        assert!(flags.mandatory);
        assert_eq!(flags.status(), CpdStatus::Mandatory);
    }

    #[test]
    fn for_status_round_trips_every_status() {
        for status in CpdStatus::ordered() {
            assert_eq!(ClassificationFlags::for_status(status).status(), status);
        }
    }
}
