//! The Trust triage rubric (criteria A-G).
//!
//! Each criterion is scored 0-3 by the reviewer; the total is the plain
//! sum out of 21. The High/Normal weight is informational for the review
//! panel and does not alter the arithmetic.

use serde::{Deserialize, Serialize};

pub const MAX_CRITERION_SCORE: u8 = 3;
pub const MAX_TOTAL_SCORE: u8 = 21;

/// One rubric criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RubricCriterion {
    StrategicAlignment,
    StatusJustification,
    Clarity,
    Audience,
    AddedValue,
    Feasibility,
    Impact,
}

/// Informational weight shown next to each criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RubricWeight {
    High,
    Normal,
}

impl RubricCriterion {
    pub const fn ordered() -> [RubricCriterion; 7] {
        [
            RubricCriterion::StrategicAlignment,
            RubricCriterion::StatusJustification,
            RubricCriterion::Clarity,
            RubricCriterion::Audience,
            RubricCriterion::AddedValue,
            RubricCriterion::Feasibility,
            RubricCriterion::Impact,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            RubricCriterion::StrategicAlignment => "A. Strategic Alignment",
            RubricCriterion::StatusJustification => "B. Status Justification",
            RubricCriterion::Clarity => "C. Clarity of Purpose",
            RubricCriterion::Audience => "D. Audience & Reach",
            RubricCriterion::AddedValue => "E. Added Value",
            RubricCriterion::Feasibility => "F. Feasibility",
            RubricCriterion::Impact => "G. Likely Impact",
        }
    }

    pub const fn weight(self) -> RubricWeight {
        match self {
            RubricCriterion::StrategicAlignment
            | RubricCriterion::StatusJustification
            | RubricCriterion::Clarity
            | RubricCriterion::AddedValue => RubricWeight::High,
            RubricCriterion::Audience | RubricCriterion::Feasibility | RubricCriterion::Impact => {
                RubricWeight::Normal
            }
        }
    }
}

/// A reviewer's 0-3 score against each criterion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageScores {
    pub strategic_alignment: u8,
    pub status_justification: u8,
    pub clarity: u8,
    pub audience: u8,
    pub added_value: u8,
    pub feasibility: u8,
    pub impact: u8,
}

/// Raised when a criterion score falls outside the 0-3 band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("score {value} for '{}' is outside the 0-{MAX_CRITERION_SCORE} rubric band", criterion.label())]
pub struct ScoreOutOfRange {
    pub criterion: RubricCriterion,
    pub value: u8,
}

impl TriageScores {
    pub fn score_for(&self, criterion: RubricCriterion) -> u8 {
        match criterion {
            RubricCriterion::StrategicAlignment => self.strategic_alignment,
            RubricCriterion::StatusJustification => self.status_justification,
            RubricCriterion::Clarity => self.clarity,
            RubricCriterion::Audience => self.audience,
            RubricCriterion::AddedValue => self.added_value,
            RubricCriterion::Feasibility => self.feasibility,
            RubricCriterion::Impact => self.impact,
        }
    }

    pub fn total(&self) -> u8 {
        RubricCriterion::ordered()
            .into_iter()
            .map(|criterion| self.score_for(criterion))
            .sum()
    }

    pub fn validate(&self) -> Result<(), ScoreOutOfRange> {
        for criterion in RubricCriterion::ordered() {
            let value = self.score_for(criterion);
            if value > MAX_CRITERION_SCORE {
                return Err(ScoreOutOfRange { criterion, value });
            }
        }
        Ok(())
    }

    /// Advisory action derived from the total. The reviewer's actual
    /// decision is authoritative and need not match.
    pub fn suggested_action(&self) -> SuggestedAction {
        suggest_action(self.total())
    }
}

/// Advisory decision band for a rubric total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    Approve,
    MoreDetailRequired,
    Decline,
}

impl SuggestedAction {
    pub const fn label(self) -> &'static str {
        match self {
            SuggestedAction::Approve => "Approve",
            SuggestedAction::MoreDetailRequired => "More Detail Required",
            SuggestedAction::Decline => "Decline",
        }
    }
}

pub const fn suggest_action(total: u8) -> SuggestedAction {
    if total >= 18 {
        SuggestedAction::Approve
    } else if total >= 13 {
        SuggestedAction::MoreDetailRequired
    } else {
        SuggestedAction::Decline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(score: u8) -> TriageScores {
        TriageScores {
            strategic_alignment: score,
            status_justification: score,
            clarity: score,
            audience: score,
            added_value: score,
            feasibility: score,
            impact: score,
        }
    }

    #[test]
    fn total_is_the_unweighted_sum() {
        let scores = TriageScores {
            strategic_alignment: 3,
            status_justification: 2,
            clarity: 3,
            audience: 1,
            added_value: 2,
            feasibility: 3,
            impact: 2,
        };
        assert_eq!(scores.total(), 16);
        assert_eq!(uniform(3).total(), MAX_TOTAL_SCORE);
    }

    #[test]
    fn suggestion_thresholds_match_the_rubric() {
        assert_eq!(suggest_action(21), SuggestedAction::Approve);
        assert_eq!(suggest_action(18), SuggestedAction::Approve);
        assert_eq!(suggest_action(17), SuggestedAction::MoreDetailRequired);
        assert_eq!(suggest_action(13), SuggestedAction::MoreDetailRequired);
        assert_eq!(suggest_action(12), SuggestedAction::Decline);
        assert_eq!(suggest_action(0), SuggestedAction::Decline);
    }

    #[test]
    fn out_of_band_score_is_rejected_with_its_criterion() {
        let mut scores = uniform(2);
        scores.feasibility = 4;
        let err = scores.validate().expect_err("4 is out of band");
        assert_eq!(err.criterion, RubricCriterion::Feasibility);
        assert_eq!(err.value, 4);
    }

    #[test]
    fn high_weight_criteria_are_a_b_c_e() {
        let highs: Vec<_> = RubricCriterion::ordered()
            .into_iter()
            .filter(|criterion| criterion.weight() == RubricWeight::High)
            .collect();
        assert_eq!(
            highs,
            vec![
                RubricCriterion::StrategicAlignment,
                RubricCriterion::StatusJustification,
                RubricCriterion::Clarity,
                RubricCriterion::AddedValue,
            ]
        );
    }
}
