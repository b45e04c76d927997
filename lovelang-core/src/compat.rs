//! Partner compatibility
//!
//! Compares the respondent's primary giving/receiving languages with the two
//! languages they pick for a partner, and looks up matching guidance.

use crate::conclusions::{Conclusions, DynamicsGuidance, MismatchGuidance};
use crate::types::Category;
use serde::{Deserialize, Serialize};

/// How two people's giving and receiving languages line up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Each gives what the other wants to receive
    PerfectMatch,
    /// Only one direction lines up
    OneWayMatch,
    /// Neither direction lines up
    NoNaturalMatch,
}

impl MatchType {
    pub const ALL: [MatchType; 3] = [
        MatchType::PerfectMatch,
        MatchType::OneWayMatch,
        MatchType::NoNaturalMatch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::PerfectMatch => "perfect_match",
            MatchType::OneWayMatch => "one_way_match",
            MatchType::NoNaturalMatch => "no_natural_match",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MatchType::PerfectMatch => "Perfect Match",
            MatchType::OneWayMatch => "One-Way Match",
            MatchType::NoNaturalMatch => "No Natural Match",
        }
    }
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Primary languages of both people.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    pub self_giving: Category,
    pub self_receiving: Category,
    pub partner_receiving: Category,
    pub partner_giving: Category,
}

/// Classify a pairing.
///
/// Perfect when self gives what the partner receives *and* the partner gives
/// what self receives; one-way when exactly one holds.
pub fn classify(
    self_giving: Category,
    self_receiving: Category,
    partner_receiving: Category,
    partner_giving: Category,
) -> MatchType {
    let self_to_partner = self_giving == partner_receiving;
    let partner_to_self = partner_giving == self_receiving;

    match (self_to_partner, partner_to_self) {
        (true, true) => MatchType::PerfectMatch,
        (true, false) | (false, true) => MatchType::OneWayMatch,
        (false, false) => MatchType::NoNaturalMatch,
    }
}

/// Classification plus the guidance that goes with it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompatibilityResult {
    pub pairing: Pairing,
    pub match_type: MatchType,
    pub dynamics: Option<DynamicsGuidance>,
    /// Guidance for the pair of receiving languages, when the table has it
    pub specific_mismatch: Option<MismatchGuidance>,
}

impl Pairing {
    pub fn classify(&self) -> MatchType {
        classify(
            self.self_giving,
            self.self_receiving,
            self.partner_receiving,
            self.partner_giving,
        )
    }

    /// Classify and look up guidance.
    pub fn resolve(&self, conclusions: &Conclusions) -> CompatibilityResult {
        let match_type = self.classify();
        CompatibilityResult {
            pairing: *self,
            match_type,
            dynamics: conclusions.dynamics(match_type).cloned(),
            specific_mismatch: conclusions
                .specific_mismatch(self.self_receiving, self.partner_receiving)
                .cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Category::*;

    #[test]
    fn test_perfect_match() {
        assert_eq!(classify(Words, Touch, Words, Touch), MatchType::PerfectMatch);
    }

    #[test]
    fn test_one_way_match_self_side() {
        assert_eq!(classify(Words, Touch, Words, Gifts), MatchType::OneWayMatch);
    }

    #[test]
    fn test_one_way_match_partner_side() {
        assert_eq!(classify(Service, Touch, Words, Touch), MatchType::OneWayMatch);
    }

    #[test]
    fn test_no_natural_match() {
        assert_eq!(
            classify(Service, Touch, Words, Gifts),
            MatchType::NoNaturalMatch
        );
    }

    #[test]
    fn test_exhaustive_classification_is_consistent() {
        for sg in Category::ALL {
            for sr in Category::ALL {
                for pr in Category::ALL {
                    for pg in Category::ALL {
                        let hits = usize::from(sg == pr) + usize::from(pg == sr);
                        let expected = match hits {
                            2 => MatchType::PerfectMatch,
                            1 => MatchType::OneWayMatch,
                            _ => MatchType::NoNaturalMatch,
                        };
                        assert_eq!(classify(sg, sr, pr, pg), expected);
                    }
                }
            }
        }
    }

    #[test]
    fn test_resolve_attaches_guidance() {
        let conclusions = Conclusions::bundled().unwrap();
        let pairing = Pairing {
            self_giving: Words,
            self_receiving: Touch,
            partner_receiving: Words,
            partner_giving: Gifts,
        };

        let result = pairing.resolve(&conclusions);
        assert_eq!(result.match_type, MatchType::OneWayMatch);
        assert_eq!(
            result.dynamics.as_ref(),
            conclusions.dynamics(MatchType::OneWayMatch)
        );
        // touch_vs_words is stored as words_vs_touch
        assert!(result.specific_mismatch.is_some());
    }

    #[test]
    fn test_resolve_without_specific_mismatch() {
        let conclusions = Conclusions::bundled().unwrap();
        let pairing = Pairing {
            self_giving: Touch,
            self_receiving: Touch,
            partner_receiving: Touch,
            partner_giving: Touch,
        };

        let result = pairing.resolve(&conclusions);
        assert_eq!(result.match_type, MatchType::PerfectMatch);
        assert!(result.specific_mismatch.is_none());
    }

    #[test]
    fn test_match_type_serde() {
        assert_eq!(
            serde_json::to_string(&MatchType::NoNaturalMatch).unwrap(),
            "\"no_natural_match\""
        );
    }
}
