//! Conclusions reference document
//!
//! Prose that the results report draws on: per-language insight tiers,
//! activity suggestions, and partner-compatibility guidance. Loaded once,
//! validated up front, read-only afterwards.

use crate::compat::MatchType;
use crate::error::{Error, Result};
use crate::scoring::Intensity;
use crate::types::Category;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Insight text for one receiving intensity tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceivingInsight {
    pub description: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub challenges: Vec<String>,
    #[serde(default)]
    pub triggers: Vec<String>,
}

/// Insight text for one giving intensity tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GivingInsight {
    pub description: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub challenges: Vec<String>,
    #[serde(default)]
    pub growth_areas: Vec<String>,
}

/// One value per intensity bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntensityTiers<T> {
    pub high: T,
    pub medium: T,
    pub low: T,
}

impl<T> IntensityTiers<T> {
    pub fn get(&self, intensity: Intensity) -> &T {
        match intensity {
            Intensity::High => &self.high,
            Intensity::Medium => &self.medium,
            Intensity::Low => &self.low,
        }
    }
}

/// Everything known about one love language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageDetail {
    pub name: String,
    pub short_description: String,
    pub receiving: IntensityTiers<ReceivingInsight>,
    pub giving: IntensityTiers<GivingInsight>,
}

/// A suggested activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub title: String,
    pub description: String,
    pub difficulty: String,
    pub time: String,
}

/// Activities for couples.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CouplesActivities {
    #[serde(default)]
    pub general: Vec<Activity>,
}

/// Guidance for a giving/receiving match type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicsGuidance {
    pub description: String,
    pub advice: String,
    pub risk: String,
}

/// Guidance for a specific pair of receiving languages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MismatchGuidance {
    pub challenge: String,
    pub bridge: String,
    pub watch_for: String,
}

/// Partner-compatibility lookup tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerCompatibility {
    pub giving_receiving_dynamics: BTreeMap<MatchType, DynamicsGuidance>,
    /// Keyed `"<a>_vs_<b>"`
    #[serde(default)]
    pub specific_mismatches: HashMap<String, MismatchGuidance>,
}

/// The full conclusions document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conclusions {
    pub language_details: BTreeMap<Category, LanguageDetail>,
    #[serde(default)]
    pub activities_solo: BTreeMap<Category, Vec<Activity>>,
    #[serde(default)]
    pub activities_couples: CouplesActivities,
    pub partner_compatibility: PartnerCompatibility,
}

const BUNDLED_CONCLUSIONS: &str = include_str!("../data/conclusions.json");

impl Conclusions {
    /// Parse and validate a conclusions document.
    pub fn from_json(json: &str) -> Result<Self> {
        let conclusions: Conclusions = serde_json::from_str(json)
            .map_err(|e| Error::Conclusions(format!("failed to parse: {}", e)))?;
        conclusions.validate()?;
        Ok(conclusions)
    }

    /// Load a conclusions document from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let conclusions = Self::from_json(&json)?;
        tracing::debug!(path = %path.display(), "Loaded conclusions document");
        Ok(conclusions)
    }

    /// The document shipped with the library.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_CONCLUSIONS)
    }

    /// Every category needs details and every match type needs guidance.
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = Category::ALL
            .iter()
            .filter(|c| !self.language_details.contains_key(c))
            .map(|c| c.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(Error::Conclusions(format!(
                "language_details missing for: {}",
                missing.join(", ")
            )));
        }

        let missing: Vec<&str> = MatchType::ALL
            .iter()
            .filter(|m| {
                !self
                    .partner_compatibility
                    .giving_receiving_dynamics
                    .contains_key(m)
            })
            .map(|m| m.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(Error::Conclusions(format!(
                "giving_receiving_dynamics missing for: {}",
                missing.join(", ")
            )));
        }

        Ok(())
    }

    /// Details for a category. Present for every category after validation.
    pub fn language(&self, category: Category) -> Option<&LanguageDetail> {
        self.language_details.get(&category)
    }

    /// Solo activities for a category, possibly empty.
    pub fn solo_activities(&self, category: Category) -> &[Activity] {
        self.activities_solo
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn dynamics(&self, match_type: MatchType) -> Option<&DynamicsGuidance> {
        self.partner_compatibility
            .giving_receiving_dynamics
            .get(&match_type)
    }

    /// Mismatch guidance for `a_vs_b`, falling back to `b_vs_a`.
    pub fn specific_mismatch(&self, a: Category, b: Category) -> Option<&MismatchGuidance> {
        let mismatches = &self.partner_compatibility.specific_mismatches;
        mismatches
            .get(&mismatch_key(a, b))
            .or_else(|| mismatches.get(&mismatch_key(b, a)))
    }
}

/// Lookup key for [`Conclusions::specific_mismatch`].
pub fn mismatch_key(a: Category, b: Category) -> String {
    format!("{}_vs_{}", a.as_str(), b.as_str())
}
