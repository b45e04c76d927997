//! Profile report
//!
//! Turns [`Scores`] and the [`Conclusions`] document into everything the
//! results screen shows: ranked languages per context, key insights, a deep
//! dive into the top languages, suggested activities and, when partner
//! languages are given, the compatibility analysis.
//!
//! The report is plain data. Front-ends render or serialize it.

use crate::compat::{CompatibilityResult, Pairing};
use crate::conclusions::{Activity, Conclusions};
use crate::config::QuizConfig;
use crate::error::{Error, Result};
use crate::scoring::{Intensity, Scores};
use crate::types::{Category, Context};
use serde::Serialize;

/// Solo activities listed per focus language.
pub const SOLO_ACTIVITY_LIMIT: usize = 4;
/// General couples activities listed in a report.
pub const COUPLES_ACTIVITY_LIMIT: usize = 4;

/// Tunables for report building.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSettings {
    /// Receiving spread (max - min points) above which preferences count as strong
    pub strong_preference_spread: u32,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            strong_preference_spread: 20,
        }
    }
}

impl From<&QuizConfig> for ReportSettings {
    fn from(config: &QuizConfig) -> Self {
        Self {
            strong_preference_spread: config.strong_preference_spread,
        }
    }
}

/// The partner's primary languages, as picked by the respondent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartnerLanguages {
    pub receiving: Category,
    pub giving: Category,
}

/// One row of a ranked context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedLanguage {
    pub category: Category,
    pub name: String,
    pub score: u32,
    pub percentage: u32,
    pub intensity: Intensity,
}

/// Ranked languages of one context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextSummary {
    pub context: Context,
    pub max_score: u32,
    pub ranked: Vec<RankedLanguage>,
}

impl ContextSummary {
    fn build(scores: &Scores, context: Context) -> Self {
        let ranked = scores
            .ranking(context)
            .iter()
            .map(|&category| RankedLanguage {
                category,
                name: category.display_name().to_string(),
                score: scores.score(category, context),
                percentage: scores.percentage(category, context),
                intensity: scores.intensity(category, context),
            })
            .collect();

        Self {
            context,
            max_score: scores.max.get(context),
            ranked,
        }
    }
}

/// Whether the respondent gives love the way they want to receive it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Alignment {
    Aligned { language: Category },
    Different { receiving: Category, giving: Category },
}

impl Alignment {
    pub fn title(&self) -> &'static str {
        match self {
            Alignment::Aligned { .. } => "Aligned",
            Alignment::Different { .. } => "Different Languages",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Alignment::Aligned { language } => format!(
                "Your primary receiving and giving languages match ({}). You naturally give love \
                 in the way you want to receive it. This creates clarity, but watch that partners \
                 with different languages don't feel neglected.",
                language.display_name()
            ),
            Alignment::Different { receiving, giving } => format!(
                "You receive love through {} but give through {}. This is common! Be aware that \
                 what feels natural to give might not be what you need to receive.",
                receiving.display_name(),
                giving.display_name()
            ),
        }
    }
}

/// Score spread in both contexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Balance {
    /// (min, max) receiving points
    pub receiving_range: (u32, u32),
    /// (min, max) giving points
    pub giving_range: (u32, u32),
    /// Receiving spread exceeds the configured threshold
    pub strong_preferences: bool,
}

impl Balance {
    pub fn message(&self) -> String {
        let verdict = if self.strong_preferences {
            "You have clear strong preferences."
        } else {
            "Your languages are relatively balanced."
        };
        format!(
            "Your receiving scores range from {} to {} points, while giving ranges from {} to {} points. {}",
            self.receiving_range.0,
            self.receiving_range.1,
            self.giving_range.0,
            self.giving_range.1,
            verdict
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Insights {
    pub alignment: Alignment,
    pub balance: Balance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    Primary,
    Secondary,
}

impl Rank {
    pub fn label(&self) -> &'static str {
        match self {
            Rank::Primary => "Primary",
            Rank::Secondary => "Secondary",
        }
    }
}

/// Intensity-tier guidance for one of the top languages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeepDiveEntry {
    pub rank: Rank,
    pub context: Context,
    pub category: Category,
    pub name: String,
    pub percentage: u32,
    pub intensity: Intensity,
    pub description: String,
    pub strengths: Vec<String>,
    pub challenges: Vec<String>,
    /// Receiving entries only
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub triggers: Vec<String>,
    /// Giving entries only
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub growth_areas: Vec<String>,
}

/// A top language with activities to practice it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FocusLanguage {
    pub category: Category,
    pub name: String,
    pub short_description: String,
    pub activities: Vec<Activity>,
}

/// Everything shown on the results screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileReport {
    pub receiving: ContextSummary,
    pub giving: ContextSummary,
    pub primary_receiving: Category,
    pub secondary_receiving: Category,
    pub primary_giving: Category,
    pub secondary_giving: Category,
    pub insights: Insights,
    pub deep_dive: Vec<DeepDiveEntry>,
    pub focus_languages: Vec<FocusLanguage>,
    pub couples_activities: Vec<Activity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compatibility: Option<CompatibilityResult>,
}

impl ProfileReport {
    /// Build a report from completed scores.
    ///
    /// Fails only when `conclusions` lacks details for a top language, which a
    /// validated document never does.
    pub fn build(
        scores: &Scores,
        conclusions: &Conclusions,
        partner: Option<PartnerLanguages>,
        settings: ReportSettings,
    ) -> Result<Self> {
        let primary_receiving = scores.primary(Context::Receiving);
        let secondary_receiving = scores.secondary(Context::Receiving);
        let primary_giving = scores.primary(Context::Giving);
        let secondary_giving = scores.secondary(Context::Giving);

        let alignment = if primary_receiving == primary_giving {
            Alignment::Aligned {
                language: primary_receiving,
            }
        } else {
            Alignment::Different {
                receiving: primary_receiving,
                giving: primary_giving,
            }
        };

        let receiving_range = scores.range(Context::Receiving);
        let giving_range = scores.range(Context::Giving);
        let balance = Balance {
            receiving_range,
            giving_range,
            strong_preferences: receiving_range.1 - receiving_range.0
                > settings.strong_preference_spread,
        };

        let top = [
            (Rank::Primary, Context::Receiving, primary_receiving),
            (Rank::Secondary, Context::Receiving, secondary_receiving),
            (Rank::Primary, Context::Giving, primary_giving),
            (Rank::Secondary, Context::Giving, secondary_giving),
        ];

        let deep_dive = top
            .iter()
            .map(|&(rank, context, category)| deep_dive_entry(scores, conclusions, rank, context, category))
            .collect::<Result<Vec<_>>>()?;

        let mut focus_languages: Vec<FocusLanguage> = Vec::new();
        for &(_, _, category) in &top {
            if focus_languages.iter().any(|f| f.category == category) {
                continue;
            }
            let detail = language_detail(conclusions, category)?;
            focus_languages.push(FocusLanguage {
                category,
                name: detail.name.clone(),
                short_description: detail.short_description.clone(),
                activities: conclusions
                    .solo_activities(category)
                    .iter()
                    .take(SOLO_ACTIVITY_LIMIT)
                    .cloned()
                    .collect(),
            });
        }

        let couples_activities = conclusions
            .activities_couples
            .general
            .iter()
            .take(COUPLES_ACTIVITY_LIMIT)
            .cloned()
            .collect();

        let compatibility = partner.map(|partner| {
            Pairing {
                self_giving: primary_giving,
                self_receiving: primary_receiving,
                partner_receiving: partner.receiving,
                partner_giving: partner.giving,
            }
            .resolve(conclusions)
        });

        tracing::debug!(
            primary_receiving = %primary_receiving,
            primary_giving = %primary_giving,
            with_partner = compatibility.is_some(),
            "Built profile report"
        );

        Ok(Self {
            receiving: ContextSummary::build(scores, Context::Receiving),
            giving: ContextSummary::build(scores, Context::Giving),
            primary_receiving,
            secondary_receiving,
            primary_giving,
            secondary_giving,
            insights: Insights { alignment, balance },
            deep_dive,
            focus_languages,
            couples_activities,
            compatibility,
        })
    }

    pub fn context(&self, context: Context) -> &ContextSummary {
        match context {
            Context::Receiving => &self.receiving,
            Context::Giving => &self.giving,
        }
    }
}

fn language_detail(
    conclusions: &Conclusions,
    category: Category,
) -> Result<&crate::conclusions::LanguageDetail> {
    conclusions
        .language(category)
        .ok_or_else(|| Error::Conclusions(format!("no language details for {}", category)))
}

fn deep_dive_entry(
    scores: &Scores,
    conclusions: &Conclusions,
    rank: Rank,
    context: Context,
    category: Category,
) -> Result<DeepDiveEntry> {
    let detail = language_detail(conclusions, category)?;
    let percentage = scores.percentage(category, context);
    let intensity = Intensity::from_percentage(percentage);

    let mut entry = DeepDiveEntry {
        rank,
        context,
        category,
        name: detail.name.clone(),
        percentage,
        intensity,
        description: String::new(),
        strengths: Vec::new(),
        challenges: Vec::new(),
        triggers: Vec::new(),
        growth_areas: Vec::new(),
    };

    match context {
        Context::Receiving => {
            let insight = detail.receiving.get(intensity);
            entry.description = insight.description.clone();
            entry.strengths = insight.strengths.clone();
            entry.challenges = insight.challenges.clone();
            entry.triggers = insight.triggers.clone();
        }
        Context::Giving => {
            let insight = detail.giving.get(intensity);
            entry.description = insight.description.clone();
            entry.strengths = insight.strengths.clone();
            entry.challenges = insight.challenges.clone();
            entry.growth_areas = insight.growth_areas.clone();
        }
    }

    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compat::MatchType;
    use crate::scoring::{CategoryScores, MaxScoreTable, ScoreTable};

    fn scores(receiving: CategoryScores, giving: CategoryScores) -> Scores {
        Scores {
            table: ScoreTable { receiving, giving },
            max: MaxScoreTable {
                receiving: 30,
                giving: 30,
            },
        }
    }

    fn table(words: u32, quality_time: u32, service: u32, touch: u32, gifts: u32) -> CategoryScores {
        CategoryScores {
            words,
            quality_time,
            service,
            touch,
            gifts,
        }
    }

    #[test]
    fn test_ranked_contexts() {
        let conclusions = Conclusions::bundled().unwrap();
        let s = scores(table(3, 12, 0, 25, 1), table(9, 0, 14, 2, 0));
        let report =
            ProfileReport::build(&s, &conclusions, None, ReportSettings::default()).unwrap();

        let receiving: Vec<Category> = report.receiving.ranked.iter().map(|r| r.category).collect();
        assert_eq!(
            receiving,
            vec![
                Category::Touch,
                Category::QualityTime,
                Category::Words,
                Category::Gifts,
                Category::Service
            ]
        );
        assert_eq!(report.receiving.max_score, 30);
        assert_eq!(report.receiving.ranked[0].percentage, 83);
        assert_eq!(report.receiving.ranked[0].intensity, Intensity::High);
        assert_eq!(report.primary_giving, Category::Service);
        assert_eq!(report.secondary_giving, Category::Words);
        assert!(report.compatibility.is_none());
    }

    #[test]
    fn test_alignment_insight() {
        let conclusions = Conclusions::bundled().unwrap();

        let aligned = scores(table(20, 1, 0, 0, 0), table(15, 0, 2, 0, 0));
        let report =
            ProfileReport::build(&aligned, &conclusions, None, ReportSettings::default()).unwrap();
        assert_eq!(
            report.insights.alignment,
            Alignment::Aligned {
                language: Category::Words
            }
        );
        assert!(report.insights.alignment.message().contains("Words of Affirmation"));

        let different = scores(table(20, 1, 0, 0, 0), table(0, 0, 2, 9, 0));
        let report =
            ProfileReport::build(&different, &conclusions, None, ReportSettings::default())
                .unwrap();
        assert_eq!(
            report.insights.alignment,
            Alignment::Different {
                receiving: Category::Words,
                giving: Category::Touch
            }
        );
        assert_eq!(report.insights.alignment.title(), "Different Languages");
    }

    #[test]
    fn test_balance_uses_receiving_spread() {
        let conclusions = Conclusions::bundled().unwrap();
        let settings = ReportSettings::default();

        let strong = scores(table(21, 0, 3, 4, 5), table(2, 2, 2, 2, 2));
        let report = ProfileReport::build(&strong, &conclusions, None, settings).unwrap();
        assert_eq!(report.insights.balance.receiving_range, (0, 21));
        assert_eq!(report.insights.balance.giving_range, (2, 2));
        assert!(report.insights.balance.strong_preferences);
        assert!(report.insights.balance.message().contains("clear strong preferences"));

        // A spread of exactly the threshold is still balanced
        let even = scores(table(20, 0, 3, 4, 5), table(0, 0, 0, 0, 30));
        let report = ProfileReport::build(&even, &conclusions, None, settings).unwrap();
        assert!(!report.insights.balance.strong_preferences);
        assert!(report.insights.balance.message().contains("relatively balanced"));
    }

    #[test]
    fn test_deep_dive_uses_intensity_tier() {
        let conclusions = Conclusions::bundled().unwrap();
        let s = scores(table(25, 10, 0, 0, 0), table(0, 0, 5, 4, 0));
        let report =
            ProfileReport::build(&s, &conclusions, None, ReportSettings::default()).unwrap();

        assert_eq!(report.deep_dive.len(), 4);

        let first = &report.deep_dive[0];
        assert_eq!(first.rank, Rank::Primary);
        assert_eq!(first.context, Context::Receiving);
        assert_eq!(first.category, Category::Words);
        assert_eq!(first.intensity, Intensity::High);
        let expected = &conclusions
            .language(Category::Words)
            .unwrap()
            .receiving
            .high;
        assert_eq!(first.description, expected.description);
        assert_eq!(first.triggers, expected.triggers);
        assert!(first.growth_areas.is_empty());

        let giving = &report.deep_dive[2];
        assert_eq!(giving.context, Context::Giving);
        assert_eq!(giving.category, Category::Service);
        assert_eq!(giving.intensity, Intensity::Low);
        let expected = &conclusions
            .language(Category::Service)
            .unwrap()
            .giving
            .low;
        assert_eq!(giving.growth_areas, expected.growth_areas);
        assert!(giving.triggers.is_empty());
    }

    #[test]
    fn test_focus_languages_are_deduplicated_in_order() {
        let conclusions = Conclusions::bundled().unwrap();
        // receiving: touch, words; giving: words, gifts
        let s = scores(table(8, 0, 0, 12, 0), table(10, 0, 0, 0, 6));
        let report =
            ProfileReport::build(&s, &conclusions, None, ReportSettings::default()).unwrap();

        let focus: Vec<Category> = report.focus_languages.iter().map(|f| f.category).collect();
        assert_eq!(focus, vec![Category::Touch, Category::Words, Category::Gifts]);
        for language in &report.focus_languages {
            assert!(language.activities.len() <= SOLO_ACTIVITY_LIMIT);
        }
        assert!(report.couples_activities.len() <= COUPLES_ACTIVITY_LIMIT);
        assert!(!report.couples_activities.is_empty());
    }

    #[test]
    fn test_compatibility_with_partner() {
        let conclusions = Conclusions::bundled().unwrap();
        // Self: receives touch, gives words
        let s = scores(table(2, 0, 0, 12, 0), table(10, 0, 0, 3, 0));
        let partner = PartnerLanguages {
            receiving: Category::Words,
            giving: Category::Touch,
        };
        let report =
            ProfileReport::build(&s, &conclusions, Some(partner), ReportSettings::default())
                .unwrap();

        let compat = report.compatibility.unwrap();
        assert_eq!(compat.match_type, MatchType::PerfectMatch);
        assert!(compat.dynamics.is_some());
        assert!(compat.specific_mismatch.is_some());
    }

    #[test]
    fn test_all_zero_scores_still_build() {
        let conclusions = Conclusions::bundled().unwrap();
        let s = scores(CategoryScores::default(), CategoryScores::default());
        let report =
            ProfileReport::build(&s, &conclusions, None, ReportSettings::default()).unwrap();
        assert_eq!(report.primary_receiving, Category::Words);
        assert_eq!(report.secondary_receiving, Category::QualityTime);
        assert_eq!(report.focus_languages.len(), 2);
    }

    #[test]
    fn test_report_serializes() {
        let conclusions = Conclusions::bundled().unwrap();
        let s = scores(table(1, 2, 3, 4, 5), table(5, 4, 3, 2, 1));
        let report =
            ProfileReport::build(&s, &conclusions, None, ReportSettings::default()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["primary_receiving"], "gifts");
        assert_eq!(json["insights"]["alignment"]["kind"], "different");
        assert!(json.get("compatibility").is_none());
    }
}
