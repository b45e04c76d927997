//! Scoring engine
//!
//! Folds an [`AnswerSet`] into per-context, per-category totals and derives
//! rankings, percentages and intensity buckets from them.
//!
//! The max score of a context is the sum of each question's highest option
//! weight. It is independent of the answers given and serves only as the
//! normalization denominator.

use crate::error::{Error, Result};
use crate::types::{AnswerSet, Category, Context, Question};
use serde::{Deserialize, Serialize};

/// Percentage above which a category counts as high intensity.
pub const HIGH_INTENSITY_THRESHOLD: u32 = 60;
/// Percentage above which a category counts as medium intensity.
pub const MEDIUM_INTENSITY_THRESHOLD: u32 = 30;

/// Strength of a category relative to the context's ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    High,
    Medium,
    Low,
}

impl Intensity {
    /// Bucket for a percentage: > 60 high, > 30 medium, otherwise low.
    pub fn from_percentage(percentage: u32) -> Self {
        if percentage > HIGH_INTENSITY_THRESHOLD {
            Intensity::High
        } else if percentage > MEDIUM_INTENSITY_THRESHOLD {
            Intensity::Medium
        } else {
            Intensity::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Intensity::High => "high",
            Intensity::Medium => "medium",
            Intensity::Low => "low",
        }
    }
}

impl std::fmt::Display for Intensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accumulated points per category within one context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub words: u32,
    pub quality_time: u32,
    pub service: u32,
    pub touch: u32,
    pub gifts: u32,
}

impl CategoryScores {
    pub fn get(&self, category: Category) -> u32 {
        match category {
            Category::Words => self.words,
            Category::QualityTime => self.quality_time,
            Category::Service => self.service,
            Category::Touch => self.touch,
            Category::Gifts => self.gifts,
        }
    }

    pub fn add(&mut self, category: Category, points: u32) {
        let slot = match category {
            Category::Words => &mut self.words,
            Category::QualityTime => &mut self.quality_time,
            Category::Service => &mut self.service,
            Category::Touch => &mut self.touch,
            Category::Gifts => &mut self.gifts,
        };
        *slot = slot.saturating_add(points);
    }

    pub fn total(&self) -> u32 {
        Category::ALL.iter().map(|c| self.get(*c)).sum()
    }

    /// Categories ordered by score descending, ties in enumeration order.
    pub fn ranked(&self) -> [Category; 5] {
        let mut ranked = Category::ALL;
        // Stable sort keeps enumeration order among equal scores.
        ranked.sort_by(|a, b| self.get(*b).cmp(&self.get(*a)));
        ranked
    }

    /// Lowest and highest category score.
    pub fn range(&self) -> (u32, u32) {
        let values = Category::ALL.map(|c| self.get(c));
        let min = values.iter().copied().min().unwrap_or(0);
        let max = values.iter().copied().max().unwrap_or(0);
        (min, max)
    }
}

/// Category totals for both contexts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTable {
    pub receiving: CategoryScores,
    pub giving: CategoryScores,
}

impl ScoreTable {
    pub fn context(&self, context: Context) -> &CategoryScores {
        match context {
            Context::Receiving => &self.receiving,
            Context::Giving => &self.giving,
        }
    }

    pub fn context_mut(&mut self, context: Context) -> &mut CategoryScores {
        match context {
            Context::Receiving => &mut self.receiving,
            Context::Giving => &mut self.giving,
        }
    }
}

/// Theoretical ceiling per context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxScoreTable {
    pub receiving: u32,
    pub giving: u32,
}

impl MaxScoreTable {
    pub fn get(&self, context: Context) -> u32 {
        match context {
            Context::Receiving => self.receiving,
            Context::Giving => self.giving,
        }
    }

    fn add(&mut self, context: Context, points: u32) {
        let slot = match context {
            Context::Receiving => &mut self.receiving,
            Context::Giving => &mut self.giving,
        };
        *slot = slot.saturating_add(points);
    }
}

/// Output of [`compute_scores`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub table: ScoreTable,
    #[serde(rename = "max_scores")]
    pub max: MaxScoreTable,
}

impl Scores {
    pub fn score(&self, category: Category, context: Context) -> u32 {
        self.table.context(context).get(category)
    }

    /// `round(100 * score / max)`, half rounding up, clamped to 100.
    ///
    /// A context without questions has a max of 0 and yields 0.
    pub fn percentage(&self, category: Category, context: Context) -> u32 {
        percentage(self.score(category, context), self.max.get(context))
    }

    pub fn intensity(&self, category: Category, context: Context) -> Intensity {
        Intensity::from_percentage(self.percentage(category, context))
    }

    pub fn ranking(&self, context: Context) -> [Category; 5] {
        self.table.context(context).ranked()
    }

    pub fn primary(&self, context: Context) -> Category {
        self.ranking(context)[0]
    }

    pub fn secondary(&self, context: Context) -> Category {
        self.ranking(context)[1]
    }

    pub fn range(&self, context: Context) -> (u32, u32) {
        self.table.context(context).range()
    }
}

/// Integer `round(100 * score / max)` with half-up rounding, clamped to 100.
pub fn percentage(score: u32, max: u32) -> u32 {
    if max == 0 {
        return 0;
    }
    let score = u64::from(score);
    let max = u64::from(max);
    let rounded = (200 * score + max) / (2 * max);
    if rounded > 100 {
        tracing::warn!(score, max, "Score exceeds context maximum, clamping to 100%");
        return 100;
    }
    rounded as u32
}

/// Compute category totals and per-context ceilings.
///
/// `answers` must have one slot per question and every recorded index must
/// point at an existing option; otherwise [`Error::InvalidAnswer`] is returned.
pub fn compute_scores(questions: &[Question], answers: &AnswerSet) -> Result<Scores> {
    if questions.len() != answers.len() {
        return Err(Error::InvalidAnswer(format!(
            "{} answers for {} questions",
            answers.len(),
            questions.len()
        )));
    }

    let mut scores = Scores::default();

    for question in questions {
        scores.max.add(question.context, question.max_weight());
    }

    for (question, answer) in questions.iter().zip(answers.iter()) {
        let Some(index) = answer else {
            continue;
        };
        let option = question.option(index).ok_or_else(|| {
            Error::InvalidAnswer(format!(
                "option {} out of range for question {} ({} options)",
                index,
                question.id,
                question.options.len()
            ))
        })?;
        scores
            .table
            .context_mut(question.context)
            .add(option.language, option.weight);
    }

    tracing::debug!(
        answered = answers.answered_count(),
        max_receiving = scores.max.receiving,
        max_giving = scores.max.giving,
        "Computed scores"
    );

    Ok(scores)
}
