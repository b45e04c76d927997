//! Core domain types for lovelang
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Category** | One of the five love languages (words, quality_time, service, touch, gifts) |
//! | **Context** | Whether a question is about *receiving* or *giving* love |
//! | **Question** | A scenario prompt with an ordered list of weighted options |
//! | **Answer Set** | One slot per question: unanswered, or the chosen option index |
//!
//! Every question and every score bucket is tagged with exactly one [`Context`].

use serde::{Deserialize, Serialize};

// ============================================
// Category
// ============================================

/// A love-language category.
///
/// The set is closed. Declaration order is the fixed enumeration order used
/// to break ranking ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Words,
    QualityTime,
    Service,
    Touch,
    Gifts,
}

impl Category {
    /// All categories in enumeration order.
    pub const ALL: [Category; 5] = [
        Category::Words,
        Category::QualityTime,
        Category::Service,
        Category::Touch,
        Category::Gifts,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Words => "words",
            Category::QualityTime => "quality_time",
            Category::Service => "service",
            Category::Touch => "touch",
            Category::Gifts => "gifts",
        }
    }

    /// Human-friendly name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Words => "Words of Affirmation",
            Category::QualityTime => "Quality Time",
            Category::Service => "Acts of Service",
            Category::Touch => "Physical Touch",
            Category::Gifts => "Receiving Gifts",
        }
    }

    /// Position in [`Category::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Category::Words => 0,
            Category::QualityTime => 1,
            Category::Service => 2,
            Category::Touch => 3,
            Category::Gifts => 4,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "words" => Ok(Category::Words),
            "quality_time" => Ok(Category::QualityTime),
            "service" => Ok(Category::Service),
            "touch" => Ok(Category::Touch),
            "gifts" => Ok(Category::Gifts),
            _ => Err(format!("unknown category: {}", s)),
        }
    }
}

// ============================================
// Context
// ============================================

/// Whether a question (and its score bucket) is about receiving or giving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Context {
    Receiving,
    Giving,
}

impl Context {
    pub const ALL: [Context; 2] = [Context::Receiving, Context::Giving];

    pub fn as_str(&self) -> &'static str {
        match self {
            Context::Receiving => "receiving",
            Context::Giving => "giving",
        }
    }

    /// Capitalized label for headings.
    pub fn label(&self) -> &'static str {
        match self {
            Context::Receiving => "Receiving",
            Context::Giving => "Giving",
        }
    }
}

impl std::fmt::Display for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Context {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "receiving" => Ok(Context::Receiving),
            "giving" => Ok(Context::Giving),
            _ => Err(format!("unknown context: {}", s)),
        }
    }
}

// ============================================
// Questions
// ============================================

/// Question style. Informational only; scoring ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Scenario,
    Intensity,
}

/// One selectable answer of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    /// Prompt text shown to the respondent
    pub text: String,
    /// Category this option scores toward
    pub language: Category,
    /// Points added to the category when selected
    pub weight: u32,
}

/// A scenario question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Stable identifier, unique within a bank
    pub id: u32,
    /// Prompt text
    pub text: String,
    /// Question style (serialized as `category` to match the bank format)
    #[serde(rename = "category", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<QuestionKind>,
    /// Which score bucket this question feeds
    pub context: Context,
    /// Ordered options; never empty in a validated bank
    pub options: Vec<QuestionOption>,
}

impl Question {
    /// Highest option weight, or 0 for a question without options.
    pub fn max_weight(&self) -> u32 {
        self.options.iter().map(|o| o.weight).max().unwrap_or(0)
    }

    /// Option at `index`, if in range.
    pub fn option(&self, index: usize) -> Option<&QuestionOption> {
        self.options.get(index)
    }
}

// ============================================
// Answers
// ============================================

/// Recorded answers, one slot per question in presentation order.
///
/// Slots are only ever overwritten; stepping back does not clear them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet(Vec<Option<usize>>);

impl AnswerSet {
    /// An answer set with `len` unanswered slots.
    pub fn new(len: usize) -> Self {
        Self(vec![None; len])
    }

    pub fn from_slots(slots: Vec<Option<usize>>) -> Self {
        Self(slots)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Recorded option index at `position`.
    pub fn get(&self, position: usize) -> Option<usize> {
        self.0.get(position).copied().flatten()
    }

    /// Record `option` at `position`. Out-of-range positions are ignored.
    pub fn record(&mut self, position: usize, option: usize) {
        if let Some(slot) = self.0.get_mut(position) {
            *slot = Some(option);
        }
    }

    /// Number of answered slots.
    pub fn answered_count(&self) -> usize {
        self.0.iter().filter(|s| s.is_some()).count()
    }

    pub fn slots(&self) -> &[Option<usize>] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<usize>> + '_ {
        self.0.iter().copied()
    }
}
