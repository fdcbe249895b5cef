//! Composite score.
//!
//! Each category owns one `AtomicU8` slot, so concurrent category tasks
//! write disjoint keys without locking. The overall score is recomputed
//! from whatever is populated when it is read.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Serialize, Serializer};

use crate::models::Category;

/// Slot value for a category that has not resolved.
const UNSET: u8 = u8::MAX;

/// Qualitative band for a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScoreLabel {
    /// 80 and above
    Excellent,
    /// 60 to 79
    Bon,
    /// 40 to 59
    AAmeliorer,
    /// Below 40
    Critique,
}

impl ScoreLabel {
    /// Band for `score`.
    pub fn for_score(score: u8) -> Self {
        match score {
            80.. => ScoreLabel::Excellent,
            60..=79 => ScoreLabel::Bon,
            40..=59 => ScoreLabel::AAmeliorer,
            _ => ScoreLabel::Critique,
        }
    }

    /// Display string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreLabel::Excellent => "Excellent",
            ScoreLabel::Bon => "Bon",
            ScoreLabel::AAmeliorer => "À améliorer",
            ScoreLabel::Critique => "Critique",
        }
    }
}

impl fmt::Display for ScoreLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ScoreLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Overall score with its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Overall {
    /// Rounded mean of populated categories
    pub score: u8,
    /// Band for `score`
    pub label: ScoreLabel,
}

/// Point-in-time copy of the aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeView {
    /// Overall score
    pub overall_score: u8,
    /// Band for `overall_score`
    pub label: ScoreLabel,
    /// Populated categories only
    pub per_category: BTreeMap<Category, u8>,
}

/// Lock-free per-category score store.
#[derive(Debug)]
pub struct AggregateScore {
    slots: [AtomicU8; Category::ALL.len()],
}

impl Default for AggregateScore {
    fn default() -> Self {
        Self::new()
    }
}

impl AggregateScore {
    /// An aggregate with no category populated.
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| AtomicU8::new(UNSET)),
        }
    }

    /// Records `score` for `category`, clamped to 100; the latest write wins.
    pub fn update(&self, category: Category, score: u8) {
        let clamped = score.min(100);
        if clamped != score {
            log::warn!("Clamping {category} score {score} to 100");
        }
        self.slots[category.index()].store(clamped, Ordering::Release);
    }

    /// Score for `category`, if it has resolved.
    pub fn get(&self, category: Category) -> Option<u8> {
        match self.slots[category.index()].load(Ordering::Acquire) {
            UNSET => None,
            score => Some(score),
        }
    }

    /// Populated categories and their scores.
    pub fn per_category(&self) -> BTreeMap<Category, u8> {
        Category::ALL
            .iter()
            .filter_map(|category| self.get(*category).map(|score| (*category, score)))
            .collect()
    }

    /// Rounded (half up) mean of populated categories; 0 / `Critique` when none are.
    pub fn overall(&self) -> Overall {
        Self::overall_of(&self.per_category())
    }

    fn overall_of(scores: &BTreeMap<Category, u8>) -> Overall {
        let count = scores.len() as u32;
        let score = if count == 0 {
            0
        } else {
            let sum: u32 = scores.values().map(|s| u32::from(*s)).sum();
            u8::try_from((sum * 2 + count) / (count * 2)).unwrap_or(100)
        };
        Overall {
            score,
            label: ScoreLabel::for_score(score),
        }
    }

    /// Consistent copy of the current state.
    pub fn snapshot(&self) -> CompositeView {
        let per_category = self.per_category();
        let overall = Self::overall_of(&per_category);
        CompositeView {
            overall_score: overall.score,
            label: overall.label,
            per_category,
        }
    }
}
