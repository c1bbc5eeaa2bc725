//! Tuning constants for eligibility and curation.
//!
//! Every threshold is empirical, so all of them are configurable. The
//! defaults are the values the game ships with.

use serde::{Deserialize, Serialize};

/// Thresholds of the language-majority eligibility rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EligibilityPolicy {
    /// Minimum size of the full movie filmography
    pub min_movie_credits: usize,
    /// Minimum share (percent) of English movies in the known-for list
    pub known_for_english_pct: u32,
    /// How many of the most recent credits are sampled
    pub recent_sample_size: usize,
    /// Minimum share (percent) of English movies in the recent sample
    pub recent_english_pct: u32,
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        Self {
            min_movie_credits: 15,
            known_for_english_pct: 50,
            recent_sample_size: 20,
            recent_english_pct: 70,
        }
    }
}

/// Parameters of answer-set curation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurationPolicy {
    /// Highest billing order that still counts as a real role
    pub max_billing_order: u32,
    /// Number of movies in an answer set
    pub answer_size: usize,
}

impl Default for CurationPolicy {
    fn default() -> Self {
        Self {
            max_billing_order: 10,
            answer_size: crate::answer_set::DEFAULT_ANSWER_SIZE,
        }
    }
}
