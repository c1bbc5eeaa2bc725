//! Eligibility rules for the catalog filter.
//!
//! Each rule is a `Filter`; `CatalogFilter::from_policy` chains all three.

pub mod known_for_language;
pub mod minimum_credits;
pub mod recent_language;

pub use known_for_language::KnownForLanguageFilter;
pub use minimum_credits::MinimumCreditsFilter;
pub use recent_language::RecentLanguageFilter;

/// `english / total >= pct / 100`, in integers.
///
/// An empty population passes: there is no evidence against the actor.
pub(crate) fn meets_english_share(english: usize, total: usize, pct: u32) -> bool {
    if total == 0 {
        return true;
    }
    english * 100 >= total * pct as usize
}
