//! Coverage-aware sampling of multiplication facts.
//!
//! A session tracks which normalized `(min, max)` factor pairs the student has
//! already seen. Each draw picks a category (focus or review) and prefers
//! pairs from it that are not yet covered, repeating only once the whole
//! category has been shown.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::practice_engine::curriculum::{fact_level, FactLevel};

/// Probability that a draw comes from the review category.
pub const REVIEW_PROBABILITY: f64 = 0.3;

pub fn normalize(a: u32, b: u32) -> (u32, u32) {
    (a.min(b), a.max(b))
}

/// Set of normalized fact pairs already seen in a session.
///
/// Serializes as a list of `[min, max]` pairs. Pairs are normalized on the way
/// in, so `[3, 2]` and `[2, 3]` decode to the same fact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeSet<(u32, u32)>", into = "BTreeSet<(u32, u32)>")]
pub struct FactCoverage(BTreeSet<(u32, u32)>);

impl FactCoverage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fact; returns `false` if it was already covered.
    pub fn insert(&mut self, a: u32, b: u32) -> bool {
        self.0.insert(normalize(a, b))
    }

    pub fn contains(&self, a: u32, b: u32) -> bool {
        self.0.contains(&normalize(a, b))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(u32, u32)> {
        self.0.iter()
    }
}

impl FromIterator<(u32, u32)> for FactCoverage {
    fn from_iter<I: IntoIterator<Item = (u32, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(a, b)| normalize(a, b)).collect())
    }
}

impl From<BTreeSet<(u32, u32)>> for FactCoverage {
    fn from(pairs: BTreeSet<(u32, u32)>) -> Self {
        pairs.into_iter().collect()
    }
}

impl From<FactCoverage> for BTreeSet<(u32, u32)> {
    fn from(coverage: FactCoverage) -> Self {
        coverage.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactCategory {
    Focus,
    Review,
}

/// Pairs with at least one focus factor; the partner may be any focus or review factor.
pub fn focus_pairs(level: &FactLevel) -> BTreeSet<(u32, u32)> {
    level
        .focus
        .iter()
        .flat_map(|&f| {
            level
                .focus
                .iter()
                .chain(level.review)
                .map(move |&x| normalize(f, x))
        })
        .collect()
}

/// Pairs made only of review factors.
pub fn review_pairs(level: &FactLevel) -> BTreeSet<(u32, u32)> {
    level
        .review
        .iter()
        .flat_map(|&a| level.review.iter().map(move |&b| normalize(a, b)))
        .collect()
}

/// Draw the next fact for `difficulty`, favouring pairs not in `seen`.
///
/// Operand order is randomized, so the returned pair is not normalized.
pub fn pick_fact<R: Rng>(rng: &mut R, difficulty: u8, seen: &FactCoverage) -> (u32, u32) {
    let level = fact_level(difficulty);
    let review = review_pairs(level);
    let category = if !review.is_empty() && rng.gen_bool(REVIEW_PROBABILITY) {
        FactCategory::Review
    } else {
        FactCategory::Focus
    };
    let pool = match category {
        FactCategory::Review => review,
        FactCategory::Focus  => focus_pairs(level),
    };

    let unseen: Vec<(u32, u32)> = pool
        .iter()
        .copied()
        .filter(|&(a, b)| !seen.contains(a, b))
        .collect();
    let candidates = if unseen.is_empty() {
        pool.into_iter().collect()
    } else {
        unseen
    };

    let (lo, hi) = match candidates.choose(rng) {
        Some(&pair) => pair,
        None => {
            tracing::warn!(difficulty, "empty fact pool; using fallback fact");
            (1, 2)
        }
    };
    if rng.gen_bool(0.5) {
        (hi, lo)
    } else {
        (lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn level_one_has_six_focus_facts_and_no_review() {
        let level = fact_level(1);
        let focus = focus_pairs(level);
        assert_eq!(
            focus.into_iter().collect::<Vec<_>>(),
            vec![(0, 0), (0, 1), (0, 2), (1, 1), (1, 2), (2, 2)]
        );
        assert!(review_pairs(level).is_empty());
    }

    #[test]
    fn focus_and_review_pools_are_disjoint() {
        for difficulty in 1..=5 {
            let level = fact_level(difficulty);
            let focus = focus_pairs(level);
            let review = review_pairs(level);
            assert!(focus.is_disjoint(&review), "overlap at level {difficulty}");
        }
    }

    #[test]
    fn level_five_focus_pairs_always_include_a_focus_factor() {
        let level = fact_level(5);
        for (a, b) in focus_pairs(level) {
            assert!(level.focus.contains(&a) || level.focus.contains(&b), "({a}, {b})");
        }
    }

    #[test]
    fn coverage_normalizes_pairs() {
        let mut seen = FactCoverage::new();
        assert!(seen.insert(7, 3));
        assert!(!seen.insert(3, 7));
        assert!(seen.contains(7, 3));
        assert_eq!(seen.len(), 1);
        assert_eq!(seen.iter().next(), Some(&(3, 7)));
    }

    #[test]
    fn unseen_facts_are_exhausted_before_any_repeat() {
        let mut rng = StdRng::seed_from_u64(2024);
        let mut seen = FactCoverage::new();
        for _ in 0..6 {
            let (a, b) = pick_fact(&mut rng, 1, &seen);
            assert!(seen.insert(a, b), "repeated ({a}, {b}) before pool was exhausted");
        }
        assert_eq!(seen.len(), 6);
        // Pool exhausted: the next draw repeats from the full focus set.
        let (a, b) = pick_fact(&mut rng, 1, &seen);
        assert!(seen.contains(a, b));
    }

    #[test]
    fn review_draws_happen_at_higher_levels() {
        let mut rng = StdRng::seed_from_u64(9);
        let level = fact_level(3);
        let review = review_pairs(level);
        let from_review = (0..400)
            .map(|_| pick_fact(&mut rng, 3, &FactCoverage::new()))
            .filter(|&(a, b)| review.contains(&normalize(a, b)))
            .count();
        assert!(from_review > 40 && from_review < 220, "review draws: {from_review}");
    }

    #[test]
    fn coverage_round_trips_as_pair_list() {
        let seen: FactCoverage = [(4, 2), (1, 1)].into_iter().collect();
        let json = serde_json::to_value(&seen).unwrap();
        assert_eq!(json, serde_json::json!([[1, 1], [2, 4]]));
        let back: FactCoverage = serde_json::from_value(json).unwrap();
        assert_eq!(back, seen);
    }

    #[test]
    fn reversed_pairs_from_json_count_as_covered() {
        let seen: FactCoverage =
            serde_json::from_value(serde_json::json!([[1, 0], [2, 0], [0, 0], [1, 1], [2, 2]]))
                .unwrap();
        assert!(seen.contains(0, 1));
        assert!(seen.contains(2, 0));
        let stored: Vec<(u32, u32)> = seen.iter().copied().collect();
        assert_eq!(stored, vec![(0, 0), (0, 1), (0, 2), (1, 1), (2, 2)]);

        // Only (1, 2) is left in the level-1 pool.
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..50 {
            let (a, b) = pick_fact(&mut rng, 1, &seen);
            assert_eq!(normalize(a, b), (1, 2));
        }
    }
}
