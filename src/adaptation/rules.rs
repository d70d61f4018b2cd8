//! Group-boundary adaptation rules.
//!
//! After each completed group the engine looks at accuracy and average
//! response time and moves along two axes: `visual_support_level` (5 = full
//! static visuals, 1 = none) and `difficulty_level`.
//!
//! Advancing fades visuals first. Once visuals are at 1, difficulty goes up
//! and visuals reset to [`AdaptationRules::visual_reset_level`] so the harder
//! content is scaffolded again:
//!
//! ```text
//! visuals 5→4→3→2→1, difficulty+1 with visuals 4, 4→3→2→1, difficulty+1 …
//! ```
//!
//! Rules, first match wins:
//!
//! | Outcome           | Condition                                  | Action  |
//! |-------------------|--------------------------------------------|---------|
//! | `Perfect`         | every answer correct                       | advance |
//! | `Strong`          | accuracy ≥ 0.67 and avg time ≤ fast        | advance |
//! | `AccurateButSlow` | accuracy ≥ 0.67                            | hold    |
//! | `Struggling`      | accuracy < 0.45                            | retreat |
//! | `Mixed`           | otherwise                                  | hold    |
//!
//! With three-problem groups 2/3 = 0.666… falls under 0.67, so only a perfect
//! group advances; with five-problem groups 4/5 is enough when fast.

use serde::{Deserialize, Serialize};

use crate::adaptation::session::{SessionState, MAX_LEVEL, MIN_LEVEL};

pub const DEFAULT_MAX_DIFFICULTY: u8 = MAX_LEVEL;

/// Thresholds driving [`AdaptationRules::adapt`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptationRules {
    /// Average time per problem at or under which a group counts as fast.
    pub fast_ms: f64,
    /// Average time above which a student counts as slow on the dashboard.
    pub slow_ms: f64,
    pub advance_accuracy: f64,
    pub retreat_below: f64,
    /// Assumed average when a group has no timings at all.
    pub default_avg_time_ms: f64,
    pub visual_reset_level: u8,
}

impl AdaptationRules {
    pub const DEFAULT: AdaptationRules = AdaptationRules {
        fast_ms: 12_000.0,
        slow_ms: 20_000.0,
        advance_accuracy: 0.67,
        retreat_below: 0.45,
        default_avg_time_ms: 15_000.0,
        visual_reset_level: 4,
    };
}

impl Default for AdaptationRules {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Outcome of one completed group.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GroupResult {
    pub correctness: Vec<bool>,
    /// May be shorter than `correctness`; missing timings are simply absent.
    pub response_times_ms: Vec<u32>,
}

impl GroupResult {
    pub fn new(correctness: Vec<bool>, response_times_ms: Vec<u32>) -> Self {
        Self { correctness, response_times_ms }
    }

    /// Build from `(is_correct, response_time)` pairs, dropping missing timings.
    pub fn from_attempts<I>(attempts: I) -> Self
    where
        I: IntoIterator<Item = (bool, Option<u32>)>,
    {
        let mut group = Self::default();
        for (correct, time) in attempts {
            group.correctness.push(correct);
            group.response_times_ms.extend(time);
        }
        group
    }

    pub fn num_correct(&self) -> usize {
        self.correctness.iter().filter(|&&c| c).count()
    }

    pub fn total(&self) -> usize {
        self.correctness.len()
    }

    pub fn is_empty(&self) -> bool {
        self.correctness.is_empty()
    }

    pub fn accuracy(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.num_correct() as f64 / self.total() as f64
    }

    pub fn average_time_ms(&self, default_ms: f64) -> f64 {
        if self.response_times_ms.is_empty() {
            return default_ms;
        }
        let sum: f64 = self.response_times_ms.iter().map(|&t| f64::from(t)).sum();
        sum / self.response_times_ms.len() as f64
    }
}

/// Which rule fired for a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupOutcome {
    NoData,
    Perfect,
    Strong,
    AccurateButSlow,
    Struggling,
    Mixed,
}

/// Next state plus the human-readable reason shown on the instructor dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdaptationDecision {
    pub new_difficulty: u8,
    pub new_visual_level: u8,
    pub reason: String,
    pub outcome: GroupOutcome,
}

impl AdaptationDecision {
    pub fn state(&self) -> SessionState {
        SessionState {
            difficulty_level: self.new_difficulty,
            visual_support_level: self.new_visual_level,
        }
    }
}

fn seconds(ms: f64) -> String {
    format!("{:.1}s", ms / 1000.0)
}

impl AdaptationRules {
    fn classify(&self, group: &GroupResult, avg_time_ms: f64) -> GroupOutcome {
        let accuracy = group.accuracy();
        if group.is_empty() {
            GroupOutcome::NoData
        } else if group.num_correct() == group.total() {
            GroupOutcome::Perfect
        } else if accuracy >= self.advance_accuracy && avg_time_ms <= self.fast_ms {
            GroupOutcome::Strong
        } else if accuracy >= self.advance_accuracy {
            GroupOutcome::AccurateButSlow
        } else if accuracy < self.retreat_below {
            GroupOutcome::Struggling
        } else {
            GroupOutcome::Mixed
        }
    }

    /// Fade visuals first; once at minimum, raise difficulty and restore visuals.
    fn advance(&self, state: SessionState, max_difficulty: u8) -> SessionState {
        if state.visual_support_level > MIN_LEVEL {
            SessionState {
                visual_support_level: state.visual_support_level - 1,
                ..state
            }
        } else if state.difficulty_level < max_difficulty {
            SessionState {
                difficulty_level: state.difficulty_level + 1,
                visual_support_level: self.visual_reset_level,
            }
        } else {
            state
        }
    }

    /// Raise visuals and lower difficulty together.
    fn retreat(&self, state: SessionState) -> SessionState {
        SessionState {
            difficulty_level: state.difficulty_level.saturating_sub(1).max(MIN_LEVEL),
            visual_support_level: state.visual_support_level.saturating_add(1).min(MAX_LEVEL),
        }
    }

    /// Decide the next state after a completed group.
    pub fn adapt(
        &self,
        group: &GroupResult,
        state: SessionState,
        max_difficulty: u8,
    ) -> AdaptationDecision {
        let max_difficulty = max_difficulty.clamp(MIN_LEVEL, MAX_LEVEL);
        let state = SessionState::new(
            state.difficulty_level.min(max_difficulty),
            state.visual_support_level,
        );
        let avg_time_ms = group.average_time_ms(self.default_avg_time_ms);
        let outcome = self.classify(group, avg_time_ms);
        let (correct, total) = (group.num_correct(), group.total());
        let avg = seconds(avg_time_ms);
        let (d, v) = (state.difficulty_level, state.visual_support_level);

        let (next, reason) = match outcome {
            GroupOutcome::NoData => (state, "No data yet".to_string()),
            GroupOutcome::Perfect => {
                let next = self.advance(state, max_difficulty);
                let reason = if next == state {
                    format!(
                        "Perfect ({correct}/{total}, avg {avg}). \
                         Already at max level (difficulty {d}, visuals {v})."
                    )
                } else if next.visual_support_level < v {
                    format!(
                        "Perfect ({correct}/{total}, avg {avg}). \
                         Reducing visual support {v}→{}.",
                        next.visual_support_level
                    )
                } else {
                    format!(
                        "Perfect ({correct}/{total}, avg {avg}), visuals already minimal. \
                         Increasing difficulty {d}→{} with visuals back at {}.",
                        next.difficulty_level, next.visual_support_level
                    )
                };
                (next, reason)
            }
            GroupOutcome::Strong => {
                let next = self.advance(state, max_difficulty);
                let reason = if next.visual_support_level < v {
                    format!(
                        "Strong ({correct}/{total}, avg {avg}). \
                         Reducing visual support {v}→{}.",
                        next.visual_support_level
                    )
                } else if next.difficulty_level > d {
                    format!(
                        "Strong ({correct}/{total}, avg {avg}), visuals minimal. \
                         Increasing difficulty {d}→{} with visuals back at {}.",
                        next.difficulty_level, next.visual_support_level
                    )
                } else {
                    format!(
                        "Strong ({correct}/{total}, avg {avg}). \
                         Already at max level, holding at difficulty {d}, visuals {v}."
                    )
                };
                (next, reason)
            }
            GroupOutcome::AccurateButSlow => (
                state,
                format!(
                    "Accurate ({correct}/{total}) but working carefully (avg {avg}). \
                     Holding difficulty {d}, visuals {v}."
                ),
            ),
            GroupOutcome::Struggling => {
                let next = self.retreat(state);
                let reason = format!(
                    "Struggling ({correct}/{total}, avg {avg}). \
                     Adjusting difficulty {d}→{}, visuals {v}→{}.",
                    next.difficulty_level, next.visual_support_level
                );
                (next, reason)
            }
            GroupOutcome::Mixed => (
                state,
                format!(
                    "Mixed results ({correct}/{total}, avg {avg}). \
                     Holding at difficulty {d}, visuals {v}."
                ),
            ),
        };

        tracing::debug!(
            ?outcome,
            correct,
            total,
            avg_time_ms,
            from_difficulty = d,
            from_visual = v,
            to_difficulty = next.difficulty_level,
            to_visual = next.visual_support_level,
            "adapted after group"
        );

        AdaptationDecision {
            new_difficulty: next.difficulty_level,
            new_visual_level: next.visual_support_level,
            reason,
            outcome,
        }
    }
}

/// Evaluate a completed group with the default rules.
///
/// `times_ms` may be shorter than `correctness`; an empty `correctness`
/// returns the current state unchanged.
pub fn adapt_after_group(
    correctness: &[bool],
    times_ms: &[u32],
    current_difficulty: u8,
    current_visual_level: u8,
    max_difficulty: u8,
) -> AdaptationDecision {
    let group = GroupResult::new(correctness.to_vec(), times_ms.to_vec());
    let state = SessionState::new(current_difficulty, current_visual_level);
    AdaptationRules::DEFAULT.adapt(&group, state, max_difficulty)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST: [u32; 3] = [8000, 7000, 6000];

    fn adapt(correct: &[bool], times: &[u32], d: u8, v: u8) -> AdaptationDecision {
        adapt_after_group(correct, times, d, v, DEFAULT_MAX_DIFFICULTY)
    }

    // ── perfect groups ──

    #[test]
    fn perfect_reduces_visuals_first() {
        let r = adapt(&[true, true, true], &FAST, 1, 4);
        assert_eq!((r.new_difficulty, r.new_visual_level), (1, 3));
        assert_eq!(r.outcome, GroupOutcome::Perfect);
    }

    #[test]
    fn perfect_at_min_visuals_raises_difficulty_and_resets_visuals() {
        let r = adapt(&[true, true, true], &FAST, 2, 1);
        assert_eq!((r.new_difficulty, r.new_visual_level), (3, 4));
        assert!(r.reason.contains("2→3"), "{}", r.reason);
    }

    #[test]
    fn perfect_at_top_holds_and_says_so() {
        let r = adapt(&[true, true, true], &FAST, 5, 1);
        assert_eq!((r.new_difficulty, r.new_visual_level), (5, 1));
        assert!(r.reason.to_lowercase().contains("already at max"), "{}", r.reason);
    }

    #[test]
    fn skill_max_difficulty_caps_advance() {
        let r = adapt_after_group(&[true, true, true], &FAST, 3, 1, 3);
        assert_eq!((r.new_difficulty, r.new_visual_level), (3, 1));
    }

    #[test]
    fn perfect_advances_regardless_of_speed() {
        let r = adapt(&[true, true, true], &[25000, 30000, 20000], 1, 5);
        assert_eq!(r.new_visual_level, 4);
    }

    #[test]
    fn single_correct_answer_is_perfect() {
        let r = adapt(&[true], &[3000], 1, 3);
        assert_eq!(r.new_visual_level, 2);
    }

    // ── strong / accurate-but-slow / mixed ──

    #[test]
    fn two_of_three_falls_under_the_strong_threshold() {
        assert!(2.0_f64 / 3.0 < AdaptationRules::DEFAULT.advance_accuracy);
        let r = adapt(&[true, false, true], &[5000, 4000, 3000], 2, 4);
        assert_eq!((r.new_difficulty, r.new_visual_level), (2, 4));
        assert_eq!(r.outcome, GroupOutcome::Mixed);
    }

    #[test]
    fn three_of_four_fast_advances() {
        let r = adapt(&[true, true, false, true], &[5000, 4000, 3000, 4000], 2, 4);
        assert_eq!((r.new_difficulty, r.new_visual_level), (2, 3));
        assert_eq!(r.outcome, GroupOutcome::Strong);
    }

    #[test]
    fn strong_at_min_visuals_raises_difficulty() {
        let r = adapt(&[true, true, true, true, false], &[5000; 5], 2, 1);
        assert_eq!((r.new_difficulty, r.new_visual_level), (3, 4));
    }

    #[test]
    fn accurate_but_slow_holds() {
        let r = adapt(&[true, true, true, false], &[15000, 14000, 16000, 13000], 2, 3);
        assert_eq!((r.new_difficulty, r.new_visual_level), (2, 3));
        assert_eq!(r.outcome, GroupOutcome::AccurateButSlow);
        assert!(r.reason.contains("3/4"));
    }

    #[test]
    fn three_of_five_is_mixed() {
        let r = adapt(&[true, true, true, false, false], &[4000; 5], 3, 2);
        assert_eq!((r.new_difficulty, r.new_visual_level), (3, 2));
        assert_eq!(r.outcome, GroupOutcome::Mixed);
    }

    #[test]
    fn missing_timings_default_to_a_neutral_average() {
        // 4/5 would be strong if fast; with no timings the 15s default is slow.
        let r = adapt(&[true, true, true, true, false], &[], 2, 3);
        assert_eq!(r.outcome, GroupOutcome::AccurateButSlow);
        assert!(r.reason.contains("15.0s"), "{}", r.reason);
    }

    #[test]
    fn partial_timings_average_only_what_is_present() {
        let group =
            GroupResult::from_attempts([(true, Some(4000)), (true, None), (false, Some(8000))]);
        assert_eq!(group.total(), 3);
        assert_eq!(group.response_times_ms, vec![4000, 8000]);
        assert_eq!(group.average_time_ms(15_000.0), 6000.0);
    }

    // ── struggling ──

    #[test]
    fn zero_correct_retreats_on_both_axes() {
        let r = adapt(&[false, false, false], &[5000; 3], 3, 2);
        assert_eq!((r.new_difficulty, r.new_visual_level), (2, 3));
        assert_eq!(r.outcome, GroupOutcome::Struggling);
        assert!(r.reason.contains("0/3"));
    }

    #[test]
    fn one_correct_retreats() {
        let r = adapt(&[false, true, false], &[5000; 3], 2, 3);
        assert_eq!((r.new_difficulty, r.new_visual_level), (1, 4));
    }

    #[test]
    fn retreat_is_floored_and_capped() {
        let r = adapt(&[false, false, false], &[5000; 3], 1, 5);
        assert_eq!((r.new_difficulty, r.new_visual_level), (1, 5));
    }

    #[test]
    fn two_of_five_retreats() {
        let r = adapt(&[true, false, true, false, false], &[4000; 5], 4, 1);
        assert_eq!((r.new_difficulty, r.new_visual_level), (3, 2));
    }

    // ── edge cases ──

    #[test]
    fn empty_group_is_a_no_op() {
        let r = adapt(&[], &[], 2, 3);
        assert_eq!((r.new_difficulty, r.new_visual_level), (2, 3));
        assert_eq!(r.reason, "No data yet");
        assert_eq!(r.outcome, GroupOutcome::NoData);
    }

    #[test]
    fn reasons_report_average_seconds() {
        let r = adapt(&[true, true, true], &[7000, 6000, 8000], 1, 3);
        assert!(r.reason.contains("3/3"));
        assert!(r.reason.contains("7.0s"), "{}", r.reason);
    }

    #[test]
    fn custom_rules_deserialize_with_defaults() {
        let rules: AdaptationRules = serde_json::from_str(r#"{ "fast_ms": 9000 }"#).unwrap();
        assert_eq!(rules.fast_ms, 9000.0);
        assert_eq!(rules.visual_reset_level, 4);
        let r = rules.adapt(
            &GroupResult::new(vec![true, true, true, false], vec![10_000; 4]),
            SessionState::new(2, 3),
            5,
        );
        assert_eq!(r.outcome, GroupOutcome::AccurateButSlow);
    }

    #[test]
    fn out_of_range_levels_are_clamped_before_deciding() {
        let r = adapt(&[false, false, false], &[5000; 3], 255, 255);
        assert_eq!((r.new_difficulty, r.new_visual_level), (4, 5));

        let r = adapt(&[true, true, true], &FAST, 0, 0);
        assert_eq!((r.new_difficulty, r.new_visual_level), (2, 4));

        let r = adapt_after_group(&[], &[], 5, 3, 2);
        assert_eq!((r.new_difficulty, r.new_visual_level), (2, 3));
    }

    // ── whole sessions ──

    #[test]
    fn strong_student_spirals_upward() {
        let mut state = SessionState::new(1, 3);
        let mut history = vec![state];
        for _ in 0..8 {
            let r = adapt(
                &[true, true, true],
                &[7000, 6000, 8000],
                state.difficulty_level,
                state.visual_support_level,
            );
            state.apply(&r);
            history.push(state);
        }
        assert!(state.difficulty_level >= 3, "{history:?}");
        let saw_reset = history
            .windows(2)
            .any(|w| w[1].visual_support_level > w[0].visual_support_level);
        assert!(saw_reset, "expected a visual reset on difficulty increase: {history:?}");
    }

    #[test]
    fn struggling_student_gets_support() {
        let mut state = SessionState::new(3, 1);
        for _ in 0..4 {
            let r = adapt(
                &[false, false, true],
                &[10_000; 3],
                state.difficulty_level,
                state.visual_support_level,
            );
            state.apply(&r);
        }
        assert!(state.visual_support_level >= 4);
        assert_eq!(state.difficulty_level, 1);
    }
}
