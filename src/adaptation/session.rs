use serde::{Deserialize, Serialize};

use crate::adaptation::rules::AdaptationDecision;
use crate::practice_engine::models::ProblemType;

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 5;

/// Lowest visual level that still shows a scaffold.
pub const VISUALS_SHOWN_FROM: u8 = 2;

/// Difficulty and scaffolding used for every problem in the current group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub difficulty_level: u8,
    pub visual_support_level: u8,
}

impl SessionState {
    /// Both levels are clamped into `1..=5`.
    pub fn new(difficulty_level: u8, visual_support_level: u8) -> Self {
        Self {
            difficulty_level: difficulty_level.clamp(MIN_LEVEL, MAX_LEVEL),
            visual_support_level: visual_support_level.clamp(MIN_LEVEL, MAX_LEVEL),
        }
    }

    /// State for a student's first session on a skill.
    pub fn starting(visual_supports_enabled: bool) -> Self {
        Self::new(MIN_LEVEL, if visual_supports_enabled { 3 } else { MIN_LEVEL })
    }

    pub fn shows_visuals(self) -> bool {
        self.visual_support_level >= VISUALS_SHOWN_FROM
    }

    pub fn apply(&mut self, decision: &AdaptationDecision) {
        self.difficulty_level = decision.new_difficulty;
        self.visual_support_level = decision.new_visual_level;
    }
}

/// Session length and grouping for one problem type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub session_total: u32,
    pub group_size: u32,
    pub num_groups: u32,
}

impl SessionConfig {
    pub const DEFAULT: SessionConfig = SessionConfig { session_total: 15, group_size: 3, num_groups: 5 };

    /// Multiplication facts need more reps to cover the fact space at each level.
    pub const MULTIPLICATION_FACTS: SessionConfig =
        SessionConfig { session_total: 25, group_size: 5, num_groups: 5 };

    pub fn for_problem_type(problem_type: ProblemType) -> Self {
        match problem_type {
            ProblemType::MultiplicationFacts => Self::MULTIPLICATION_FACTS,
            _ => Self::DEFAULT,
        }
    }

    pub fn group_number(&self, sequence_number: u32) -> u32 {
        get_group_number(sequence_number, self.group_size, self.num_groups)
    }

    pub fn is_group_boundary(&self, sequence_number: u32) -> bool {
        is_group_boundary(sequence_number, self.group_size)
    }

    /// First and last sequence numbers of the group containing `sequence_number`.
    pub fn group_bounds(&self, sequence_number: u32) -> (u32, u32) {
        let size = self.group_size.max(1);
        let start = (sequence_number.saturating_sub(1) / size) * size + 1;
        (start, start + size - 1)
    }

    pub fn is_complete(&self, answered: u32) -> bool {
        answered >= self.session_total
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Session config for a problem type tag. Unknown tags get the default.
pub fn get_session_config(problem_type: &str) -> SessionConfig {
    problem_type
        .parse::<ProblemType>()
        .map_or(SessionConfig::DEFAULT, SessionConfig::for_problem_type)
}

/// 1-based group for a 1-based sequence number, clamped to the last group.
pub fn get_group_number(sequence_number: u32, group_size: u32, num_groups: u32) -> u32 {
    let group = sequence_number.saturating_sub(1) / group_size.max(1) + 1;
    group.min(num_groups)
}

/// True when `sequence_number` is the last problem of its group.
pub fn is_group_boundary(sequence_number: u32, group_size: u32) -> bool {
    group_size != 0 && sequence_number % group_size == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_group_numbers_for_a_full_session() {
        let groups: Vec<u32> = (1..=15).map(|s| get_group_number(s, 3, 5)).collect();
        assert_eq!(groups, vec![1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 4, 4, 5, 5, 5]);
    }

    #[test]
    fn overflow_sequence_numbers_clamp_to_last_group() {
        assert_eq!(get_group_number(16, 3, 5), 5);
        assert_eq!(get_group_number(40, 5, 5), 5);
    }

    #[test]
    fn boundaries_fall_on_multiples_of_group_size() {
        let boundaries: Vec<u32> = (1..=15).filter(|&s| is_group_boundary(s, 3)).collect();
        assert_eq!(boundaries, vec![3, 6, 9, 12, 15]);
        assert!(!is_group_boundary(3, 0));
    }

    #[test]
    fn session_config_depends_on_problem_type() {
        assert_eq!(
            get_session_config("multiplication_facts"),
            SessionConfig { session_total: 25, group_size: 5, num_groups: 5 }
        );
        assert_eq!(get_session_config("fraction_comparison"), SessionConfig::DEFAULT);
        assert_eq!(get_session_config("multiplication_scaling"), SessionConfig::DEFAULT);
        assert_eq!(get_session_config("no_such_skill"), SessionConfig::DEFAULT);
        // Lookups are independent of each other.
        assert_eq!(get_session_config("multiplication_facts").group_size, 5);
    }

    #[test]
    fn group_bounds_cover_the_group() {
        let config = SessionConfig::MULTIPLICATION_FACTS;
        assert_eq!(config.group_bounds(1), (1, 5));
        assert_eq!(config.group_bounds(5), (1, 5));
        assert_eq!(config.group_bounds(6), (6, 10));
        assert_eq!(SessionConfig::DEFAULT.group_bounds(15), (13, 15));
        assert!(config.is_complete(25));
        assert!(!config.is_complete(24));
    }

    #[test]
    fn state_is_clamped_and_reports_visibility() {
        let state = SessionState::new(0, 9);
        assert_eq!(state, SessionState { difficulty_level: 1, visual_support_level: 5 });
        assert!(state.shows_visuals());
        assert!(!SessionState::starting(false).shows_visuals());
        assert_eq!(SessionState::starting(true).visual_support_level, 3);
    }
}
