use std::fmt;

use serde::{Deserialize, Serialize};

use crate::adaptation::rules::AdaptationRules;

pub const DEFAULT_MIN_SESSIONS_FOR_FLUENT: u32 = 3;

const NEEDS_DATA_BELOW_SESSIONS: u32 = 2;
const SUPPORT_BELOW_ACCURACY: f64 = 0.50;
const FLUENT_ACCURACY: f64 = 0.85;

/// Number of recent visual levels inspected by [`compute_visual_trend`].
pub const TREND_WINDOW: usize = 3;

/// Mastery classification for one student on one skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FluencyStatus {
    NotStarted,
    NeedsData,
    NeedsSupport,
    Developing,
    Progressing,
    Fluent,
}

impl FluencyStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            FluencyStatus::NotStarted   => "not_started",
            FluencyStatus::NeedsData    => "needs_data",
            FluencyStatus::NeedsSupport => "needs_support",
            FluencyStatus::Developing   => "developing",
            FluencyStatus::Progressing  => "progressing",
            FluencyStatus::Fluent       => "fluent",
        }
    }
}

impl fmt::Display for FluencyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify fluency from aggregate session statistics.
///
/// Checks run in order: session count, accuracy, difficulty coverage, then
/// speed. A student who is accurate and fast but has not yet reached the
/// skill's top difficulty is `Progressing`, not `Fluent`.
pub fn compute_fluency_status(
    accuracy: f64,
    avg_time_ms: f64,
    sessions_completed: u32,
    max_difficulty_reached: u8,
    skill_max_difficulty: u8,
    min_sessions_for_fluent: u32,
) -> FluencyStatus {
    if sessions_completed == 0 {
        FluencyStatus::NotStarted
    } else if sessions_completed < NEEDS_DATA_BELOW_SESSIONS {
        FluencyStatus::NeedsData
    } else if accuracy < SUPPORT_BELOW_ACCURACY {
        FluencyStatus::NeedsSupport
    } else if accuracy < FLUENT_ACCURACY || sessions_completed < min_sessions_for_fluent {
        FluencyStatus::Developing
    } else if max_difficulty_reached < skill_max_difficulty {
        FluencyStatus::Progressing
    } else if avg_time_ms <= AdaptationRules::DEFAULT.slow_ms {
        FluencyStatus::Fluent
    } else {
        FluencyStatus::Progressing
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualTrend {
    Decreasing,
    Increasing,
    Stable,
}

impl fmt::Display for VisualTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VisualTrend::Decreasing => "decreasing",
            VisualTrend::Increasing => "increasing",
            VisualTrend::Stable     => "stable",
        })
    }
}

/// Direction of the last three visual levels, oldest first.
pub fn compute_visual_trend(visual_levels: &[u8]) -> VisualTrend {
    if visual_levels.len() < TREND_WINDOW {
        return VisualTrend::Stable;
    }
    let window = &visual_levels[visual_levels.len() - TREND_WINDOW..];
    let (first, last) = (window[0], window[TREND_WINDOW - 1]);
    match last.cmp(&first) {
        std::cmp::Ordering::Less    => VisualTrend::Decreasing,
        std::cmp::Ordering::Greater => VisualTrend::Increasing,
        std::cmp::Ordering::Equal   => VisualTrend::Stable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(accuracy: f64, avg_ms: f64, sessions: u32, reached: u8) -> FluencyStatus {
        compute_fluency_status(accuracy, avg_ms, sessions, reached, 5, DEFAULT_MIN_SESSIONS_FOR_FLUENT)
    }

    #[test]
    fn session_count_gates_come_first() {
        assert_eq!(status(1.0, 5000.0, 0, 5), FluencyStatus::NotStarted);
        assert_eq!(status(1.0, 5000.0, 1, 5), FluencyStatus::NeedsData);
    }

    #[test]
    fn low_accuracy_needs_support() {
        assert_eq!(status(0.3, 5000.0, 4, 2), FluencyStatus::NeedsSupport);
        assert_eq!(status(0.5, 5000.0, 4, 2), FluencyStatus::Developing);
    }

    #[test]
    fn fluent_requires_enough_sessions() {
        assert_eq!(status(0.95, 5000.0, 2, 5), FluencyStatus::Developing);
        assert_eq!(status(0.95, 5000.0, 3, 5), FluencyStatus::Fluent);
    }

    #[test]
    fn accurate_but_not_at_top_difficulty_is_progressing() {
        assert_eq!(status(0.9, 8000.0, 5, 3), FluencyStatus::Progressing);
    }

    #[test]
    fn slow_at_top_difficulty_is_progressing() {
        assert_eq!(status(0.9, 20_000.0, 5, 5), FluencyStatus::Fluent);
        assert_eq!(status(0.9, 20_001.0, 5, 5), FluencyStatus::Progressing);
    }

    #[test]
    fn status_serializes_as_snake_case() {
        assert_eq!(serde_json::to_string(&FluencyStatus::NeedsSupport).unwrap(), "\"needs_support\"");
        assert_eq!(FluencyStatus::NotStarted.to_string(), "not_started");
    }

    #[test]
    fn trend_uses_last_three_levels() {
        assert_eq!(compute_visual_trend(&[]), VisualTrend::Stable);
        assert_eq!(compute_visual_trend(&[5, 1]), VisualTrend::Stable);
        assert_eq!(compute_visual_trend(&[4, 3, 2]), VisualTrend::Decreasing);
        assert_eq!(compute_visual_trend(&[1, 2, 3]), VisualTrend::Increasing);
        assert_eq!(compute_visual_trend(&[3, 1, 3]), VisualTrend::Stable);
        // Only the trailing window counts.
        assert_eq!(compute_visual_trend(&[5, 4, 3, 1, 2, 3]), VisualTrend::Increasing);
    }
}
