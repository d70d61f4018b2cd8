//! Adaptive progression between problem groups.
//!
//! | Module        | Responsibility                                          |
//! |---------------|---------------------------------------------------------|
//! | [`rules`]     | `adapt_after_group`: advance / hold / retreat decisions |
//! | [`session`]   | session length, grouping and the current level pair     |
//! | [`reporting`] | fluency status and visual-support trend for dashboards  |

pub mod reporting;
pub mod rules;
pub mod session;

pub use reporting::{compute_fluency_status, compute_visual_trend, FluencyStatus, VisualTrend};
pub use rules::{
    adapt_after_group, AdaptationDecision, AdaptationRules, GroupOutcome, GroupResult,
    DEFAULT_MAX_DIFFICULTY,
};
pub use session::{
    get_group_number, get_session_config, is_group_boundary, SessionConfig, SessionState,
};
