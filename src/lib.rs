//! # numbersense_engine
//!
//! An offline, deterministic math-practice engine for fractions, integers and
//! multiplication.
//!
//! The crate has two halves that an orchestrator stitches together:
//!
//! - The **problem generator** ([`practice_engine`]) builds one problem of a
//!   requested type at difficulty 1–5. Each problem carries a prompt, the
//!   canonical answer, optional multiple-choice options, a visual scaffold
//!   (fraction bars, number line, array model, …) and a short explanation.
//! - The **adaptation engine** ([`adaptation`]) looks at each completed group
//!   of problems and moves the student along two axes: visual support fades
//!   first, then difficulty rises with visuals restored.
//!
//! ## How a session runs
//!
//! 1. Look up the [`SessionConfig`] for the skill's problem type.
//! 2. For each sequence number, call [`generate_problem`] at the current
//!    difficulty and send [`Problem::display_view`] to the student.
//! 3. Grade with [`check_answer`].
//! 4. At a group boundary, feed the group into [`adapt_after_group`] and carry
//!    the new levels into the next group.
//!
//! ## Key features
//!
//! - **Deterministic**: every generator takes an injected `rand::Rng`; pass a
//!   seeded `StdRng` (or `rng_seed: Some(..)` on a [`ProblemRequest`]) to get
//!   the same problem every time.
//! - **Coverage-aware multiplication**: pass the facts already practiced in
//!   [`GenerationConfig::seen_facts`] and unseen facts are drawn first.
//! - **Answer-safe display**: the displayed view never contains the answer or
//!   answer-revealing hint fields; the full hint comes back only in feedback.
//!
//! ## Quick start
//!
//! ```rust
//! use numbersense_engine::{
//!     adapt_after_group, check_answer, generate_problem, get_session_config,
//!     GenerationConfig, SessionState,
//! };
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let config = get_session_config("integer_addition");
//! let mut state = SessionState::starting(true);
//! let mut group = Vec::new();
//!
//! for seq in 1..=config.group_size {
//!     let problem = generate_problem(
//!         &mut rng,
//!         "integer_addition",
//!         state.difficulty_level,
//!         &GenerationConfig::default(),
//!     )
//!     .unwrap();
//!     let view = problem.display_view(state.shows_visuals());
//!     println!("{seq}. {}", view["prompt"]);
//!
//!     let feedback = check_answer(&problem, &problem.correct_answer);
//!     group.push(feedback.is_correct);
//! }
//!
//! let decision = adapt_after_group(
//!     &group,
//!     &[6000, 7000, 5000],
//!     state.difficulty_level,
//!     state.visual_support_level,
//!     5,
//! );
//! state.apply(&decision);
//! println!("{}", decision.reason);
//! assert_eq!(state.visual_support_level, 2);
//! ```

pub mod adaptation;
pub mod error;
pub mod practice_engine;
pub mod presentation;

pub use error::EngineError;

// Convenience re-exports so callers can use `numbersense_engine::generate_problem`
// directly without reaching into submodules.
pub use adaptation::{
    adapt_after_group, compute_fluency_status, compute_visual_trend, get_group_number,
    get_session_config, is_group_boundary, AdaptationDecision, AdaptationRules, FluencyStatus,
    GroupOutcome, GroupResult, SessionConfig, SessionState, VisualTrend,
};
pub use practice_engine::{
    generate, generate_practice, generate_problem, FactCoverage, GenerationConfig, Problem,
    ProblemDetails, ProblemRequest, ProblemType, VisualHint,
};
pub use presentation::{check_answer, AnswerFeedback};
