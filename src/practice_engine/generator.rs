use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::Result;
use crate::practice_engine::{
    curriculum::{MAX_DIFFICULTY, MIN_DIFFICULTY},
    models::{GenerationConfig, Problem, ProblemRequest, ProblemType},
    topics::{fractions, integers, multiplication},
};

/// Core dispatch: routes a problem type to its generator.
///
/// `difficulty` is clamped into `1..=5`.
pub fn generate<R: Rng>(
    rng: &mut R,
    problem_type: ProblemType,
    difficulty: u8,
    config: &GenerationConfig,
) -> Problem {
    let difficulty = difficulty.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY);

    let problem = match problem_type {
        ProblemType::FractionComparison =>
            fractions::generate_comparison(rng, difficulty, config),

        ProblemType::FractionComparisonBenchmark =>
            fractions::generate_benchmark(rng, difficulty, config),

        ProblemType::EquivalentFractions =>
            fractions::generate_equivalent(rng, difficulty, config),

        ProblemType::FractionNumberLine =>
            fractions::generate_number_line(rng, difficulty, config),

        ProblemType::IntegerAddition =>
            integers::generate_addition(rng, difficulty, config),

        ProblemType::IntegerSubtraction =>
            integers::generate_subtraction(rng, difficulty, config),

        ProblemType::IntegerMagnitude =>
            integers::generate_magnitude(rng, difficulty, config),

        ProblemType::IntegerNumberLine =>
            integers::generate_number_line(rng, difficulty, config),

        ProblemType::MultiplicationFacts =>
            multiplication::generate_facts(rng, difficulty, config),

        ProblemType::MultiplicationRelatedFacts =>
            multiplication::generate_related_facts(rng, difficulty, config),

        ProblemType::MultiplicationScaling =>
            multiplication::generate_scaling(rng, difficulty, config),
    };

    tracing::debug!(
        problem_type = %problem_type,
        difficulty,
        hint = problem.visual_hint.kind(),
        "generated problem"
    );
    problem
}

/// Generate a problem from its string tag.
///
/// # Errors
///
/// Returns [`EngineError::UnknownProblemType`](crate::EngineError::UnknownProblemType)
/// when `problem_type` names no known generator.
pub fn generate_problem<R: Rng>(
    rng: &mut R,
    problem_type: &str,
    difficulty: u8,
    config: &GenerationConfig,
) -> Result<Problem> {
    let problem_type: ProblemType = problem_type.parse()?;
    Ok(generate(rng, problem_type, difficulty, config))
}

/// Generate from a request, seeding the RNG when `rng_seed` is set.
pub fn generate_practice(request: &ProblemRequest) -> Problem {
    let mut rng: StdRng = match request.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None       => StdRng::from_entropy(),
    };
    generate(&mut rng, request.problem_type, request.difficulty, &request.config)
}
