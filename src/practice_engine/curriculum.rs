//! Difficulty tables and the bounded samplers built on them.
//!
//! Every table has one row per difficulty level (1..=5). Levels outside that
//! range are clamped, so callers never index out of bounds.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::practice_engine::models::FractionValue;

pub const MIN_DIFFICULTY: u8 = 1;
pub const MAX_DIFFICULTY: u8 = 5;

/// Retry budget for every rejection-sampling loop.
pub const SAMPLE_ATTEMPTS: usize = 50;

/// Used when fraction sampling exhausts its retries.
pub const FALLBACK_FRACTION: FractionValue = FractionValue::new(1, 2);

/// Zero-based row for a difficulty level.
pub fn level_index(difficulty: u8) -> usize {
    usize::from(difficulty.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY) - MIN_DIFFICULTY)
}

// ---------------------------------------------------------------------------
// Fractions
// ---------------------------------------------------------------------------

const DENOMINATORS: [&[u32]; 5] = [
    &[2, 3, 4],
    &[2, 3, 4, 5, 6],
    &[2, 3, 4, 5, 6, 8, 10],
    &[3, 4, 5, 6, 7, 8, 9, 10, 12],
    &[3, 5, 6, 7, 8, 9, 10, 11, 12],
];

const EQUIVALENCE_MULTIPLIERS: [&[u32]; 5] = [
    &[2, 3],
    &[2, 3],
    &[2, 3, 4],
    &[2, 3, 4, 5, 6],
    &[2, 3, 4, 5, 6],
];

pub fn denominators(difficulty: u8) -> &'static [u32] {
    DENOMINATORS[level_index(difficulty)]
}

pub fn equivalence_multipliers(difficulty: u8) -> &'static [u32] {
    EQUIVALENCE_MULTIPLIERS[level_index(difficulty)]
}

/// Sample a proper fraction for `difficulty`, resampling while `reject` holds.
///
/// Falls back to [`FALLBACK_FRACTION`] after [`SAMPLE_ATTEMPTS`] rejections.
pub fn pick_fraction<R: Rng>(
    rng: &mut R,
    difficulty: u8,
    reject: impl Fn(FractionValue) -> bool,
) -> FractionValue {
    let pool = denominators(difficulty);
    for _ in 0..SAMPLE_ATTEMPTS {
        let Some(&denominator) = pool.choose(rng) else { break };
        let numerator = rng.gen_range(1..denominator);
        let fraction = FractionValue::new(numerator, denominator);
        if !reject(fraction) {
            return fraction;
        }
    }
    tracing::warn!(difficulty, "fraction sampling exhausted retries; using fallback");
    FALLBACK_FRACTION
}

/// Every proper fraction reachable at `difficulty`, in table order.
pub fn all_fractions(difficulty: u8) -> impl Iterator<Item = FractionValue> {
    denominators(difficulty)
        .iter()
        .flat_map(|&d| (1..d).map(move |n| FractionValue::new(n, d)))
}

// ---------------------------------------------------------------------------
// Integers
// ---------------------------------------------------------------------------

const INTEGER_RANGES: [(i32, i32); 5] = [(-10, 10), (-20, 20), (-50, 50), (-100, 100), (-200, 200)];

pub fn integer_range(difficulty: u8) -> (i32, i32) {
    INTEGER_RANGES[level_index(difficulty)]
}

/// Operand sign layouts forced at difficulty 3 and above.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignPattern {
    PosNeg,
    NegPos,
    NegNeg,
    Mixed,
}

impl SignPattern {
    pub const ALL: [SignPattern; 4] =
        [SignPattern::PosNeg, SignPattern::NegPos, SignPattern::NegNeg, SignPattern::Mixed];
}

/// Two operands with the sign mix the level calls for.
///
/// Level 1 leaves signs free, level 2 guarantees at least one negative and
/// level 3+ draws a [`SignPattern`] per call.
pub fn pick_int_operands<R: Rng>(rng: &mut R, difficulty: u8) -> (i32, i32) {
    let (lo, hi) = integer_range(difficulty);
    match level_index(difficulty) {
        0 => (rng.gen_range(lo..=hi), rng.gen_range(lo..=hi)),
        1 => {
            if rng.gen_bool(0.5) {
                (rng.gen_range(lo..=-1), rng.gen_range(lo..=hi))
            } else {
                (rng.gen_range(lo..=hi), rng.gen_range(lo..=-1))
            }
        }
        _ => {
            let pattern = *SignPattern::ALL.choose(rng).unwrap_or(&SignPattern::Mixed);
            match pattern {
                SignPattern::PosNeg => (rng.gen_range(1..=hi), rng.gen_range(lo..=-1)),
                SignPattern::NegPos => (rng.gen_range(lo..=-1), rng.gen_range(1..=hi)),
                SignPattern::NegNeg => (rng.gen_range(lo..=-1), rng.gen_range(lo..=-1)),
                SignPattern::Mixed  => (rng.gen_range(lo..=hi), rng.gen_range(lo..=hi)),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Multiplication
// ---------------------------------------------------------------------------

/// Factors introduced at a level, and factors kept in rotation from earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactLevel {
    pub focus: &'static [u32],
    pub review: &'static [u32],
}

pub const MULTIPLICATION_CURRICULUM: [FactLevel; 5] = [
    FactLevel { focus: &[0, 1, 2], review: &[] },
    FactLevel { focus: &[3, 4, 5], review: &[0, 1, 2] },
    FactLevel { focus: &[6, 7, 8], review: &[0, 1, 2, 3, 4, 5] },
    FactLevel { focus: &[9, 10], review: &[0, 1, 2, 3, 4, 5, 6, 7, 8] },
    FactLevel { focus: &[9, 10, 11, 12], review: &[0, 1, 2, 3, 4, 5, 6, 7, 8] },
];

pub fn fact_level(difficulty: u8) -> &'static FactLevel {
    &MULTIPLICATION_CURRICULUM[level_index(difficulty)]
}

const MULTIPLICATION_RANGES: [(u32, u32); 5] = [(0, 5), (0, 7), (2, 8), (2, 10), (2, 12)];

/// Factor window for related-fact and scaling problems.
pub fn multiplication_range(difficulty: u8) -> (u32, u32) {
    MULTIPLICATION_RANGES[level_index(difficulty)]
}

/// Random factor from the level's window, never below 2.
pub fn pick_factor<R: Rng>(rng: &mut R, difficulty: u8) -> u32 {
    let (lo, hi) = multiplication_range(difficulty);
    rng.gen_range(lo.max(2)..=hi)
}
