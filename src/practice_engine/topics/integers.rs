use rand::seq::SliceRandom;
use rand::Rng;

use crate::practice_engine::{
    curriculum::{integer_range, pick_int_operands, SAMPLE_ATTEMPTS},
    helpers::{operand, padded_window, problem, relation_choices, shuffled},
    models::{
        CounterModel, Counters, GenerationConfig, IntegerOperation, Jump, MagnitudeQuestion,
        NumberLineHint, Problem, ProblemDetails, ProblemType, Relation, VisualHint,
    },
};

/// Multiple-choice candidates shown for integer number-line problems.
pub const NUMBER_LINE_CHOICES: usize = 4;

/// Zero pairs that must be added before `remove` counters can be taken away
/// from a pile representing `start`.
pub fn zero_pairs_needed(start: i32, remove: i32) -> u32 {
    let available = if remove >= 0 {
        start.max(0).unsigned_abs()
    } else {
        start.min(0).unsigned_abs()
    };
    remove.unsigned_abs().saturating_sub(available)
}

fn direction(step: i32) -> &'static str {
    if step > 0 { "right" } else { "left" }
}

pub fn generate_addition<R: Rng>(
    rng: &mut R,
    difficulty: u8,
    _config: &GenerationConfig,
) -> Problem {
    let (a, b) = pick_int_operands(rng, difficulty);
    let result = a + b;
    let (line_min, line_max) = padded_window(&[0, a, result]);

    let hint = NumberLineHint {
        line_min,
        line_max,
        jump: Some(Jump { start: a, step: b, result: Some(result) }),
        counters: Some(CounterModel::Addition {
            first: Counters::for_value(a),
            second: Counters::for_value(b),
        }),
        ..NumberLineHint::default()
    };

    let explanation = if b == 0 {
        format!("Start at {a}; adding 0 leaves you at {result}")
    } else {
        format!(
            "Start at {a}, move {} to the {} to reach {result}",
            b.unsigned_abs(),
            direction(b)
        )
    };

    problem(
        ProblemType::IntegerAddition,
        difficulty,
        format!("What is {a} + {}?", operand(b)),
        result.to_string(),
        None,
        VisualHint::NumberLine(hint),
        explanation,
        ProblemDetails::IntegerOperation {
            operands: [a, b],
            operation: IntegerOperation::Add,
        },
    )
}

pub fn generate_subtraction<R: Rng>(
    rng: &mut R,
    difficulty: u8,
    _config: &GenerationConfig,
) -> Problem {
    let (a, b) = pick_int_operands(rng, difficulty);
    let result = a - b;
    let (line_min, line_max) = padded_window(&[0, a, result]);
    let zero_pairs = zero_pairs_needed(a, b);

    let hint = NumberLineHint {
        line_min,
        line_max,
        jump: Some(Jump { start: a, step: -b, result: Some(result) }),
        counters: Some(CounterModel::Subtraction {
            start: Counters::for_value(a),
            remove: Counters::for_value(b),
            zero_pairs,
        }),
        ..NumberLineHint::default()
    };

    let mut explanation = if b == 0 {
        format!("Start at {a}; subtracting 0 leaves you at {result}")
    } else {
        format!(
            "Start at {a}, subtract {} by moving {} to the {} to reach {result}",
            operand(b),
            b.unsigned_abs(),
            direction(-b)
        )
    };
    if zero_pairs > 0 {
        let color = if b > 0 { "yellow" } else { "red" };
        explanation.push_str(&format!(
            ". With counters, add {zero_pairs} zero pair{} so there are enough {color} counters to take away",
            if zero_pairs == 1 { "" } else { "s" }
        ));
    }

    problem(
        ProblemType::IntegerSubtraction,
        difficulty,
        format!("What is {a} - {}?", operand(b)),
        result.to_string(),
        None,
        VisualHint::NumberLine(hint),
        explanation,
        ProblemDetails::IntegerOperation {
            operands: [a, b],
            operation: IntegerOperation::Subtract,
        },
    )
}

/// Second value for magnitude questions: distinct, with a distinct absolute value.
fn magnitude_partner<R: Rng>(rng: &mut R, a: i32, lo: i32, hi: i32) -> i32 {
    for _ in 0..SAMPLE_ATTEMPTS {
        let b = rng.gen_range(lo..=hi);
        if b != a && b.abs() != a.abs() {
            return b;
        }
    }
    tracing::warn!(a, "magnitude sampling exhausted retries; using neighbour");
    if a < hi { a + 1 } else { a - 1 }
}

pub fn generate_magnitude<R: Rng>(
    rng: &mut R,
    difficulty: u8,
    _config: &GenerationConfig,
) -> Problem {
    let (lo, hi) = integer_range(difficulty);
    let a = rng.gen_range(lo..=hi);
    let b = magnitude_partner(rng, a, lo, hi);
    let question = *[
        MagnitudeQuestion::CloserToZero,
        MagnitudeQuestion::FartherFromZero,
        MagnitudeQuestion::Compare,
    ]
    .choose(rng)
    .unwrap_or(&MagnitudeQuestion::Compare);

    let (closer, farther) = if a.abs() < b.abs() { (a, b) } else { (b, a) };
    let (prompt, answer, choices, conclusion) = match question {
        MagnitudeQuestion::CloserToZero => (
            format!("Which is closer to zero: {a} or {b}?"),
            closer.to_string(),
            vec![a.to_string(), b.to_string()],
            format!("{closer} is closer to zero"),
        ),
        MagnitudeQuestion::FartherFromZero => (
            format!("Which is farther from zero: {a} or {b}?"),
            farther.to_string(),
            vec![a.to_string(), b.to_string()],
            format!("{farther} is farther from zero"),
        ),
        MagnitudeQuestion::Compare => {
            let relation = Relation::from(a.cmp(&b));
            (
                format!("Compare: {a} ___ {b}"),
                relation.symbol().to_string(),
                relation_choices(),
                format!(
                    "{a} is to the {} of {b} on the number line, so {a} {relation} {b}",
                    if a < b { "left" } else { "right" }
                ),
            )
        }
    };

    let (line_min, line_max) = padded_window(&[a, b, 0]);
    let hint = NumberLineHint {
        line_min,
        line_max,
        points: vec![a, b, 0],
        ..NumberLineHint::default()
    };

    problem(
        ProblemType::IntegerMagnitude,
        difficulty,
        prompt,
        answer,
        Some(choices),
        VisualHint::NumberLine(hint),
        format!("|{a}| = {} and |{b}| = {}; {conclusion}", a.abs(), b.abs()),
        ProblemDetails::IntegerMagnitude { values: [a, b], question },
    )
}

pub fn generate_number_line<R: Rng>(
    rng: &mut R,
    difficulty: u8,
    _config: &GenerationConfig,
) -> Problem {
    let (lo, hi) = integer_range(difficulty);
    let target = rng.gen_range(lo..=hi);

    let mut candidates = vec![target];
    let mut attempts = 0;
    while candidates.len() < NUMBER_LINE_CHOICES && attempts < SAMPLE_ATTEMPTS {
        attempts += 1;
        let candidate = rng.gen_range(lo..=hi);
        if !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    }
    for candidate in lo..=hi {
        if candidates.len() == NUMBER_LINE_CHOICES {
            break;
        }
        if !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    }
    let choices = shuffled(rng, candidates.iter().map(i32::to_string).collect());

    let hint = NumberLineHint {
        line_min: lo,
        line_max: hi,
        marked_position: Some(f64::from(target)),
        ..NumberLineHint::default()
    };

    problem(
        ProblemType::IntegerNumberLine,
        difficulty,
        "Which integer is shown on the number line?".to_string(),
        target.to_string(),
        Some(choices),
        VisualHint::NumberLine(hint),
        format!(
            "The point is {} steps {} of zero, at {target}",
            target.unsigned_abs(),
            if target < 0 { "left" } else { "right" }
        ),
        ProblemDetails::IntegerNumberLine { position: target, line_min: lo, line_max: hi },
    )
}
