use rand::seq::SliceRandom;
use rand::Rng;

use crate::practice_engine::{
    coverage::pick_fact,
    curriculum::{pick_factor, SAMPLE_ATTEMPTS},
    helpers::{problem, relation_choices, shuffled},
    models::{
        ArrayDims, ArrayModelHint, DistributiveSplit, GenerationConfig, KnownFact, Problem,
        ProblemDetails, ProblemType, RelatedVariation, Relation, VisualHint,
    },
};

pub const SPLIT_LEFT_COLOR: &str = "blue";
pub const SPLIT_RIGHT_COLOR: &str = "orange";

/// Friendly column split for the distributive highlight.
///
/// Needs at least two rows; columns split as 10+rest, 5+rest, 3+2, 2+2 or 2+1.
pub fn distributive_split(rows: u32, cols: u32) -> Option<DistributiveSplit> {
    if rows < 2 {
        return None;
    }
    let (left_cols, right_cols) = match cols {
        11..    => (10, cols - 10),
        6..=10  => (5, cols - 5),
        5       => (3, 2),
        4       => (2, 2),
        3       => (2, 1),
        _       => return None,
    };
    Some(DistributiveSplit {
        left_cols,
        right_cols,
        left_color: SPLIT_LEFT_COLOR.to_string(),
        right_color: SPLIT_RIGHT_COLOR.to_string(),
    })
}

/// Smaller factor as rows, larger as columns.
pub fn array_model(a: u32, b: u32) -> ArrayModelHint {
    let rows = a.min(b);
    let cols = a.max(b);
    ArrayModelHint {
        rows,
        cols,
        distributive: distributive_split(rows, cols),
        highlight: None,
    }
}

pub fn generate_facts<R: Rng>(
    rng: &mut R,
    difficulty: u8,
    config: &GenerationConfig,
) -> Problem {
    let (a, b) = pick_fact(rng, difficulty, &config.seen_facts);
    let product = a * b;
    let hint = array_model(a, b);

    let mut explanation = format!("{a} × {b} = {product}");
    if let Some(split) = &hint.distributive {
        let rows = hint.rows;
        let left = rows * split.left_cols;
        let right = rows * split.right_cols;
        explanation.push_str(&format!(
            ". Split {rows} × {} into {rows} × {} = {left} and {rows} × {} = {right}; {left} + {right} = {product}",
            hint.cols, split.left_cols, split.right_cols
        ));
    }

    problem(
        ProblemType::MultiplicationFacts,
        difficulty,
        format!("What is {a} × {b}?"),
        product.to_string(),
        None,
        VisualHint::ArrayModel(hint),
        explanation,
        ProblemDetails::MultiplicationFact { factors: [a, b] },
    )
}

pub fn generate_related_facts<R: Rng>(
    rng: &mut R,
    difficulty: u8,
    _config: &GenerationConfig,
) -> Problem {
    let a = pick_factor(rng, difficulty);
    let b = pick_factor(rng, difficulty);
    let known = a * b;

    let mut variation = *[
        RelatedVariation::Double,
        RelatedVariation::Half,
        RelatedVariation::PlusOne,
        RelatedVariation::Commutative,
    ]
    .choose(rng)
    .unwrap_or(&RelatedVariation::Commutative);
    if variation == RelatedVariation::Half && a % 2 != 0 {
        variation = RelatedVariation::Commutative;
    }

    let (x, y) = match variation {
        RelatedVariation::Double      => (a * 2, b),
        RelatedVariation::Half        => (a / 2, b),
        RelatedVariation::PlusOne     => (a + 1, b),
        RelatedVariation::Commutative => (b, a),
    };
    let answer = x * y;
    let explanation = match variation {
        RelatedVariation::Double => {
            format!("{x} × {y} = 2 × ({a} × {b}) = 2 × {known} = {answer}")
        }
        RelatedVariation::Half => {
            format!("{x} × {y} = half of ({a} × {b}) = {known} ÷ 2 = {answer}")
        }
        RelatedVariation::PlusOne => {
            format!("{x} × {y} = {a} × {b} + {b} = {known} + {b} = {answer}")
        }
        RelatedVariation::Commutative => {
            format!("{x} × {y} = {a} × {b} = {known}, because order does not change a product")
        }
    };

    let hint = ArrayModelHint {
        rows: a,
        cols: b,
        distributive: None,
        highlight: Some(variation),
    };

    problem(
        ProblemType::MultiplicationRelatedFacts,
        difficulty,
        format!("If {a} × {b} = {known}, what is {x} × {y}?"),
        answer.to_string(),
        None,
        VisualHint::ArrayModel(hint),
        explanation,
        ProblemDetails::RelatedFact {
            known: KnownFact { a, b, product: known },
            variation,
        },
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScalingMode {
    Judgment,
    Estimate,
    CompareProducts,
}

pub fn generate_scaling<R: Rng>(
    rng: &mut R,
    difficulty: u8,
    config: &GenerationConfig,
) -> Problem {
    let mode = *[ScalingMode::Judgment, ScalingMode::Estimate, ScalingMode::CompareProducts]
        .choose(rng)
        .unwrap_or(&ScalingMode::Judgment);
    match mode {
        ScalingMode::Judgment        => scaling_judgment(rng, difficulty, config),
        ScalingMode::Estimate        => scaling_estimate(rng, difficulty, config),
        ScalingMode::CompareProducts => scaling_compare(rng, difficulty, config),
    }
}

fn scaling_judgment<R: Rng>(rng: &mut R, difficulty: u8, _config: &GenerationConfig) -> Problem {
    let base = pick_factor(rng, difficulty);
    let scale = rng.gen_range(2..=5u32);
    let multiplier = *[0, 1, scale].choose(rng).unwrap_or(&scale);

    let (answer, explanation) = match multiplier {
        0 => ("zero", format!("Any number × 0 = 0, so {base} × 0 = 0")),
        1 => ("same", format!("Any number × 1 stays the same, so {base} × 1 = {base}")),
        m => (
            "bigger",
            format!("{base} × {m} = {}, which is bigger than {base}", base * m),
        ),
    };

    problem(
        ProblemType::MultiplicationScaling,
        difficulty,
        format!("Is {base} × {multiplier} bigger than, smaller than, or equal to {base}?"),
        answer,
        Some(["bigger", "same", "zero", "smaller"].iter().map(|s| s.to_string()).collect()),
        VisualHint::ScalingBar { base_value: base, multiplier },
        explanation,
        ProblemDetails::ScalingJudgment { base, multiplier },
    )
}

/// `product` followed by three distinct nearby distractors.
fn estimate_options<R: Rng>(rng: &mut R, product: u32) -> Vec<u32> {
    let mut options = vec![product];
    for slot in 0..3 {
        let mut picked = None;
        for _ in 0..SAMPLE_ATTEMPTS {
            let candidate = match slot {
                0 => product + rng.gen_range(1..=10),
                1 if product > 1 => product - rng.gen_range(1..=(product - 1).min(10)),
                _ => product + rng.gen_range(10..=20),
            };
            if !options.contains(&candidate) {
                picked = Some(candidate);
                break;
            }
        }
        let value = picked.unwrap_or_else(|| {
            (product + 21..)
                .find(|v| !options.contains(v))
                .unwrap_or(product + 21)
        });
        options.push(value);
    }
    options
}

fn scaling_estimate<R: Rng>(rng: &mut R, difficulty: u8, _config: &GenerationConfig) -> Problem {
    let a = pick_factor(rng, difficulty);
    let b = pick_factor(rng, difficulty);
    let product = a * b;
    let options = estimate_options(rng, product);
    let choices = shuffled(rng, options.iter().map(u32::to_string).collect());

    problem(
        ProblemType::MultiplicationScaling,
        difficulty,
        format!("Which is closest to {a} × {b}?"),
        product.to_string(),
        Some(choices),
        VisualHint::ArrayModel(array_model(a, b)),
        format!("{a} × {b} = {product}"),
        ProblemDetails::ScalingEstimate { factors: [a, b] },
    )
}

fn scaling_compare<R: Rng>(rng: &mut R, difficulty: u8, _config: &GenerationConfig) -> Problem {
    let left = [pick_factor(rng, difficulty), pick_factor(rng, difficulty)];
    let right = [pick_factor(rng, difficulty), pick_factor(rng, difficulty)];
    let p1 = left[0] * left[1];
    let p2 = right[0] * right[1];
    let relation = Relation::from(p1.cmp(&p2));

    problem(
        ProblemType::MultiplicationScaling,
        difficulty,
        format!(
            "Without calculating exactly: {} × {} ___ {} × {}",
            left[0], left[1], right[0], right[1]
        ),
        relation.symbol(),
        Some(relation_choices()),
        VisualHint::DoubleArray {
            left: ArrayDims { rows: left[0], cols: left[1] },
            right: ArrayDims { rows: right[0], cols: right[1] },
        },
        format!(
            "{} × {} = {p1} and {} × {} = {p2}, so the left side is {} the right",
            left[0],
            left[1],
            right[0],
            right[1],
            relation.words()
        ),
        ProblemDetails::ScalingCompare { left, right },
    )
}
