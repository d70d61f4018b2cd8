use rand::seq::SliceRandom;
use rand::Rng;

use crate::practice_engine::{
    curriculum::{all_fractions, equivalence_multipliers, pick_fraction, SAMPLE_ATTEMPTS},
    helpers::{problem, relation_choices, shuffled},
    models::{
        Benchmark, FractionBarsHint, FractionValue, GenerationConfig, MissingPart,
        NumberLineHint, Problem, ProblemDetails, ProblemType, Relation, VisualHint,
    },
};

/// Number-line candidates must sit further apart than this.
pub const MIN_CHOICE_GAP: f64 = 0.05;

/// Multiple-choice candidates shown for number-line problems.
pub const NUMBER_LINE_CHOICES: usize = 4;

/// Move the numerator one step while keeping the fraction proper.
fn nudge(fraction: FractionValue) -> FractionValue {
    let FractionValue { numerator, denominator } = fraction;
    if numerator + 1 < denominator {
        FractionValue::new(numerator + 1, denominator)
    } else if numerator > 1 {
        FractionValue::new(numerator - 1, denominator)
    } else {
        fraction
    }
}

pub fn generate_comparison<R: Rng>(
    rng: &mut R,
    difficulty: u8,
    _config: &GenerationConfig,
) -> Problem {
    let left = pick_fraction(rng, difficulty, |_| false);
    let mut right = pick_fraction(rng, difficulty, |f| f.same_value(left));
    if right.same_value(left) {
        right = nudge(right);
    }
    let relation = Relation::from(left.cmp_value(right));

    let hint = FractionBarsHint {
        left_value: left.value(),
        left_numerator: left.numerator,
        left_denominator: left.denominator,
        right_value: Some(right.value()),
        right_numerator: Some(right.numerator),
        right_denominator: Some(right.denominator),
        ..FractionBarsHint::default()
    };

    problem(
        ProblemType::FractionComparison,
        difficulty,
        format!("Compare: {left} ___ {right}"),
        relation.symbol(),
        Some(relation_choices()),
        VisualHint::FractionBars(hint),
        format!(
            "{left} = {:.3} and {right} = {:.3}, so {left} {relation} {right}",
            left.value(),
            right.value()
        ),
        ProblemDetails::FractionComparison { left, right },
    )
}

pub fn generate_benchmark<R: Rng>(
    rng: &mut R,
    difficulty: u8,
    _config: &GenerationConfig,
) -> Problem {
    let benchmark = if difficulty <= 2 {
        Benchmark::Half
    } else {
        *Benchmark::ALL.choose(rng).unwrap_or(&Benchmark::Half)
    };
    let fraction = pick_fraction(rng, difficulty, |_| false);
    let bench = benchmark.fraction();
    let relation = Relation::from(fraction.cmp_value(bench));
    let label = benchmark.label();

    // Re-express the benchmark over the fraction's denominator so both share a bar.
    let common_numerator = (bench.value() * f64::from(fraction.denominator)).round() as u32;

    let hint = FractionBarsHint {
        left_value: fraction.value(),
        left_numerator: fraction.numerator,
        left_denominator: fraction.denominator,
        right_value: Some(bench.value()),
        right_numerator: Some(common_numerator),
        right_denominator: Some(fraction.denominator),
        right_label: Some(label.to_string()),
        ..FractionBarsHint::default()
    };

    problem(
        ProblemType::FractionComparisonBenchmark,
        difficulty,
        format!("Is {fraction} less than, equal to, or greater than {label}?"),
        relation.symbol(),
        Some(relation_choices()),
        VisualHint::FractionBars(hint),
        format!(
            "{fraction} = {:.3} and the benchmark {label} = {:.3}, so {fraction} is {} {label}",
            fraction.value(),
            bench.value(),
            relation.words()
        ),
        ProblemDetails::FractionBenchmark { fraction, benchmark },
    )
}

pub fn generate_equivalent<R: Rng>(
    rng: &mut R,
    difficulty: u8,
    _config: &GenerationConfig,
) -> Problem {
    let original = pick_fraction(rng, difficulty.min(3), |_| false);
    let multiplier = *equivalence_multipliers(difficulty).choose(rng).unwrap_or(&2);
    let target = FractionValue::new(
        original.numerator * multiplier,
        original.denominator * multiplier,
    );
    let missing = if rng.gen_bool(0.5) {
        MissingPart::Numerator
    } else {
        MissingPart::Denominator
    };

    // The hint omits exactly the missing field.
    let mut hint = FractionBarsHint {
        left_value: original.value(),
        left_numerator: original.numerator,
        left_denominator: original.denominator,
        left_parts: Some(original.denominator),
        equiv_mode: true,
        ..FractionBarsHint::default()
    };
    let (prompt, answer, details) = match missing {
        MissingPart::Numerator => {
            hint.right_denominator = Some(target.denominator);
            hint.right_parts = Some(target.denominator);
            (
                format!("Find the missing number: {original} = ?/{}", target.denominator),
                target.numerator,
                ProblemDetails::EquivalentFractions {
                    original,
                    missing,
                    target_numerator: None,
                    target_denominator: Some(target.denominator),
                },
            )
        }
        MissingPart::Denominator => {
            hint.right_numerator = Some(target.numerator);
            (
                format!("Find the missing number: {original} = {}/?", target.numerator),
                target.denominator,
                ProblemDetails::EquivalentFractions {
                    original,
                    missing,
                    target_numerator: Some(target.numerator),
                    target_denominator: None,
                },
            )
        }
    };

    problem(
        ProblemType::EquivalentFractions,
        difficulty,
        prompt,
        answer.to_string(),
        None,
        VisualHint::FractionBars(hint),
        format!("{original} × {multiplier}/{multiplier} = {target}"),
        details,
    )
}

fn far_enough(candidate: FractionValue, chosen: &[FractionValue]) -> bool {
    chosen.iter().all(|c| {
        c.to_string() != candidate.to_string()
            && (c.value() - candidate.value()).abs() > MIN_CHOICE_GAP
    })
}

/// `target` plus distinct candidates, each more than [`MIN_CHOICE_GAP`] from the rest.
fn number_line_candidates<R: Rng>(
    rng: &mut R,
    difficulty: u8,
    target: FractionValue,
) -> Vec<FractionValue> {
    let mut chosen = vec![target];
    let mut attempts = 0;
    while chosen.len() < NUMBER_LINE_CHOICES && attempts < SAMPLE_ATTEMPTS * 4 {
        attempts += 1;
        let candidate = pick_fraction(rng, difficulty, |_| false);
        if far_enough(candidate, &chosen) {
            chosen.push(candidate);
        }
    }
    if chosen.len() == NUMBER_LINE_CHOICES {
        return chosen;
    }

    tracing::warn!(difficulty, "number-line choice sampling exhausted retries; filling in order");
    for candidate in all_fractions(difficulty) {
        if chosen.len() == NUMBER_LINE_CHOICES {
            break;
        }
        if far_enough(candidate, &chosen) {
            chosen.push(candidate);
        }
    }
    chosen
}

pub fn generate_number_line<R: Rng>(
    rng: &mut R,
    difficulty: u8,
    _config: &GenerationConfig,
) -> Problem {
    let target = pick_fraction(rng, difficulty, |_| false);
    let position = target.value();
    let candidates = number_line_candidates(rng, difficulty, target);
    let choices = shuffled(rng, candidates.iter().map(|c| c.to_string()).collect());

    let hint = NumberLineHint {
        line_min: 0,
        line_max: 1,
        marked_position: Some(position),
        denominator: Some(target.denominator),
        ..NumberLineHint::default()
    };

    problem(
        ProblemType::FractionNumberLine,
        difficulty,
        "Which fraction is shown on the number line?".to_string(),
        target.to_string(),
        Some(choices),
        VisualHint::NumberLine(hint),
        format!(
            "The line is split into {} equal parts and the point is at {target} = {position:.3}",
            target.denominator
        ),
        ProblemDetails::FractionNumberLine {
            position,
            tick_count: target.denominator + 1,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn nudge_stays_proper() {
        assert_eq!(nudge(FractionValue::new(1, 4)), FractionValue::new(2, 4));
        assert_eq!(nudge(FractionValue::new(3, 4)), FractionValue::new(2, 4));
        assert_eq!(nudge(FractionValue::new(1, 2)), FractionValue::new(1, 2));
    }

    #[test]
    fn comparison_answer_matches_exact_values() {
        let config = GenerationConfig::default();
        for seed in 0..200 {
            let p = generate_comparison(&mut rng(seed), 1 + (seed % 5) as u8, &config);
            let ProblemDetails::FractionComparison { left, right } = p.details else {
                panic!("wrong details for comparison");
            };
            assert_eq!(p.correct_answer, Relation::from(left.cmp_value(right)).symbol());
            let VisualHint::FractionBars(bars) = &p.visual_hint else {
                panic!("comparison must use fraction bars");
            };
            assert_eq!(bars.left_numerator, left.numerator);
            assert_eq!(bars.right_denominator, Some(right.denominator));
        }
    }

    #[test]
    fn comparison_avoids_equal_values() {
        let config = GenerationConfig::default();
        let equal = (0..300)
            .map(|seed| generate_comparison(&mut rng(seed), 3, &config))
            .filter(|p| p.correct_answer == "=")
            .count();
        assert_eq!(equal, 0);
    }

    #[test]
    fn low_difficulty_benchmark_is_always_half() {
        let config = GenerationConfig::default();
        for seed in 0..100 {
            let p = generate_benchmark(&mut rng(seed), 2, &config);
            let ProblemDetails::FractionBenchmark { benchmark, .. } = p.details else {
                panic!("wrong details for benchmark");
            };
            assert_eq!(benchmark, Benchmark::Half);
        }
    }

    #[test]
    fn benchmark_hint_shares_the_fraction_denominator() {
        let config = GenerationConfig::default();
        for seed in 0..100 {
            let p = generate_benchmark(&mut rng(seed), 4, &config);
            let ProblemDetails::FractionBenchmark { fraction, benchmark } = p.details else {
                panic!("wrong details for benchmark");
            };
            let VisualHint::FractionBars(bars) = &p.visual_hint else {
                panic!("benchmark must use fraction bars");
            };
            assert_eq!(bars.right_denominator, Some(fraction.denominator));
            let expected = (benchmark.fraction().value() * f64::from(fraction.denominator)).round() as u32;
            assert_eq!(bars.right_numerator, Some(expected));
            assert_eq!(p.correct_answer, Relation::from(fraction.cmp_value(benchmark.fraction())).symbol());
        }
    }

    #[test]
    fn equivalent_hint_never_leaks_the_answer() {
        let config = GenerationConfig::default();
        for seed in 0..200 {
            let p = generate_equivalent(&mut rng(seed), 5, &config);
            let ProblemDetails::EquivalentFractions { original, missing, target_numerator, target_denominator } = p.details else {
                panic!("wrong details for equivalent fractions");
            };
            let VisualHint::FractionBars(bars) = &p.visual_hint else {
                panic!("equivalent fractions must use fraction bars");
            };
            let answer: u32 = p.correct_answer.parse().unwrap();
            match missing {
                MissingPart::Numerator => {
                    let d = target_denominator.unwrap();
                    assert!(FractionValue::new(answer, d).same_value(original));
                    assert_eq!(bars.right_numerator, None);
                    assert_eq!(bars.right_denominator, Some(d));
                }
                MissingPart::Denominator => {
                    let n = target_numerator.unwrap();
                    assert!(FractionValue::new(n, answer).same_value(original));
                    assert_eq!(bars.right_denominator, None);
                    assert_eq!(bars.right_parts, None);
                    assert_eq!(bars.right_numerator, Some(n));
                }
            }
            assert!(p.choices.is_none());
        }
    }

    #[test]
    fn equivalent_uses_capped_fraction_and_scaled_multiplier() {
        let config = GenerationConfig::default();
        for seed in 0..100 {
            let p = generate_equivalent(&mut rng(seed), 5, &config);
            let ProblemDetails::EquivalentFractions { original, .. } = p.details else {
                panic!("wrong details for equivalent fractions");
            };
            // Level 3 denominators only.
            assert!([2, 3, 4, 5, 6, 8, 10].contains(&original.denominator));
        }
    }

    #[test]
    fn number_line_has_four_well_spaced_choices() {
        let config = GenerationConfig::default();
        for difficulty in 1..=5 {
            for seed in 0..50 {
                let p = generate_number_line(&mut rng(seed), difficulty, &config);
                let choices = p.choices.as_ref().unwrap();
                assert_eq!(choices.len(), NUMBER_LINE_CHOICES);
                assert!(choices.contains(&p.correct_answer));
                let values: Vec<f64> = choices
                    .iter()
                    .map(|c| {
                        let (n, d) = c.split_once('/').unwrap();
                        n.parse::<f64>().unwrap() / d.parse::<f64>().unwrap()
                    })
                    .collect();
                for i in 0..values.len() {
                    for j in i + 1..values.len() {
                        assert!((values[i] - values[j]).abs() > MIN_CHOICE_GAP, "{choices:?}");
                    }
                }
            }
        }
    }
}
