//! Shared builder functions used by every topic generator.
//!
//! Topic files focus on the math; assembling choices, formatting operands,
//! sizing number-line windows and constructing the final [`Problem`] happen
//! here.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::practice_engine::models::*;

/// Padding added on both ends of an integer number-line window.
pub const NUMBER_LINE_PAD: i32 = 3;

/// Choice list for every compare-style problem.
pub fn relation_choices() -> Vec<String> {
    [Relation::Less, Relation::Equal, Relation::Greater]
        .iter()
        .map(|r| r.symbol().to_string())
        .collect()
}

/// Shuffle candidate answers into display order.
pub fn shuffled<R: Rng>(rng: &mut R, mut items: Vec<String>) -> Vec<String> {
    items.shuffle(rng);
    items
}

/// Wrap negative operands in parentheses so `3 + (-4)` reads naturally.
pub fn operand(value: i32) -> String {
    if value < 0 {
        format!("({value})")
    } else {
        value.to_string()
    }
}

/// Smallest window containing every value, padded by [`NUMBER_LINE_PAD`].
pub fn padded_window(values: &[i32]) -> (i32, i32) {
    let lo = values.iter().copied().min().unwrap_or(0);
    let hi = values.iter().copied().max().unwrap_or(0);
    (lo - NUMBER_LINE_PAD, hi + NUMBER_LINE_PAD)
}

/// Assemble the final [`Problem`] from its parts.
///
/// This is the last call in every topic generator.
#[allow(clippy::too_many_arguments)]
pub fn problem(
    problem_type: ProblemType,
    difficulty: u8,
    prompt: String,
    correct_answer: impl Into<String>,
    choices: Option<Vec<String>>,
    visual_hint: VisualHint,
    feedback_explanation: String,
    details: ProblemDetails,
) -> Problem {
    Problem {
        problem_type,
        difficulty,
        prompt,
        correct_answer: correct_answer.into(),
        choices,
        visual_hint,
        feedback_explanation,
        details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operand_parenthesizes_negatives() {
        assert_eq!(operand(-4), "(-4)");
        assert_eq!(operand(0), "0");
        assert_eq!(operand(12), "12");
    }

    #[test]
    fn padded_window_covers_all_values() {
        assert_eq!(padded_window(&[0, -7, 4]), (-10, 7));
        assert_eq!(padded_window(&[]), (-3, 3));
    }

    #[test]
    fn relation_choices_are_in_reading_order() {
        assert_eq!(relation_choices(), vec!["<", "=", ">"]);
    }
}
