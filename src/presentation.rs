use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::practice_engine::models::{ProblemDetails, Problem, VisualHint};

const ENCOURAGEMENT: &str = "That's right!";

impl Problem {
    /// JSON sent to the student before answering.
    ///
    /// Never includes `correct_answer` or `feedback_explanation`. The
    /// type-specific `details` are always included; number-line problems need
    /// them even when visuals are off. The visual hint is included only when
    /// `show_visual` is set, and then with answer-revealing fields stripped.
    pub fn display_view(&self, show_visual: bool) -> Value {
        let mut view = Map::new();
        view.insert("type".into(), json!(self.problem_type));
        view.insert("difficulty".into(), json!(self.difficulty));
        view.insert("prompt".into(), json!(self.prompt));
        if let Some(choices) = &self.choices {
            view.insert("choices".into(), json!(choices));
        }
        view.insert("details".into(), json!(self.details));
        if show_visual {
            view.insert("visual_hint".into(), json!(self.visual_hint.redacted()));
        }
        Value::Object(view)
    }

    /// Full hint for post-answer feedback, with every field filled in.
    pub fn feedback_hint(&self) -> VisualHint {
        let mut hint = self.visual_hint.clone();
        let ProblemDetails::EquivalentFractions { target_numerator, target_denominator, .. } =
            self.details
        else {
            return hint;
        };
        let Ok(answer) = self.correct_answer.parse::<u32>() else {
            return hint;
        };
        let (numerator, denominator) = match (target_numerator, target_denominator) {
            (None, Some(den)) => (answer, den),
            (Some(num), None) => (num, answer),
            _ => return hint,
        };

        if let VisualHint::FractionBars(bars) = &mut hint {
            bars.right_numerator = Some(numerator);
            bars.right_denominator = Some(denominator);
            bars.right_parts = Some(denominator);
            if denominator != 0 {
                bars.right_value = Some(f64::from(numerator) / f64::from(denominator));
            }
        }
        hint
    }
}

/// Result of checking one submitted answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerFeedback {
    pub is_correct: bool,
    pub correct_answer: String,
    pub explanation: String,
    pub visual_hint: VisualHint,
    /// Always show the full visual after a wrong answer.
    pub show_visual: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encouragement: Option<String>,
}

/// Compare a student's answer with the canonical one.
///
/// Both sides are whitespace-trimmed and compared exactly: `"2/4"` does not
/// match `"1/2"`.
pub fn check_answer(problem: &Problem, student_answer: &str) -> AnswerFeedback {
    let is_correct = student_answer.trim() == problem.correct_answer.trim();
    tracing::debug!(problem_type = %problem.problem_type, is_correct, "checked answer");

    AnswerFeedback {
        is_correct,
        correct_answer: problem.correct_answer.clone(),
        explanation: problem.feedback_explanation.clone(),
        visual_hint: problem.feedback_hint(),
        show_visual: !is_correct,
        correction: (!is_correct)
            .then(|| format!("The correct answer is {}.", problem.correct_answer)),
        encouragement: is_correct.then(|| ENCOURAGEMENT.to_string()),
    }
}
