use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::practice_engine::coverage::FactCoverage;

// ---------------------------------------------------------------------------
// Problem types
// ---------------------------------------------------------------------------

/// Math domain a problem type belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Fractions,
    Integers,
    Multiplication,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Fractions      => write!(f, "Fractions"),
            Domain::Integers       => write!(f, "Combining Integers"),
            Domain::Multiplication => write!(f, "Multiplication Fluency"),
        }
    }
}

/// Closed set of problem types the generator knows how to build.
///
/// Serializes as the snake_case tag used by skills (e.g. `"fraction_comparison"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemType {
    FractionComparison,
    FractionComparisonBenchmark,
    EquivalentFractions,
    FractionNumberLine,
    IntegerAddition,
    IntegerSubtraction,
    IntegerMagnitude,
    IntegerNumberLine,
    MultiplicationFacts,
    MultiplicationRelatedFacts,
    MultiplicationScaling,
}

impl ProblemType {
    pub const ALL: [ProblemType; 11] = [
        ProblemType::FractionComparison,
        ProblemType::FractionComparisonBenchmark,
        ProblemType::EquivalentFractions,
        ProblemType::FractionNumberLine,
        ProblemType::IntegerAddition,
        ProblemType::IntegerSubtraction,
        ProblemType::IntegerMagnitude,
        ProblemType::IntegerNumberLine,
        ProblemType::MultiplicationFacts,
        ProblemType::MultiplicationRelatedFacts,
        ProblemType::MultiplicationScaling,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            ProblemType::FractionComparison          => "fraction_comparison",
            ProblemType::FractionComparisonBenchmark => "fraction_comparison_benchmark",
            ProblemType::EquivalentFractions         => "equivalent_fractions",
            ProblemType::FractionNumberLine          => "fraction_number_line",
            ProblemType::IntegerAddition             => "integer_addition",
            ProblemType::IntegerSubtraction          => "integer_subtraction",
            ProblemType::IntegerMagnitude            => "integer_magnitude",
            ProblemType::IntegerNumberLine           => "integer_number_line",
            ProblemType::MultiplicationFacts         => "multiplication_facts",
            ProblemType::MultiplicationRelatedFacts  => "multiplication_related_facts",
            ProblemType::MultiplicationScaling       => "multiplication_scaling",
        }
    }

    pub fn domain(self) -> Domain {
        match self {
            ProblemType::FractionComparison
            | ProblemType::FractionComparisonBenchmark
            | ProblemType::EquivalentFractions
            | ProblemType::FractionNumberLine => Domain::Fractions,
            ProblemType::IntegerAddition
            | ProblemType::IntegerSubtraction
            | ProblemType::IntegerMagnitude
            | ProblemType::IntegerNumberLine => Domain::Integers,
            ProblemType::MultiplicationFacts
            | ProblemType::MultiplicationRelatedFacts
            | ProblemType::MultiplicationScaling => Domain::Multiplication,
        }
    }
}

impl fmt::Display for ProblemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ProblemType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        ProblemType::ALL
            .into_iter()
            .find(|ty| ty.tag() == s)
            .ok_or_else(|| EngineError::UnknownProblemType(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Numeric primitives
// ---------------------------------------------------------------------------

/// A fraction as shown to the student. Never reduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FractionValue {
    pub numerator: u32,
    pub denominator: u32,
}

impl FractionValue {
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self { numerator, denominator }
    }

    pub fn value(self) -> f64 {
        f64::from(self.numerator) / f64::from(self.denominator)
    }

    /// Exact rational ordering by cross-multiplication.
    pub fn cmp_value(self, other: FractionValue) -> Ordering {
        let lhs = u64::from(self.numerator) * u64::from(other.denominator);
        let rhs = u64::from(other.numerator) * u64::from(self.denominator);
        lhs.cmp(&rhs)
    }

    pub fn same_value(self, other: FractionValue) -> bool {
        self.cmp_value(other) == Ordering::Equal
    }
}

impl fmt::Display for FractionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Answer for every compare-style problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    Less,
    Equal,
    Greater,
}

impl Relation {
    pub fn symbol(self) -> &'static str {
        match self {
            Relation::Less    => "<",
            Relation::Equal   => "=",
            Relation::Greater => ">",
        }
    }

    pub fn words(self) -> &'static str {
        match self {
            Relation::Less    => "less than",
            Relation::Equal   => "equal to",
            Relation::Greater => "greater than",
        }
    }
}

impl From<Ordering> for Relation {
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Less    => Relation::Less,
            Ordering::Equal   => Relation::Equal,
            Ordering::Greater => Relation::Greater,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Reference points for benchmark comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Benchmark {
    Zero,
    Half,
    One,
}

impl Benchmark {
    pub const ALL: [Benchmark; 3] = [Benchmark::Zero, Benchmark::Half, Benchmark::One];

    pub fn fraction(self) -> FractionValue {
        match self {
            Benchmark::Zero => FractionValue::new(0, 1),
            Benchmark::Half => FractionValue::new(1, 2),
            Benchmark::One  => FractionValue::new(1, 1),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Benchmark::Zero => "0",
            Benchmark::Half => "1/2",
            Benchmark::One  => "1",
        }
    }
}

// ---------------------------------------------------------------------------
// Type-specific problem data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPart {
    Numerator,
    Denominator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegerOperation {
    Add,
    Subtract,
}

impl IntegerOperation {
    pub fn symbol(self) -> &'static str {
        match self {
            IntegerOperation::Add      => "+",
            IntegerOperation::Subtract => "-",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MagnitudeQuestion {
    CloserToZero,
    FartherFromZero,
    Compare,
}

/// How a related multiplication fact is derived from the known one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelatedVariation {
    Double,
    Half,
    PlusOne,
    Commutative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownFact {
    pub a: u32,
    pub b: u32,
    pub product: u32,
}

/// Per-type fields that accompany the shared problem base.
///
/// None of these carry the canonical answer, so they are safe to display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProblemDetails {
    FractionComparison {
        left: FractionValue,
        right: FractionValue,
    },
    FractionBenchmark {
        fraction: FractionValue,
        benchmark: Benchmark,
    },
    EquivalentFractions {
        original: FractionValue,
        missing: MissingPart,
        /// Present only when the denominator is the missing part.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_numerator: Option<u32>,
        /// Present only when the numerator is the missing part.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_denominator: Option<u32>,
    },
    FractionNumberLine {
        position: f64,
        tick_count: u32,
    },
    IntegerOperation {
        operands: [i32; 2],
        operation: IntegerOperation,
    },
    IntegerMagnitude {
        values: [i32; 2],
        question: MagnitudeQuestion,
    },
    IntegerNumberLine {
        position: i32,
        line_min: i32,
        line_max: i32,
    },
    MultiplicationFact {
        factors: [u32; 2],
    },
    RelatedFact {
        known: KnownFact,
        variation: RelatedVariation,
    },
    ScalingJudgment {
        base: u32,
        multiplier: u32,
    },
    ScalingEstimate {
        factors: [u32; 2],
    },
    ScalingCompare {
        left: [u32; 2],
        right: [u32; 2],
    },
}

// ---------------------------------------------------------------------------
// Visual hints
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FractionBarsHint {
    pub left_value: f64,
    pub left_numerator: u32,
    pub left_denominator: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_parts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_numerator: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_denominator: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_parts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_label: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub equiv_mode: bool,
}

/// A single hop along the number line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jump {
    pub start: i32,
    #[serde(rename = "move")]
    pub step: i32,
    /// Landing point. Answer-revealing; dropped from the displayed hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<i32>,
}

/// Yellow (positive) and red (negative) unit counters for one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Counters {
    pub yellow: u32,
    pub red: u32,
}

impl Counters {
    pub fn for_value(value: i32) -> Self {
        if value >= 0 {
            Self { yellow: value.unsigned_abs(), red: 0 }
        } else {
            Self { yellow: 0, red: value.unsigned_abs() }
        }
    }

    pub fn value(self) -> i64 {
        i64::from(self.yellow) - i64::from(self.red)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum CounterModel {
    Addition {
        first: Counters,
        second: Counters,
    },
    Subtraction {
        start: Counters,
        remove: Counters,
        zero_pairs: u32,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumberLineHint {
    pub line_min: i32,
    pub line_max: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marked_position: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub denominator: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub points: Vec<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jump: Option<Jump>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counters: Option<CounterModel>,
}

/// Two colored sub-rectangles splitting an array by columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributiveSplit {
    pub left_cols: u32,
    pub right_cols: u32,
    pub left_color: String,
    pub right_color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrayModelHint {
    pub rows: u32,
    pub cols: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distributive: Option<DistributiveSplit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<RelatedVariation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrayDims {
    pub rows: u32,
    pub cols: u32,
}

/// Rendering instructions for the scaffold shown next to a problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VisualHint {
    FractionBars(FractionBarsHint),
    NumberLine(NumberLineHint),
    ArrayModel(ArrayModelHint),
    ScalingBar { base_value: u32, multiplier: u32 },
    DoubleArray { left: ArrayDims, right: ArrayDims },
}

impl VisualHint {
    /// The `type` discriminator as it appears on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            VisualHint::FractionBars(_)     => "fraction_bars",
            VisualHint::NumberLine(_)       => "number_line",
            VisualHint::ArrayModel(_)       => "array_model",
            VisualHint::ScalingBar { .. }   => "scaling_bar",
            VisualHint::DoubleArray { .. }  => "double_array",
        }
    }

    /// Copy of the hint with answer-revealing fields removed.
    pub fn redacted(&self) -> VisualHint {
        let mut hint = self.clone();
        if let VisualHint::NumberLine(line) = &mut hint {
            if let Some(jump) = &mut line.jump {
                jump.result = None;
            }
        }
        hint
    }
}

// ---------------------------------------------------------------------------
// Request / response
// ---------------------------------------------------------------------------

/// Per-skill generator configuration.
///
/// Decoded from the JSON mapping stored with a skill; unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Multiplication facts already practiced this session.
    pub seen_facts: FactCoverage,
}

impl GenerationConfig {
    pub fn with_seen_facts(seen_facts: FactCoverage) -> Self {
        Self { seen_facts }
    }

    /// Decode a skill config mapping. `null` yields the default config.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        Ok(Self::deserialize(value)?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemRequest {
    pub problem_type: ProblemType,
    /// 1..=5; values outside the range are clamped.
    pub difficulty: u8,
    pub rng_seed: Option<u64>,
    #[serde(default)]
    pub config: GenerationConfig,
}

impl ProblemRequest {
    /// Difficulty 1, entropy seed, empty config.
    pub fn new(problem_type: ProblemType) -> Self {
        Self {
            problem_type,
            difficulty: 1,
            rng_seed: None,
            config: GenerationConfig::default(),
        }
    }
}

/// A fully specified practice problem.
///
/// `correct_answer` and `feedback_explanation` are server-side only; use
/// [`Problem::display_view`] to build what the student sees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    #[serde(rename = "type")]
    pub problem_type: ProblemType,
    pub difficulty: u8,
    pub prompt: String,
    pub correct_answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<String>>,
    pub visual_hint: VisualHint,
    pub feedback_explanation: String,
    pub details: ProblemDetails,
}

impl Problem {
    /// Normalized `(min, max)` factor pair for multiplication facts.
    pub fn fact_pair(&self) -> Option<(u32, u32)> {
        match self.details {
            ProblemDetails::MultiplicationFact { factors: [a, b] } => Some((a.min(b), a.max(b))),
            _ => None,
        }
    }
}
