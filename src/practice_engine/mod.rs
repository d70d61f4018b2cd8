//! Problem generation: types, difficulty tables, sampling and per-domain generators.
//!
//! ## Module overview
//!
//! | Module       | Purpose |
//! |--------------|---------|
//! | `models`     | Problem payload, visual hints, request/config types |
//! | `curriculum` | Per-level tables and bounded samplers |
//! | `coverage`   | Session fact coverage and the coverage-aware fact picker |
//! | `helpers`    | Shared builders used by every generator |
//! | `generator`  | Entry points `generate`, `generate_problem`, `generate_practice` |
//! | `topics`     | One generator per problem type, grouped by domain |

pub mod coverage;
pub mod curriculum;
pub mod generator;
pub mod helpers;
pub mod models;
pub mod topics;

pub use coverage::FactCoverage;
pub use generator::{generate, generate_practice, generate_problem};
pub use models::{
    ArrayDims, ArrayModelHint, Benchmark, CounterModel, Counters, DistributiveSplit, Domain,
    FractionBarsHint, FractionValue, GenerationConfig, IntegerOperation, Jump, KnownFact,
    MagnitudeQuestion, MissingPart, NumberLineHint, Problem, ProblemDetails, ProblemRequest,
    ProblemType, RelatedVariation, Relation, VisualHint,
};
