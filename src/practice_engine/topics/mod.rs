//! Problem generators grouped by math domain.
//!
//! Every public generator follows the same signature:
//!
//! ```ignore
//! pub fn generate_<name><R: Rng>(
//!     rng: &mut R,
//!     difficulty: u8,
//!     config: &GenerationConfig,
//! ) -> Problem
//! ```
//!
//! The generator dispatches to these via `generator.rs`.

/// fraction_comparison, fraction_comparison_benchmark, equivalent_fractions, fraction_number_line
pub mod fractions;
/// integer_addition, integer_subtraction, integer_magnitude, integer_number_line
pub mod integers;
/// multiplication_facts, multiplication_related_facts, multiplication_scaling
pub mod multiplication;
