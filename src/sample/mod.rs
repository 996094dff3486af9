//! Read side of a loaded table
//!
//! Projection, exclusion rules, random ordering and a row limit. Exclusion
//! rules are declarative and only apply to columns the table actually has;
//! the others are reported back, never dropped silently.

mod errors;
mod query;
mod rules;

pub use errors::{SampleError, SampleResult};
pub use query::{SampleOutput, SamplePlan, SampleQuery, DEFAULT_SAMPLE_LIMIT};
pub use rules::{ExclusionRule, Predicate};
