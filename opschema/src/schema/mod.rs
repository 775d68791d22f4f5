//! Operator schemas.
//!
//! This module provides:
//! - Count rules for inputs and outputs
//! - In-place relations (allowed and enforced)
//! - Output count calculation
//! - The [`OpSchema`] builder and its verification

mod calculator;
mod cardinality;
mod inplace;
mod op_schema;
#[cfg(test)]
mod schema_tests;

pub use calculator::{OutputCalculator, OutputCalculatorFn, CANNOT_COMPUTE_NUM_OUTPUTS};
pub use cardinality::{Cardinality, CountPredicate};
pub use inplace::{InplacePredicate, InplaceRule};
pub use op_schema::{OpSchema, SchemaOrigin};
