//! Error types for operator schemas.
//!
//! Two classes exist. A [`SchemaViolation`] is an ordinary shape mismatch
//! between a definition and a schema; callers decide what to do with it.
//! [`SchemaError::Duplicate`] describes a registration conflict, which the
//! registry treats as a hard fault and never returns to the caller.

use crate::schema::SchemaOrigin;
use thiserror::Error;

/// The main error type for registry operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// A schema name was registered twice.
    #[error(
        "Trying to register schema with name {name} from {origin}, \
         but it is already registered from {prior}"
    )]
    Duplicate {
        /// The contested schema name.
        name: String,
        /// Where the rejected registration came from.
        origin: SchemaOrigin,
        /// Where the existing registration came from.
        prior: SchemaOrigin,
    },

    /// No schema is registered under the name.
    #[error("No schema registered with name {0}")]
    NotFound(String),

    /// A definition does not match its schema.
    #[error("{0}")]
    Violation(#[from] SchemaViolation),
}

/// The first rule a definition breaks, in verification order.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaViolation {
    /// The number of inputs is rejected by the input cardinality.
    #[error("Input count {actual} not allowed, expected {expected}")]
    InputCount {
        /// Number of inputs on the definition.
        actual: usize,
        /// Rendered input cardinality.
        expected: String,
    },

    /// The number of outputs is rejected by the output cardinality.
    #[error("Output count {actual} not allowed, expected {expected}")]
    OutputCount {
        /// Number of outputs on the definition.
        actual: usize,
        /// Rendered output cardinality.
        expected: String,
    },

    /// An input and output share storage without permission.
    #[error("Input {input} and output {output} are in-place but in-place is not allowed")]
    InplaceNotAllowed {
        /// Input index.
        input: usize,
        /// Output index.
        output: usize,
    },

    /// An input and output are required to share storage but do not.
    #[error("Input {input} and output {output} must be in-place but are not")]
    InplaceNotEnforced {
        /// Input index.
        input: usize,
        /// Output index.
        output: usize,
    },
}

impl SchemaViolation {
    /// Short machine-readable code for the violation.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InputCount { .. } => "SCHEMA-001-INPUT_COUNT",
            Self::OutputCount { .. } => "SCHEMA-002-OUTPUT_COUNT",
            Self::InplaceNotAllowed { .. } => "SCHEMA-003-INPLACE_NOT_ALLOWED",
            Self::InplaceNotEnforced { .. } => "SCHEMA-004-INPLACE_NOT_ENFORCED",
        }
    }
}
