//! # Opschema
//!
//! A registry of operator schemas: structural contracts that operator
//! definitions are checked against.
//!
//! A schema describes:
//!
//! - **Cardinality**: how many inputs and outputs a definition may have
//! - **Output calculation**: how many outputs follow from a number of inputs
//! - **In-place rules**: which input/output pairs may, or must, share storage
//!
//! Schemas are registered once per operator name, usually at startup, and
//! looked up by name afterwards.
//!
//! ## Quick Start
//!
//! ```rust
//! use opschema::prelude::*;
//!
//! let registry = SchemaRegistry::new();
//! operator_schema!(in registry, Add, |s| {
//!     s.num_inputs(2).num_outputs(1).allow_one_to_one_inplace()
//! });
//!
//! let schema = registry.schema("Add").unwrap();
//! let def = OperatorDef::new("Add").input("X").input("Y").output("X");
//! assert!(schema.verify(&def));
//! assert_eq!(schema.calculate_output(2), None);
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod definition;
pub mod errors;
mod macros;
pub mod registry;
pub mod schema;

pub use definition::{OperatorDef, OperatorDescriptor};
pub use errors::{SchemaError, SchemaViolation};
pub use registry::{global_registry, new_schema, schema, SchemaRegistry, REGISTRY};
pub use schema::{
    Cardinality, InplaceRule, OpSchema, OutputCalculator, SchemaOrigin,
    CANNOT_COMPUTE_NUM_OUTPUTS,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::definition::{OperatorDef, OperatorDescriptor};
    pub use crate::errors::{SchemaError, SchemaViolation};
    pub use crate::operator_schema;
    pub use crate::registry::{global_registry, SchemaRegistry};
    pub use crate::schema::{
        Cardinality, InplaceRule, OpSchema, OutputCalculator, SchemaOrigin,
        CANNOT_COMPUTE_NUM_OUTPUTS,
    };
}
