//! The operator schema and its builder.

use super::{Cardinality, InplaceRule, OutputCalculator, CANNOT_COMPUTE_NUM_OUTPUTS};
use crate::definition::OperatorDescriptor;
use crate::errors::SchemaViolation;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Where a schema was registered from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaOrigin {
    /// Source file of the registration.
    pub file: String,
    /// Line in `file` of the registration.
    pub line: u32,
}

impl SchemaOrigin {
    /// Creates a new origin.
    #[must_use]
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// Origin used when a schema is built outside a registration site.
    #[must_use]
    pub fn unknown() -> Self {
        Self::new("unknown", 0)
    }
}

impl Default for SchemaOrigin {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for SchemaOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file {} line {}", self.file, self.line)
    }
}

/// The common interface of an operator, checked against its definitions.
///
/// A schema is configured once through its consuming builder methods and is
/// read-only afterwards. Each concern (input count, output count, output
/// calculation, allowed in-place, enforced in-place) holds one rule; setting
/// a concern again replaces the earlier rule.
///
/// ```
/// use opschema::OpSchema;
///
/// let schema = OpSchema::new()
///     .num_inputs(2)
///     .num_outputs(1)
///     .allow_inplace([(0, 0)]);
/// assert_eq!(schema.max_inputs(), Some(2));
/// ```
#[derive(Debug, Clone, Default)]
pub struct OpSchema {
    origin: SchemaOrigin,
    inputs: Cardinality,
    outputs: Cardinality,
    calculator: OutputCalculator,
    inplace_allowed: InplaceRule,
    inplace_enforced: InplaceRule,
}

impl OpSchema {
    /// Creates a schema with an unknown origin that accepts any shape
    /// without in-place outputs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a schema registered from `file` at `line`.
    #[must_use]
    pub fn at(file: impl Into<String>, line: u32) -> Self {
        Self {
            origin: SchemaOrigin::new(file, line),
            ..Self::default()
        }
    }

    /// Where the schema was registered from.
    #[must_use]
    pub const fn origin(&self) -> &SchemaOrigin {
        &self.origin
    }

    /// Source file the schema was registered from.
    #[must_use]
    pub fn file(&self) -> &str {
        &self.origin.file
    }

    /// Line the schema was registered from.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.origin.line
    }

    // Input count.

    /// Exactly `n` inputs.
    #[must_use]
    pub fn num_inputs(self, n: usize) -> Self {
        self.with_input_cardinality(Cardinality::Exact(n))
    }

    /// Between `min` and `max` inputs, inclusive.
    #[must_use]
    pub fn num_inputs_between(self, min: usize, max: usize) -> Self {
        self.with_input_cardinality(Cardinality::Range { min, max })
    }

    /// Any of the listed input counts.
    #[must_use]
    pub fn num_inputs_in(self, allowed: impl IntoIterator<Item = usize>) -> Self {
        self.with_input_cardinality(Cardinality::one_of(allowed))
    }

    /// Input count checked with `predicate`.
    #[must_use]
    pub fn num_inputs_with<F>(self, predicate: F) -> Self
    where
        F: Fn(usize) -> bool + Send + Sync + 'static,
    {
        self.with_input_cardinality(Cardinality::custom(predicate))
    }

    /// Sets the input cardinality directly.
    #[must_use]
    pub fn with_input_cardinality(mut self, rule: Cardinality) -> Self {
        warn_on_count_rule(&self.origin, "input count", &self.inputs, &rule);
        self.inputs = rule;
        self
    }

    // Output count.

    /// Exactly `n` outputs.
    #[must_use]
    pub fn num_outputs(self, n: usize) -> Self {
        self.with_output_cardinality(Cardinality::Exact(n))
    }

    /// Between `min` and `max` outputs, inclusive.
    #[must_use]
    pub fn num_outputs_between(self, min: usize, max: usize) -> Self {
        self.with_output_cardinality(Cardinality::Range { min, max })
    }

    /// Any of the listed output counts.
    #[must_use]
    pub fn num_outputs_in(self, allowed: impl IntoIterator<Item = usize>) -> Self {
        self.with_output_cardinality(Cardinality::one_of(allowed))
    }

    /// Output count checked with `predicate`.
    #[must_use]
    pub fn num_outputs_with<F>(self, predicate: F) -> Self
    where
        F: Fn(usize) -> bool + Send + Sync + 'static,
    {
        self.with_output_cardinality(Cardinality::custom(predicate))
    }

    /// Sets the output cardinality directly.
    #[must_use]
    pub fn with_output_cardinality(mut self, rule: Cardinality) -> Self {
        warn_on_count_rule(&self.origin, "output count", &self.outputs, &rule);
        self.outputs = rule;
        self
    }

    // Output calculation.

    /// Derives the output count from the input count with `calc`.
    #[must_use]
    pub fn output_calculator<F>(self, calc: F) -> Self
    where
        F: Fn(usize) -> usize + Send + Sync + 'static,
    {
        self.with_output_calculator(OutputCalculator::custom(calc))
    }

    /// As many outputs as inputs.
    #[must_use]
    pub fn same_number_of_output(self) -> Self {
        self.with_output_calculator(OutputCalculator::SameAsInput)
    }

    /// Sets the output calculator directly.
    #[must_use]
    pub fn with_output_calculator(mut self, calculator: OutputCalculator) -> Self {
        if self.calculator.is_configured() {
            warn!(
                origin = %self.origin,
                previous = ?self.calculator,
                next = ?calculator,
                "output calculator reconfigured, last configuration wins"
            );
        }
        self.calculator = calculator;
        self
    }

    // Allowed in-place.

    /// Allows in-place for pairs accepted by `predicate`.
    #[must_use]
    pub fn allow_inplace_with<F>(self, predicate: F) -> Self
    where
        F: Fn(usize, usize) -> bool + Send + Sync + 'static,
    {
        self.with_allowed_inplace(InplaceRule::custom(predicate))
    }

    /// Allows in-place for exactly the listed `(input, output)` pairs.
    #[must_use]
    pub fn allow_inplace(self, pairs: impl IntoIterator<Item = (usize, usize)>) -> Self {
        self.with_allowed_inplace(InplaceRule::pairs(pairs))
    }

    /// Allows output `i` to reuse input `i` for every `i`.
    #[must_use]
    pub fn allow_one_to_one_inplace(self) -> Self {
        self.with_allowed_inplace(InplaceRule::OneToOne)
    }

    /// Sets the allowed in-place relation directly.
    #[must_use]
    pub fn with_allowed_inplace(mut self, rule: InplaceRule) -> Self {
        warn_on_inplace_rule(&self.origin, "allowed in-place", &self.inplace_allowed, &rule);
        self.inplace_allowed = rule;
        self
    }

    // Enforced in-place.

    /// Requires in-place for pairs accepted by `predicate`.
    #[must_use]
    pub fn enforce_inplace_with<F>(self, predicate: F) -> Self
    where
        F: Fn(usize, usize) -> bool + Send + Sync + 'static,
    {
        self.with_enforced_inplace(InplaceRule::custom(predicate))
    }

    /// Requires in-place for exactly the listed `(input, output)` pairs.
    #[must_use]
    pub fn enforce_inplace(self, pairs: impl IntoIterator<Item = (usize, usize)>) -> Self {
        self.with_enforced_inplace(InplaceRule::pairs(pairs))
    }

    /// Requires output `i` to reuse input `i` for every `i`.
    #[must_use]
    pub fn enforce_one_to_one_inplace(self) -> Self {
        self.with_enforced_inplace(InplaceRule::OneToOne)
    }

    /// Sets the enforced in-place relation directly.
    ///
    /// Enforced pairs are implicitly allowed.
    #[must_use]
    pub fn with_enforced_inplace(mut self, rule: InplaceRule) -> Self {
        warn_on_inplace_rule(&self.origin, "enforced in-place", &self.inplace_enforced, &rule);
        self.inplace_enforced = rule;
        self
    }

    // Introspection.

    /// The input cardinality.
    #[must_use]
    pub const fn input_rule(&self) -> &Cardinality {
        &self.inputs
    }

    /// The output cardinality.
    #[must_use]
    pub const fn output_rule(&self) -> &Cardinality {
        &self.outputs
    }

    /// The allowed in-place relation.
    #[must_use]
    pub const fn allowed_inplace(&self) -> &InplaceRule {
        &self.inplace_allowed
    }

    /// The enforced in-place relation.
    #[must_use]
    pub const fn enforced_inplace(&self) -> &InplaceRule {
        &self.inplace_enforced
    }

    /// Smallest accepted input count.
    #[must_use]
    pub fn min_inputs(&self) -> usize {
        self.inputs.min()
    }

    /// Largest accepted input count, `None` when unbounded.
    #[must_use]
    pub fn max_inputs(&self) -> Option<usize> {
        self.inputs.max()
    }

    /// Smallest accepted output count.
    #[must_use]
    pub fn min_outputs(&self) -> usize {
        self.outputs.min()
    }

    /// Largest accepted output count, `None` when unbounded.
    #[must_use]
    pub fn max_outputs(&self) -> Option<usize> {
        self.outputs.max()
    }

    /// True if `(input, output)` may share storage.
    #[must_use]
    pub fn is_inplace_allowed(&self, input: usize, output: usize) -> bool {
        self.inplace_allowed.holds(input, output) || self.inplace_enforced.holds(input, output)
    }

    /// True if `(input, output)` must share storage.
    #[must_use]
    pub fn is_inplace_enforced(&self, input: usize, output: usize) -> bool {
        self.inplace_enforced.holds(input, output)
    }

    // Verification.

    /// Checks `def` against the schema and reports the first broken rule.
    ///
    /// Rules are checked in order: input count, output count, then every
    /// `(input, output)` pair in row-major order. For each pair, sharing
    /// storage without permission is reported before a missing enforced
    /// share.
    pub fn check<D>(&self, def: &D) -> Result<(), SchemaViolation>
    where
        D: OperatorDescriptor + ?Sized,
    {
        let num_inputs = def.num_inputs();
        if !self.inputs.allows(num_inputs) {
            return Err(SchemaViolation::InputCount {
                actual: num_inputs,
                expected: self.inputs.to_string(),
            });
        }

        let num_outputs = def.num_outputs();
        if !self.outputs.allows(num_outputs) {
            return Err(SchemaViolation::OutputCount {
                actual: num_outputs,
                expected: self.outputs.to_string(),
            });
        }

        for input in 0..num_inputs {
            for output in 0..num_outputs {
                let inplace = def.is_inplace(input, output);
                let enforced = self.inplace_enforced.holds(input, output);
                if inplace && !enforced && !self.inplace_allowed.holds(input, output) {
                    return Err(SchemaViolation::InplaceNotAllowed { input, output });
                }
                if enforced && !inplace {
                    return Err(SchemaViolation::InplaceNotEnforced { input, output });
                }
            }
        }

        Ok(())
    }

    /// Returns true if `def` satisfies every rule of the schema.
    #[must_use]
    pub fn verify<D>(&self, def: &D) -> bool
    where
        D: OperatorDescriptor + ?Sized,
    {
        self.check(def).is_ok()
    }

    /// Output count for `num_inputs`, or `None` when no calculator is set.
    #[must_use]
    pub fn calculate_output(&self, num_inputs: usize) -> Option<usize> {
        self.calculator.calculate(num_inputs)
    }

    /// Like [`calculate_output`](Self::calculate_output), but returns
    /// [`CANNOT_COMPUTE_NUM_OUTPUTS`] instead of `None`.
    #[must_use]
    pub fn calculate_output_or_sentinel(&self, num_inputs: usize) -> i64 {
        self.calculate_output(num_inputs)
            .map_or(CANNOT_COMPUTE_NUM_OUTPUTS, |n| {
                i64::try_from(n).unwrap_or(i64::MAX)
            })
    }
}

fn warn_on_count_rule(origin: &SchemaOrigin, family: &str, previous: &Cardinality, next: &Cardinality) {
    if previous.is_configured() {
        warn!(
            %origin,
            family,
            ?previous,
            ?next,
            "schema rule reconfigured, last configuration wins"
        );
    }
    if next.is_empty() {
        warn!(%origin, family, rule = ?next, "schema rule accepts no count");
    }
}

fn warn_on_inplace_rule(origin: &SchemaOrigin, family: &str, previous: &InplaceRule, next: &InplaceRule) {
    if previous.is_configured() {
        warn!(
            %origin,
            family,
            ?previous,
            ?next,
            "schema rule reconfigured, last configuration wins"
        );
    }
}
