//! Operator definitions checked against schemas.
//!
//! A schema only needs three facts about a definition: how many inputs it
//! has, how many outputs it has, and whether a given input and output refer
//! to the same storage. [`OperatorDescriptor`] is that seam; [`OperatorDef`]
//! is the plain implementation used when identifiers name storage.

use serde::{Deserialize, Serialize};

/// Read access to the shape of an operator call.
pub trait OperatorDescriptor {
    /// Number of inputs.
    fn num_inputs(&self) -> usize;

    /// Number of outputs.
    fn num_outputs(&self) -> usize;

    /// Whether `input` and `output` refer to the same underlying storage.
    ///
    /// Only called with indices below [`num_inputs`](Self::num_inputs) and
    /// [`num_outputs`](Self::num_outputs).
    fn is_inplace(&self, input: usize, output: usize) -> bool;
}

/// An operator definition: a type name plus ordered input and output identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorDef {
    /// The operator type this definition should be checked against.
    #[serde(rename = "type")]
    pub op_type: String,
    /// Input identifiers, in order.
    #[serde(default)]
    pub inputs: Vec<String>,
    /// Output identifiers, in order.
    #[serde(default)]
    pub outputs: Vec<String>,
}

impl OperatorDef {
    /// Creates a definition with no inputs or outputs.
    #[must_use]
    pub fn new(op_type: impl Into<String>) -> Self {
        Self {
            op_type: op_type.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Appends an input identifier.
    #[must_use]
    pub fn input(mut self, name: impl Into<String>) -> Self {
        self.inputs.push(name.into());
        self
    }

    /// Appends several input identifiers.
    #[must_use]
    pub fn with_inputs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs.extend(names.into_iter().map(Into::into));
        self
    }

    /// Appends an output identifier.
    #[must_use]
    pub fn output(mut self, name: impl Into<String>) -> Self {
        self.outputs.push(name.into());
        self
    }

    /// Appends several output identifiers.
    #[must_use]
    pub fn with_outputs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outputs.extend(names.into_iter().map(Into::into));
        self
    }
}

impl OperatorDescriptor for OperatorDef {
    fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    fn num_outputs(&self) -> usize {
        self.outputs.len()
    }

    fn is_inplace(&self, input: usize, output: usize) -> bool {
        match (self.inputs.get(input), self.outputs.get(output)) {
            (Some(i), Some(o)) => i == o,
            _ => false,
        }
    }
}

impl<T: OperatorDescriptor + ?Sized> OperatorDescriptor for &T {
    fn num_inputs(&self) -> usize {
        (**self).num_inputs()
    }

    fn num_outputs(&self) -> usize {
        (**self).num_outputs()
    }

    fn is_inplace(&self, input: usize, output: usize) -> bool {
        (**self).is_inplace(input, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_operator_def_builder() {
        let def = OperatorDef::new("Add").input("X").input("Y").output("Z");

        assert_eq!(def.op_type, "Add");
        assert_eq!(def.num_inputs(), 2);
        assert_eq!(def.num_outputs(), 1);
    }

    #[test]
    fn test_inplace_is_identifier_equality() {
        let def = OperatorDef::new("Relu")
            .with_inputs(["X", "Y"])
            .with_outputs(["X"]);

        assert!(def.is_inplace(0, 0));
        assert!(!def.is_inplace(1, 0));
    }

    #[test]
    fn test_inplace_out_of_range_is_false() {
        let def = OperatorDef::new("Relu").input("X").output("X");
        assert!(!def.is_inplace(1, 0));
        assert!(!def.is_inplace(0, 3));
    }

    #[test]
    fn test_deserialize_from_json() {
        let def: OperatorDef = serde_json::from_value(serde_json::json!({
            "type": "Split",
            "inputs": ["data"],
            "outputs": ["a", "b"]
        }))
        .unwrap();

        assert_eq!(def, OperatorDef::new("Split").input("data").with_outputs(["a", "b"]));
    }

    #[test]
    fn test_deserialize_missing_lists_default_empty() {
        let def: OperatorDef =
            serde_json::from_value(serde_json::json!({ "type": "ConstantFill" })).unwrap();

        assert!(def.inputs.is_empty());
        assert!(def.outputs.is_empty());
    }
}
