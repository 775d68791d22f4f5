//! Output count derived from input count.

use std::fmt;
use std::sync::Arc;

/// A value returned by [`OpSchema::calculate_output_or_sentinel`] when the
/// number of outputs cannot be determined.
///
/// [`OpSchema::calculate_output_or_sentinel`]: super::OpSchema::calculate_output_or_sentinel
pub const CANNOT_COMPUTE_NUM_OUTPUTS: i64 = -1;

/// Function mapping an input count to an output count.
pub type OutputCalculatorFn = Arc<dyn Fn(usize) -> usize + Send + Sync>;

/// How a schema derives its output count.
#[derive(Clone, Default)]
pub enum OutputCalculator {
    /// Cannot compute.
    #[default]
    Unset,
    /// As many outputs as inputs.
    SameAsInput,
    /// Caller-supplied function.
    Custom(OutputCalculatorFn),
}

impl OutputCalculator {
    /// Builds a `Custom` calculator from a closure.
    pub fn custom<F>(calc: F) -> Self
    where
        F: Fn(usize) -> usize + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(calc))
    }

    /// Output count for `num_inputs`, or `None` when unset.
    #[must_use]
    pub fn calculate(&self, num_inputs: usize) -> Option<usize> {
        match self {
            Self::Unset => None,
            Self::SameAsInput => Some(num_inputs),
            Self::Custom(calc) => Some(calc(num_inputs)),
        }
    }

    /// True for every variant except `Unset`.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        !matches!(self, Self::Unset)
    }
}

impl fmt::Debug for OutputCalculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => write!(f, "Unset"),
            Self::SameAsInput => write!(f, "SameAsInput"),
            Self::Custom(_) => write!(f, "Custom(<function>)"),
        }
    }
}
