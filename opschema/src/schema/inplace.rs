//! In-place relations between input and output indices.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Arbitrary predicate over an `(input, output)` index pair.
pub type InplacePredicate = Arc<dyn Fn(usize, usize) -> bool + Send + Sync>;

/// A relation over `(input index, output index)` pairs.
///
/// The same type backs both the allowed and the enforced relation of a schema.
#[derive(Clone, Default)]
pub enum InplaceRule {
    /// No pair is in the relation.
    #[default]
    None,
    /// Exactly the listed pairs.
    Pairs(BTreeSet<(usize, usize)>),
    /// Every `(i, i)` pair.
    OneToOne,
    /// Checked with a caller-supplied predicate.
    Custom(InplacePredicate),
}

impl InplaceRule {
    /// Builds a `Custom` rule from a closure.
    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(usize, usize) -> bool + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(predicate))
    }

    /// Builds a `Pairs` rule from any collection of pairs.
    pub fn pairs(pairs: impl IntoIterator<Item = (usize, usize)>) -> Self {
        Self::Pairs(pairs.into_iter().collect())
    }

    /// Returns true if `(input, output)` is in the relation.
    #[must_use]
    pub fn holds(&self, input: usize, output: usize) -> bool {
        match self {
            Self::None => false,
            Self::Pairs(pairs) => pairs.contains(&(input, output)),
            Self::OneToOne => input == output,
            Self::Custom(predicate) => predicate(input, output),
        }
    }

    /// True for every variant except the default `None`.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Debug for InplaceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Pairs(pairs) => f.debug_tuple("Pairs").field(pairs).finish(),
            Self::OneToOne => write!(f, "OneToOne"),
            Self::Custom(_) => write!(f, "Custom(<predicate>)"),
        }
    }
}
