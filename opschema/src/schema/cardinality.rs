//! Count rules for inputs and outputs.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Arbitrary predicate over a count.
pub type CountPredicate = Arc<dyn Fn(usize) -> bool + Send + Sync>;

/// Which counts of inputs (or outputs) a schema accepts.
///
/// Every variant exposes an inclusive `[min, max]` bound that is checked
/// before the variant's own predicate. `Custom` has no closed form, so its
/// bound is `[0, unbounded)`.
#[derive(Clone, Default)]
pub enum Cardinality {
    /// Any count.
    #[default]
    Any,
    /// Exactly this count.
    Exact(usize),
    /// Inclusive range.
    Range {
        /// Smallest accepted count.
        min: usize,
        /// Largest accepted count.
        max: usize,
    },
    /// One of a finite set of counts.
    OneOf(BTreeSet<usize>),
    /// Checked with a caller-supplied predicate.
    Custom(CountPredicate),
}

impl Cardinality {
    /// Builds a `Custom` cardinality from a closure.
    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(usize) -> bool + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(predicate))
    }

    /// Builds a `OneOf` cardinality from any collection of counts.
    pub fn one_of(counts: impl IntoIterator<Item = usize>) -> Self {
        Self::OneOf(counts.into_iter().collect())
    }

    /// Lower bound of accepted counts.
    #[must_use]
    pub fn min(&self) -> usize {
        match self {
            Self::Any | Self::Custom(_) => 0,
            Self::Exact(n) => *n,
            Self::Range { min, .. } => *min,
            Self::OneOf(counts) => counts.first().copied().unwrap_or(0),
        }
    }

    /// Upper bound of accepted counts, `None` when unbounded.
    #[must_use]
    pub fn max(&self) -> Option<usize> {
        match self {
            Self::Any | Self::Custom(_) => None,
            Self::Exact(n) => Some(*n),
            Self::Range { max, .. } => Some(*max),
            Self::OneOf(counts) => counts.last().copied(),
        }
    }

    /// Returns true if `count` is accepted.
    #[must_use]
    pub fn allows(&self, count: usize) -> bool {
        if count < self.min() || self.max().is_some_and(|max| count > max) {
            return false;
        }
        match self {
            Self::Any | Self::Range { .. } => true,
            Self::Exact(n) => count == *n,
            Self::OneOf(counts) => counts.contains(&count),
            Self::Custom(predicate) => predicate(count),
        }
    }

    /// True for every variant except the default `Any`.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        !matches!(self, Self::Any)
    }

    /// True when no count can ever be accepted.
    ///
    /// `Custom` predicates are opaque and are never reported as empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Range { min, max } => min > max,
            Self::OneOf(counts) => counts.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Debug for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "Any"),
            Self::Exact(n) => f.debug_tuple("Exact").field(n).finish(),
            Self::Range { min, max } => f
                .debug_struct("Range")
                .field("min", min)
                .field("max", max)
                .finish(),
            Self::OneOf(counts) => f.debug_tuple("OneOf").field(counts).finish(),
            Self::Custom(_) => write!(f, "Custom(<predicate>)"),
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "any count"),
            Self::Exact(n) => write!(f, "exactly {n}"),
            Self::Range { min, max } => write!(f, "between {min} and {max}"),
            Self::OneOf(counts) => {
                let rendered: Vec<String> = counts.iter().map(ToString::to_string).collect();
                write!(f, "one of {{{}}}", rendered.join(", "))
            }
            Self::Custom(_) => write!(f, "a count accepted by a custom predicate"),
        }
    }
}
