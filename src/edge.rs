use ordered_float::OrderedFloat;
use std::fmt;

pub const DEFAULT_WEIGHT: f64 = 1.0;

/// An edge between two node labels.
///
/// Equality and hashing cover the endpoints, the directed flag and the weight,
/// so two edges over the same pair with different weights are different
/// values. The graph still stores at most one edge per ordered pair.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Edge<L> {
    source: L,
    target: L,
    directed: bool,
    weight: OrderedFloat<f64>,
}

impl<L> Edge<L> {
    /// Builds an edge as given. The weight is not validated here; the
    /// solver rejects NaN and negative weights when it is constructed.
    pub fn new(source: L, target: L, directed: bool, weight: f64) -> Self {
        Self {
            source,
            target,
            directed,
            weight: OrderedFloat(weight),
        }
    }

    /// Directed edge with the default weight of 1.0.
    pub fn directed(source: L, target: L) -> Self {
        Self::new(source, target, true, DEFAULT_WEIGHT)
    }

    pub fn weighted(source: L, target: L, weight: f64) -> Self {
        Self::new(source, target, true, weight)
    }

    pub fn source(&self) -> &L {
        &self.source
    }

    pub fn target(&self) -> &L {
        &self.target
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn weight(&self) -> f64 {
        self.weight.into_inner()
    }

    pub fn is_self_loop(&self) -> bool
    where
        L: PartialEq,
    {
        self.source == self.target
    }
}

impl<L: fmt::Display> fmt::Display for Edge<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = if self.directed { "-->" } else { "--" };
        write!(f, "{} -- {:?} {} {}", self.source, self.weight(), arrow, self.target)
    }
}

/// `true` when `weight` can be used as a shortest-path edge cost.
pub(crate) fn is_valid_weight(weight: f64) -> bool {
    !weight.is_nan() && weight >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_takes_part_in_equality() {
        assert_eq!(Edge::directed("a", "b"), Edge::weighted("a", "b", 1.0));
        assert_ne!(Edge::weighted("a", "b", 2.0), Edge::weighted("a", "b", 1.0));
        assert_ne!(Edge::new("a", "b", false, 1.0), Edge::directed("a", "b"));
        assert_ne!(Edge::directed("b", "a"), Edge::directed("a", "b"));
    }

    #[test]
    fn weight_validation() {
        assert!(is_valid_weight(0.0));
        assert!(is_valid_weight(f64::INFINITY));
        assert!(!is_valid_weight(-1.0));
        assert!(!is_valid_weight(f64::NAN));
    }

    #[test]
    fn display() {
        assert_eq!(Edge::weighted("s", "x", 5.12).to_string(), "s -- 5.12 --> x");
        assert_eq!(Edge::directed("a", "a").to_string(), "a -- 1.0 --> a");
        assert!(Edge::directed("a", "a").is_self_loop());
    }
}
