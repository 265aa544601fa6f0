// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.


use flotilla_core::num::Cost;

/// An immutable candidate solution paired with its cost.
///
/// The solution is optional: a pair without a solution carries the cost of
/// "nothing found yet", which is how the progress tracker is sampled before
/// any worker reported a result. Pairs are ordered by cost alone (lower is
/// better); equal-cost pairs are interchangeable as far as ordering goes, so
/// every selection in this crate keeps the pair it saw first.
#[derive(Debug, Clone, PartialEq)]
pub struct SolutionCostPair<S, C> {
    solution: Option<S>,
    cost: C,
}

impl<S, C> SolutionCostPair<S, C>
where
    C: Cost,
{
    /// Creates a pair from a solution and its cost.
    #[inline]
    pub fn new(solution: S, cost: C) -> Self {
        Self {
            solution: Some(solution),
            cost,
        }
    }

    /// Creates a pair that carries a cost but no solution.
    #[inline]
    pub fn without_solution(cost: C) -> Self {
        Self {
            solution: None,
            cost,
        }
    }

    /// Returns the solution, if any.
    #[inline]
    pub fn solution(&self) -> Option<&S> {
        self.solution.as_ref()
    }

    /// Returns the cost.
    #[inline]
    pub fn cost(&self) -> C {
        self.cost
    }

    /// Returns the cost as `f64`.
    #[inline]
    pub fn cost_f64(&self) -> f64 {
        self.cost.as_f64()
    }

    /// Returns `true` if the pair carries a solution.
    #[inline]
    pub fn has_solution(&self) -> bool {
        self.solution.is_some()
    }

    /// Returns `true` if this pair's cost is strictly lower than `other`'s.
    #[inline]
    pub fn is_better_than(&self, other: &Self) -> bool {
        self.cost.improves_on(other.cost)
    }

    /// Compares the two pairs by cost.
    /// Returns `None` if either cost is unordered (e.g. `NaN`).
    #[inline]
    pub fn cmp_cost(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.cost.partial_cmp(&other.cost)
    }

    /// Consumes the pair and returns the solution, if any.
    #[inline]
    pub fn into_solution(self) -> Option<S> {
        self.solution
    }

    /// Consumes the pair and returns its parts.
    #[inline]
    pub fn into_parts(self) -> (Option<S>, C) {
        (self.solution, self.cost)
    }
}

impl<S, C> std::fmt::Display for SolutionCostPair<S, C>
where
    C: Cost,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.solution {
            Some(_) => write!(f, "SolutionCostPair(cost: {})", self.cost),
            None => write!(f, "SolutionCostPair(cost: {}, no solution)", self.cost),
        }
    }
}

/// Returns the best pair of `pairs`, keeping the first one on ties.
pub fn best_of<S, C, I>(pairs: I) -> Option<SolutionCostPair<S, C>>
where
    C: Cost,
    I: IntoIterator<Item = SolutionCostPair<S, C>>,
{
    pairs.into_iter().fold(None, |best, candidate| match best {
        Some(best) if !candidate.is_better_than(&best) => Some(best),
        _ => Some(candidate),
    })
}

#[cfg(test)]
mod tests {
    use super::{SolutionCostPair, best_of};
    use std::cmp::Ordering;

    #[test]
    fn test_accessors() {
        let pair = SolutionCostPair::new("tour", 17i64);
        assert_eq!(pair.solution(), Some(&"tour"));
        assert_eq!(pair.cost(), 17);
        assert_eq!(pair.cost_f64(), 17.0);
        assert!(pair.has_solution());
        assert_eq!(pair.into_parts(), (Some("tour"), 17));
    }

    #[test]
    fn test_without_solution() {
        let pair = SolutionCostPair::<&str, f64>::without_solution(f64::MAX);
        assert!(!pair.has_solution());
        assert_eq!(pair.cost(), f64::MAX);
        assert_eq!(pair.into_solution(), None);
    }

    #[test]
    fn test_ordering_is_by_cost_only() {
        let a = SolutionCostPair::new("a", 3i32);
        let b = SolutionCostPair::new("b", 5i32);
        let c = SolutionCostPair::new("c", 3i32);

        assert!(a.is_better_than(&b));
        assert!(!b.is_better_than(&a));
        assert!(!a.is_better_than(&c));
        assert!(!c.is_better_than(&a));
        assert_eq!(a.cmp_cost(&b), Some(Ordering::Less));
        assert_eq!(a.cmp_cost(&c), Some(Ordering::Equal));
    }

    #[test]
    fn test_nan_cost_is_unordered() {
        let a = SolutionCostPair::new(1u8, f64::NAN);
        let b = SolutionCostPair::new(2u8, 1.0);
        assert_eq!(a.cmp_cost(&b), None);
        assert!(!a.is_better_than(&b));
        assert!(!b.is_better_than(&a));
    }

    #[test]
    fn test_best_of_keeps_first_on_ties() {
        let pairs = vec![
            SolutionCostPair::new("first", 9i64),
            SolutionCostPair::new("second", 4i64),
            SolutionCostPair::new("third", 4i64),
            SolutionCostPair::new("fourth", 12i64),
        ];
        let best = best_of(pairs).expect("non-empty input");
        assert_eq!(best.solution(), Some(&"second"));
        assert_eq!(best.cost(), 4);
    }

    #[test]
    fn test_best_of_empty_is_none() {
        let pairs: Vec<SolutionCostPair<u8, i64>> = Vec::new();
        assert!(best_of(pairs).is_none());
    }

    #[test]
    fn test_display() {
        let pair = SolutionCostPair::new(0u8, 42i64);
        assert_eq!(pair.to_string(), "SolutionCostPair(cost: 42)");
        let empty = SolutionCostPair::<u8, i64>::without_solution(7);
        assert_eq!(empty.to_string(), "SolutionCostPair(cost: 7, no solution)");
    }
}
