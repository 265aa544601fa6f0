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

/// An optimization problem as seen by the orchestration layer.
///
/// The problem is shared by reference across all worker threads of a run, so
/// implementations must tolerate concurrent read-only calls.
pub trait Problem<S, C>: Send + Sync
where
    C: Cost,
{
    /// Returns the cost of `solution`. Lower is better.
    fn cost(&self, solution: &S) -> C;

    /// Returns the theoretical optimum (or a lower bound on it).
    fn min_cost(&self) -> C;

    /// Returns `true` if `cost` reaches the theoretical optimum.
    ///
    /// Workers use this to raise the tracker's found-best flag, which ends
    /// every parallel run early.
    #[inline]
    fn is_min_cost(&self, cost: C) -> bool {
        cost == self.min_cost()
    }
}

impl<S, C> std::fmt::Debug for dyn Problem<S, C>
where
    C: Cost,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Problem(min_cost: {})", self.min_cost())
    }
}
