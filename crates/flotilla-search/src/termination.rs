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


use crate::tracker::ProgressTracker;
use flotilla_core::num::Cost;

/// Why a fan-out call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminationReason {
    /// Every lane used up its restart bound, or every time unit elapsed.
    BudgetExhausted,
    /// A worker reached the problem's theoretical optimum.
    OptimumFound,
    /// The run was cancelled through the progress tracker.
    Stopped,
}

impl TerminationReason {
    /// Derives the reason from the tracker's flags.
    /// Cancellation takes precedence over a found optimum.
    #[inline]
    pub fn from_tracker<S, C>(tracker: &ProgressTracker<S, C>) -> Self
    where
        C: Cost,
    {
        if tracker.is_stopped() {
            TerminationReason::Stopped
        } else if tracker.found_best() {
            TerminationReason::OptimumFound
        } else {
            TerminationReason::BudgetExhausted
        }
    }

    /// Returns `true` if the run ended before its budget was used up.
    #[inline]
    pub fn is_early(&self) -> bool {
        !matches!(self, TerminationReason::BudgetExhausted)
    }
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::BudgetExhausted => write!(f, "Budget Exhausted"),
            TerminationReason::OptimumFound => write!(f, "Optimum Found"),
            TerminationReason::Stopped => write!(f, "Stopped"),
        }
    }
}
