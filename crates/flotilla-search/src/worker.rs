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


//! Search worker capabilities.
//!
//! A worker is one instance of a stochastic local-search algorithm bound to a
//! problem and a progress tracker. The orchestration layer only needs the small
//! capability set below: run a bounded amount of search, report how much work
//! was done, expose the shared collaborators, and split into an independent
//! copy for another thread. Workers are `Send` but need not be `Sync`; exactly
//! one thread drives a given instance at a time.
//!
//! `optimize` and `reoptimize` are distinct usage modes. `optimize` starts every
//! call from scratch; `reoptimize` resumes from the worker's own internal state
//! (for example the final temperature of an annealer). Only workers implementing
//! `ReoptimizableWorker` expose the second mode, so callers cannot request it
//! from a worker that lacks it.

use crate::{pair::SolutionCostPair, problem::Problem, tracker::ProgressTracker};
use flotilla_core::{num::Cost, split::Splittable};
use std::sync::Arc;

/// The capability set every search algorithm implements to be orchestrated.
pub trait SearchWorker<S, C>: Splittable + Send
where
    C: Cost,
{
    /// Returns the name of the algorithm, used in logs and failure reports.
    fn name(&self) -> &str;

    /// Runs one restart of at most `run_length` steps from scratch.
    ///
    /// Returns the best pair found by this restart, or `None` if no work was
    /// done (e.g. the tracker already signals found-best or stopped).
    fn optimize(&mut self, run_length: u64) -> Option<SolutionCostPair<S, C>>;

    /// Returns the total number of steps performed over the worker's lifetime.
    fn total_run_length(&self) -> u64;

    /// Returns the tracker this worker reports into.
    fn progress_tracker(&self) -> &Arc<ProgressTracker<S, C>>;

    /// Rebinds the worker to another tracker.
    fn set_progress_tracker(&mut self, tracker: Arc<ProgressTracker<S, C>>);

    /// Returns the problem this worker solves.
    fn problem(&self) -> &Arc<dyn Problem<S, C>>;
}

/// A worker that can also resume search from its own internal state.
pub trait ReoptimizableWorker<S, C>: SearchWorker<S, C>
where
    C: Cost,
{
    /// Runs one restart of at most `run_length` steps, continuing from the
    /// state left behind by the previous call.
    fn reoptimize(&mut self, run_length: u64) -> Option<SolutionCostPair<S, C>>;
}

/// Returns `true` if both handles point to the same tracker.
#[inline]
pub fn same_tracker<S, C>(a: &Arc<ProgressTracker<S, C>>, b: &Arc<ProgressTracker<S, C>>) -> bool {
    Arc::ptr_eq(a, b)
}

/// Returns `true` if both handles point to the same problem instance.
/// Only the data address is compared; vtable identity is irrelevant here.
#[inline]
pub fn same_problem<S, C>(a: &Arc<dyn Problem<S, C>>, b: &Arc<dyn Problem<S, C>>) -> bool
where
    C: Cost,
{
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
