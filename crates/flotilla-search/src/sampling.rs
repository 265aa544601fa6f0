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


//! # Iterative Sampling
//!
//! The simplest stochastic search there is: draw candidates from an
//! initializer, cost them, keep the best. One restart of length `n` draws `n`
//! samples. Every sample is offered to the shared tracker, and a sample that
//! reaches the problem's minimum cost raises found-best so every other worker
//! of the run winds down.
//!
//! Sampling keeps no state between restarts, so `reoptimize` behaves exactly
//! like `optimize`.

use crate::{
    initializer::Initializer, pair::SolutionCostPair, problem::Problem, tracker::ProgressTracker,
    worker::{ReoptimizableWorker, SearchWorker},
};
use flotilla_core::{num::Cost, split::Splittable};
use std::sync::Arc;

/// A search worker that repeatedly samples random candidates.
pub struct IterativeSampling<S, C, I> {
    problem: Arc<dyn Problem<S, C>>,
    initializer: I,
    tracker: Arc<ProgressTracker<S, C>>,
    total_samples: u64,
}

impl<S, C, I> std::fmt::Debug for IterativeSampling<S, C, I>
where
    C: Cost,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IterativeSampling")
            .field("problem", &self.problem)
            .field("tracker_cost", &self.tracker.cost())
            .field("total_samples", &self.total_samples)
            .finish()
    }
}

impl<S, C, I> IterativeSampling<S, C, I>
where
    S: Clone + Send,
    C: Cost,
    I: Initializer<S>,
{
    /// Creates a sampler reporting into `tracker`.
    #[inline]
    pub fn new(problem: Arc<dyn Problem<S, C>>, initializer: I, tracker: Arc<ProgressTracker<S, C>>) -> Self {
        Self {
            problem,
            initializer,
            tracker,
            total_samples: 0,
        }
    }

    /// Creates a sampler with a tracker of its own.
    #[inline]
    pub fn with_new_tracker(problem: Arc<dyn Problem<S, C>>, initializer: I) -> Self {
        Self::new(problem, initializer, Arc::new(ProgressTracker::new()))
    }

    fn one_sample(&mut self) -> SolutionCostPair<S, C> {
        let candidate = self.initializer.create_candidate();
        self.total_samples += 1;
        let cost = self.problem.cost(&candidate);
        if self.tracker.update(cost, &candidate) && self.problem.is_min_cost(cost) {
            self.tracker.set_found_best();
        }
        SolutionCostPair::new(candidate, cost)
    }

    fn sample(&mut self, num_samples: u64) -> Option<SolutionCostPair<S, C>> {
        let mut best: Option<SolutionCostPair<S, C>> = None;
        let mut drawn = 0u64;
        while drawn < num_samples && !self.tracker.should_stop() {
            let current = self.one_sample();
            drawn += 1;
            if best.as_ref().is_none_or(|b| current.is_better_than(b)) {
                best = Some(current);
            }
        }
        best
    }
}

impl<S, C, I> Splittable for IterativeSampling<S, C, I>
where
    I: Splittable,
{
    fn split(&mut self) -> Self {
        Self {
            problem: Arc::clone(&self.problem),
            initializer: self.initializer.split(),
            tracker: Arc::clone(&self.tracker),
            total_samples: 0,
        }
    }
}

impl<S, C, I> SearchWorker<S, C> for IterativeSampling<S, C, I>
where
    S: Clone + Send,
    C: Cost,
    I: Initializer<S>,
{
    #[inline]
    fn name(&self) -> &str {
        "IterativeSampling"
    }

    fn optimize(&mut self, run_length: u64) -> Option<SolutionCostPair<S, C>> {
        self.sample(run_length)
    }

    #[inline]
    fn total_run_length(&self) -> u64 {
        self.total_samples
    }

    #[inline]
    fn progress_tracker(&self) -> &Arc<ProgressTracker<S, C>> {
        &self.tracker
    }

    #[inline]
    fn set_progress_tracker(&mut self, tracker: Arc<ProgressTracker<S, C>>) {
        self.tracker = tracker;
    }

    #[inline]
    fn problem(&self) -> &Arc<dyn Problem<S, C>> {
        &self.problem
    }
}

impl<S, C, I> ReoptimizableWorker<S, C> for IterativeSampling<S, C, I>
where
    S: Clone + Send,
    C: Cost,
    I: Initializer<S>,
{
    fn reoptimize(&mut self, run_length: u64) -> Option<SolutionCostPair<S, C>> {
        self.sample(run_length)
    }
}

#[cfg(test)]
mod tests {
    use super::IterativeSampling;
    use crate::{
        initializer::{Initializer, RandomInitializer},
        problem::Problem,
        tracker::ProgressTracker,
        worker::{ReoptimizableWorker, SearchWorker, same_problem, same_tracker},
    };
    use flotilla_core::{random::SplittableRng, split::Splittable};
    use rand::Rng;
    use std::sync::Arc;

    /// Cost is the value itself; the optimum is zero.
    struct Value;

    impl Problem<u32, i64> for Value {
        fn cost(&self, solution: &u32) -> i64 {
            i64::from(*solution)
        }

        fn min_cost(&self) -> i64 {
            0
        }
    }

    /// Counts down from a start value, one candidate per call.
    struct Countdown(u32);

    impl Splittable for Countdown {
        fn split(&mut self) -> Self {
            Countdown(self.0)
        }
    }

    impl Initializer<u32> for Countdown {
        fn create_candidate(&mut self) -> u32 {
            let v = self.0;
            self.0 = self.0.saturating_sub(1);
            v
        }
    }

    fn value() -> Arc<dyn Problem<u32, i64>> {
        Arc::new(Value)
    }

    fn uniform(rng: &mut SplittableRng) -> u32 {
        rng.random_range(1..1_000)
    }

    #[test]
    fn test_optimize_draws_run_length_samples() {
        let mut s = IterativeSampling::with_new_tracker(value(), RandomInitializer::seeded(3, uniform));
        let best = s.optimize(50).expect("samples were drawn");
        assert_eq!(s.total_run_length(), 50);
        assert_eq!(best.cost(), s.progress_tracker().cost());
        assert!(best.cost() >= 1);
    }

    #[test]
    fn test_reaching_min_cost_sets_found_best_and_stops() {
        let mut s = IterativeSampling::with_new_tracker(value(), Countdown(3));
        let best = s.optimize(10).unwrap();
        assert_eq!(best.cost(), 0);
        assert_eq!(s.total_run_length(), 4);
        assert!(s.progress_tracker().found_best());

        assert!(s.optimize(10).is_none());
        assert!(s.reoptimize(10).is_none());
        assert_eq!(s.total_run_length(), 4);
    }

    #[test]
    fn test_stopped_tracker_draws_nothing() {
        let tracker = Arc::new(ProgressTracker::new());
        tracker.stop();
        let mut s = IterativeSampling::new(value(), Countdown(9), tracker);
        assert!(s.optimize(5).is_none());
        assert_eq!(s.total_run_length(), 0);
    }

    #[test]
    fn test_split_shares_problem_and_tracker_with_fresh_counter() {
        let mut parent = IterativeSampling::with_new_tracker(value(), Countdown(100));
        parent.optimize(5);
        let child = parent.split();
        assert!(same_tracker(parent.progress_tracker(), child.progress_tracker()));
        assert!(same_problem(parent.problem(), child.problem()));
        assert_eq!(child.total_run_length(), 0);
        assert_eq!(parent.total_run_length(), 5);
        assert_eq!(child.name(), "IterativeSampling");
    }

    #[test]
    fn test_set_progress_tracker_rebinds() {
        let mut s = IterativeSampling::with_new_tracker(value(), Countdown(7));
        let other = Arc::new(ProgressTracker::new());
        s.set_progress_tracker(Arc::clone(&other));
        s.optimize(1);
        assert_eq!(other.cost(), 7);
    }
}
