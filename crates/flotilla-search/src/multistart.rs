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


//! # Restart Driver
//!
//! `Multistarter` drives one search worker through repeated bounded runs
//! ("restarts"). It asks its restart schedule for each run length, keeps the
//! best pair across its own restarts, and stops early as soon as the shared
//! progress tracker signals found-best or stopped.
//!
//! ## Cancellation
//!
//! The tracker is consulted only between restarts. A restart that is already
//! running always completes; the driver then declines to start another one.
//! Cancellation latency is therefore bounded by the longest restart, never by
//! an interruption inside the worker.
//!
//! ## Modes
//!
//! - Count-bounded: `optimize(n)` / `reoptimize(n)` perform at most `n`
//!   restarts.
//! - Flag-bounded: `optimize_until(&halt)` / `reoptimize_until(&halt)` keep
//!   restarting until `halt` is raised. The timed orchestration layer uses this
//!   mode to let workers run for a wall-clock budget.
//!
//! Every call rewinds the schedule and returns the best pair of that call only;
//! `best()` keeps the best across all calls.

use crate::{
    pair::SolutionCostPair,
    problem::Problem,
    schedule::{ConstantRestartSchedule, RestartSchedule},
    tracker::ProgressTracker,
    worker::{ReoptimizableWorker, SearchWorker},
};
use flotilla_core::num::Cost;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Which worker entry point a restart loop invokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RestartMode {
    /// Every restart starts from scratch.
    Optimize,
    /// Every restart resumes from the worker's internal state.
    Reoptimize,
}

impl std::fmt::Display for RestartMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RestartMode::Optimize => write!(f, "optimize"),
            RestartMode::Reoptimize => write!(f, "reoptimize"),
        }
    }
}

/// Drives a single worker through repeated restarts.
pub struct Multistarter<S, C, W> {
    worker: W,
    schedule: Box<dyn RestartSchedule>,
    best: Option<SolutionCostPair<S, C>>,
    restarts: u64,
}

impl<S, C, W> std::fmt::Debug for Multistarter<S, C, W>
where
    C: Cost,
    W: SearchWorker<S, C>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Multistarter")
            .field("worker", &self.worker.name())
            .field("schedule", &self.schedule)
            .field("best_cost", &self.best.as_ref().map(|b| b.cost()))
            .field("restarts", &self.restarts)
            .finish()
    }
}

impl<S, C, W> Multistarter<S, C, W>
where
    S: Clone,
    C: Cost,
    W: SearchWorker<S, C>,
{
    /// Creates a driver for `worker` following `schedule`.
    #[inline]
    pub fn new(worker: W, schedule: Box<dyn RestartSchedule>) -> Self {
        Self {
            worker,
            schedule,
            best: None,
            restarts: 0,
        }
    }

    /// Creates a driver whose restarts all have the same run length.
    #[inline]
    pub fn with_run_length(worker: W, run_length: u64) -> Self {
        Self::new(worker, Box::new(ConstantRestartSchedule::new(run_length)))
    }

    /// Performs up to `num_restarts` restarts via `optimize`.
    /// Returns the best pair of this call, if any restart produced one.
    pub fn optimize(&mut self, num_restarts: u64) -> Option<SolutionCostPair<S, C>> {
        self.restart_loop(|performed| performed < num_restarts, W::optimize)
    }

    /// Restarts via `optimize` until `halt` is raised.
    pub fn optimize_until(&mut self, halt: &AtomicBool) -> Option<SolutionCostPair<S, C>> {
        self.restart_loop(|_| !halt.load(Ordering::Acquire), W::optimize)
    }

    /// Returns the best pair across every restart this driver performed.
    #[inline]
    pub fn best(&self) -> Option<&SolutionCostPair<S, C>> {
        self.best.as_ref()
    }

    /// Returns the number of restarts started over the driver's lifetime.
    #[inline]
    pub fn restarts(&self) -> u64 {
        self.restarts
    }

    /// Returns the worker's total run length.
    #[inline]
    pub fn total_run_length(&self) -> u64 {
        self.worker.total_run_length()
    }

    /// Returns the worker's progress tracker.
    #[inline]
    pub fn progress_tracker(&self) -> &Arc<ProgressTracker<S, C>> {
        self.worker.progress_tracker()
    }

    /// Returns the worker's problem.
    #[inline]
    pub fn problem(&self) -> &Arc<dyn Problem<S, C>> {
        self.worker.problem()
    }

    /// Returns the driven worker.
    #[inline]
    pub fn worker(&self) -> &W {
        &self.worker
    }

    /// Returns the driven worker mutably.
    #[inline]
    pub fn worker_mut(&mut self) -> &mut W {
        &mut self.worker
    }

    /// Consumes the driver and returns the worker.
    #[inline]
    pub fn into_worker(self) -> W {
        self.worker
    }

    fn restart_loop<K, R>(&mut self, mut keep_going: K, mut restart: R) -> Option<SolutionCostPair<S, C>>
    where
        K: FnMut(u64) -> bool,
        R: FnMut(&mut W, u64) -> Option<SolutionCostPair<S, C>>,
    {
        self.schedule.reset();

        let mut call_best: Option<SolutionCostPair<S, C>> = None;
        let mut performed = 0u64;

        while keep_going(performed) && !self.worker.progress_tracker().should_stop() {
            let run_length = self.schedule.next_run_length();
            let current = restart(&mut self.worker, run_length);
            performed += 1;
            self.restarts += 1;

            tracing::trace!(
                worker = self.worker.name(),
                restart = self.restarts,
                run_length,
                cost = current.as_ref().map(|c| c.cost_f64()),
                "restart finished"
            );

            let Some(current) = current else {
                continue;
            };
            if self.best.as_ref().is_none_or(|b| current.is_better_than(b)) {
                self.best = Some(current.clone());
            }
            if call_best.as_ref().is_none_or(|b| current.is_better_than(b)) {
                call_best = Some(current);
            }
        }

        call_best
    }
}

impl<S, C, W> Multistarter<S, C, W>
where
    S: Clone,
    C: Cost,
    W: ReoptimizableWorker<S, C>,
{
    /// Performs up to `num_restarts` restarts via `reoptimize`.
    pub fn reoptimize(&mut self, num_restarts: u64) -> Option<SolutionCostPair<S, C>> {
        self.restart_loop(|performed| performed < num_restarts, W::reoptimize)
    }

    /// Restarts via `reoptimize` until `halt` is raised.
    pub fn reoptimize_until(&mut self, halt: &AtomicBool) -> Option<SolutionCostPair<S, C>> {
        self.restart_loop(|_| !halt.load(Ordering::Acquire), W::reoptimize)
    }
}

#[cfg(test)]
mod tests {
    use super::{Multistarter, RestartMode};
    use crate::{
        pair::SolutionCostPair,
        problem::Problem,
        schedule::LubyRestartSchedule,
        tracker::ProgressTracker,
        worker::{ReoptimizableWorker, SearchWorker},
    };
    use flotilla_core::split::Splittable;
    use std::sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    };

    struct Identity;

    impl Problem<i64, i64> for Identity {
        fn cost(&self, solution: &i64) -> i64 {
            *solution
        }

        fn min_cost(&self) -> i64 {
            0
        }
    }

    /// Replays scripted restart costs and records the run lengths it was given.
    struct Scripted {
        costs: Vec<i64>,
        next: usize,
        run_lengths: Vec<u64>,
        reoptimized: u64,
        total: u64,
        stop_after: Option<usize>,
        tracker: Arc<ProgressTracker<i64, i64>>,
        problem: Arc<dyn Problem<i64, i64>>,
    }

    impl Scripted {
        fn new(costs: Vec<i64>, tracker: Arc<ProgressTracker<i64, i64>>) -> Self {
            Self {
                costs,
                next: 0,
                run_lengths: Vec::new(),
                reoptimized: 0,
                total: 0,
                stop_after: None,
                tracker,
                problem: Arc::new(Identity),
            }
        }

        fn restart(&mut self, run_length: u64) -> Option<SolutionCostPair<i64, i64>> {
            self.run_lengths.push(run_length);
            self.total += run_length;
            let cost = *self.costs.get(self.next)?;
            self.next += 1;
            self.tracker.update(cost, &cost);
            if self.problem.is_min_cost(cost) {
                self.tracker.set_found_best();
            }
            if self.stop_after == Some(self.next) {
                self.tracker.stop();
            }
            Some(SolutionCostPair::new(cost, cost))
        }
    }

    impl Splittable for Scripted {
        fn split(&mut self) -> Self {
            Scripted::new(self.costs.clone(), Arc::clone(&self.tracker))
        }
    }

    impl SearchWorker<i64, i64> for Scripted {
        fn name(&self) -> &str {
            "Scripted"
        }

        fn optimize(&mut self, run_length: u64) -> Option<SolutionCostPair<i64, i64>> {
            self.restart(run_length)
        }

        fn total_run_length(&self) -> u64 {
            self.total
        }

        fn progress_tracker(&self) -> &Arc<ProgressTracker<i64, i64>> {
            &self.tracker
        }

        fn set_progress_tracker(&mut self, tracker: Arc<ProgressTracker<i64, i64>>) {
            self.tracker = tracker;
        }

        fn problem(&self) -> &Arc<dyn Problem<i64, i64>> {
            &self.problem
        }
    }

    impl ReoptimizableWorker<i64, i64> for Scripted {
        fn reoptimize(&mut self, run_length: u64) -> Option<SolutionCostPair<i64, i64>> {
            self.reoptimized += 1;
            self.restart(run_length)
        }
    }

    fn tracker() -> Arc<ProgressTracker<i64, i64>> {
        Arc::new(ProgressTracker::new())
    }

    #[test]
    fn test_optimize_performs_bounded_restarts_and_returns_call_best() {
        let t = tracker();
        let mut m = Multistarter::with_run_length(Scripted::new(vec![9, 4, 7, 4, 6], Arc::clone(&t)), 10);

        let best = m.optimize(5).expect("restarts produced pairs");
        assert_eq!(best.cost(), 4);
        assert_eq!(m.restarts(), 5);
        assert_eq!(m.total_run_length(), 50);
        assert_eq!(m.worker().run_lengths, vec![10; 5]);
        assert_eq!(m.best().map(|b| b.cost()), Some(4));
        assert_eq!(t.cost(), 4);
    }

    #[test]
    fn test_call_best_is_per_call_and_best_is_lifetime() {
        let t = tracker();
        let mut m = Multistarter::with_run_length(Scripted::new(vec![3, 8, 9], Arc::clone(&t)), 1);

        assert_eq!(m.optimize(1).map(|p| p.cost()), Some(3));
        assert_eq!(m.optimize(2).map(|p| p.cost()), Some(8));
        assert_eq!(m.best().map(|b| b.cost()), Some(3));
        assert_eq!(m.restarts(), 3);
    }

    #[test]
    fn test_zero_restarts_does_nothing() {
        let mut m = Multistarter::with_run_length(Scripted::new(vec![1], tracker()), 5);
        assert!(m.optimize(0).is_none());
        assert_eq!(m.restarts(), 0);
        assert_eq!(m.total_run_length(), 0);
    }

    #[test]
    fn test_stops_after_found_best_without_new_restart() {
        let t = tracker();
        let mut m = Multistarter::with_run_length(Scripted::new(vec![5, 0, 2, 1], Arc::clone(&t)), 1);
        let best = m.optimize(10).unwrap();
        assert_eq!(best.cost(), 0);
        assert!(t.found_best());
        assert_eq!(m.restarts(), 2);
    }

    #[test]
    fn test_stops_after_cancellation_without_new_restart() {
        let t = tracker();
        let mut worker = Scripted::new(vec![5, 4, 3, 2, 1], Arc::clone(&t));
        worker.stop_after = Some(3);
        let mut m = Multistarter::with_run_length(worker, 1);
        assert_eq!(m.optimize(10).map(|p| p.cost()), Some(3));
        assert_eq!(m.restarts(), 3);

        // A stopped tracker prevents any further restart.
        assert!(m.optimize(10).is_none());
        assert_eq!(m.restarts(), 3);
    }

    #[test]
    fn test_schedule_is_rewound_per_call() {
        let mut m = Multistarter::new(
            Scripted::new(vec![9; 10], tracker()),
            Box::new(LubyRestartSchedule::new(10)),
        );
        m.optimize(3);
        m.optimize(3);
        assert_eq!(m.worker().run_lengths, vec![10, 10, 20, 10, 10, 20]);
    }

    #[test]
    fn test_reoptimize_uses_reoptimize_entry_point() {
        let mut m = Multistarter::with_run_length(Scripted::new(vec![6, 2], tracker()), 3);
        assert_eq!(m.reoptimize(2).map(|p| p.cost()), Some(2));
        assert_eq!(m.worker().reoptimized, 2);
    }

    #[test]
    fn test_until_mode_runs_until_halt() {
        let halt = AtomicBool::new(true);
        let mut m = Multistarter::with_run_length(Scripted::new(vec![1, 2], tracker()), 3);
        assert!(m.optimize_until(&halt).is_none());
        assert!(m.reoptimize_until(&halt).is_none());
        assert_eq!(m.restarts(), 0);

        // With the flag down the loop ends when the worker runs dry and the
        // tracker is stopped by the test.
        let t = tracker();
        let mut worker = Scripted::new(vec![7, 6, 5], Arc::clone(&t));
        worker.stop_after = Some(3);
        let mut m = Multistarter::with_run_length(worker, 2);
        halt.store(false, Ordering::Release);
        assert_eq!(m.optimize_until(&halt).map(|p| p.cost()), Some(5));
        assert_eq!(m.restarts(), 3);
    }

    #[test]
    fn test_into_worker_and_accessors() {
        let t = tracker();
        let m = Multistarter::with_run_length(Scripted::new(vec![], Arc::clone(&t)), 1);
        assert!(Arc::ptr_eq(m.progress_tracker(), &t));
        assert_eq!(m.problem().min_cost(), 0);
        assert!(format!("{:?}", m).contains("Scripted"));
        let w = m.into_worker();
        assert_eq!(w.name(), "Scripted");
    }

    #[test]
    fn test_restart_mode_display() {
        assert_eq!(RestartMode::Optimize.to_string(), "optimize");
        assert_eq!(RestartMode::Reoptimize.to_string(), "reoptimize");
    }
}
