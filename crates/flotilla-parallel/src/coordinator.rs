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


//! # Parallel Fan-Out Coordinator
//!
//! `ParallelMultistarter` runs a set of search workers in parallel, one
//! dedicated lane thread per worker, all reporting into one shared progress
//! tracker and solving one shared problem.
//!
//! ## Highlights
//!
//! - Each call fans out to every lane, where the worker's restart driver
//!   performs up to `restart_bound` restarts. The driver stops early when the
//!   tracker signals found-best or stopped; an in-flight restart always runs to
//!   completion.
//! - The caller blocks until every lane reported. The per-lane run-length
//!   deltas are summed into a cumulative total and the best pair of the call is
//!   returned, ties going to the lowest lane index.
//! - A panicking worker does not take the call down with it: the remaining
//!   lanes are still awaited and aggregated, then `WorkerFailed` names every
//!   failed lane.
//! - Lanes persist until `close()` (or drop). Calls after `close()` return
//!   `Closed`.
//! - `reoptimize` exists only for `ReoptimizableWorker`s.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use flotilla_parallel::coordinator::ParallelMultistarter;
//!
//! // workers: Vec<W> built elsewhere, all sharing one tracker and one problem.
//! let mut multistarter = ParallelMultistarter::new(workers, 1_000)?;
//! let best = multistarter.optimize(8)?;
//! println!("{}", multistarter.last_statistics().unwrap());
//! multistarter.close();
//! ```

use crate::{
    error::{MultistartError, WorkerFailure},
    pool::{Pending, WorkerPool},
    report::{CallSummary, LaneReport},
};
use flotilla_core::num::Cost;
use flotilla_search::{
    multistart::{Multistarter, RestartMode},
    pair::SolutionCostPair,
    problem::Problem,
    schedule::RestartSchedule,
    stats::{RunStatistics, RunStatisticsBuilder},
    termination::TerminationReason,
    tracker::ProgressTracker,
    worker::{ReoptimizableWorker, SearchWorker, same_problem, same_tracker},
};
use std::sync::Arc;
use std::time::Instant;

/// Runs search workers in parallel and aggregates their restarts.
pub struct ParallelMultistarter<S, C, W> {
    pool: WorkerPool<S, C, W>,
    tracker: Arc<ProgressTracker<S, C>>,
    problem: Arc<dyn Problem<S, C>>,
    total_run_length: u64,
    last_statistics: Option<RunStatistics>,
}

impl<S, C, W> std::fmt::Debug for ParallelMultistarter<S, C, W>
where
    C: Cost,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParallelMultistarter")
            .field("num_threads", &self.pool.len())
            .field("tracker", &format_args!("{}", self.tracker))
            .field("total_run_length", &self.total_run_length)
            .field("closed", &self.pool.is_closed())
            .finish()
    }
}

impl<S, C, W> ParallelMultistarter<S, C, W>
where
    S: Clone + Send + 'static,
    C: Cost,
    W: SearchWorker<S, C> + 'static,
{
    /// Creates a coordinator whose workers all restart with a constant run length.
    pub fn new(workers: Vec<W>, run_length: u64) -> Result<Self, MultistartError> {
        Self::from_drivers(
            workers
                .into_iter()
                .map(|worker| Multistarter::with_run_length(worker, run_length))
                .collect(),
        )
    }

    /// Creates a coordinator with one restart schedule per worker.
    pub fn with_schedules(
        workers: Vec<W>,
        schedules: Vec<Box<dyn RestartSchedule>>,
    ) -> Result<Self, MultistartError> {
        if workers.len() != schedules.len() {
            return Err(MultistartError::ScheduleCountMismatch {
                workers: workers.len(),
                schedules: schedules.len(),
            });
        }
        Self::from_drivers(
            workers
                .into_iter()
                .zip(schedules)
                .map(|(worker, schedule)| Multistarter::new(worker, schedule))
                .collect(),
        )
    }

    /// Creates a coordinator from `prototype` and `num_threads - 1` splits of it.
    pub fn from_prototype(prototype: W, num_threads: usize, run_length: u64) -> Result<Self, MultistartError> {
        Self::new(replicate::<S, C, W>(prototype, num_threads)?, run_length)
    }

    /// Validates the drivers and starts one lane per driver.
    pub(crate) fn from_drivers(drivers: Vec<Multistarter<S, C, W>>) -> Result<Self, MultistartError> {
        let first = drivers.first().ok_or(MultistartError::EmptyWorkerSet)?;
        let tracker = Arc::clone(first.progress_tracker());
        let problem = Arc::clone(first.problem());

        for (index, driver) in drivers.iter().enumerate().skip(1) {
            if !same_tracker(&tracker, driver.progress_tracker()) {
                return Err(MultistartError::TrackerMismatch { index });
            }
            if !same_problem(&problem, driver.problem()) {
                return Err(MultistartError::ProblemMismatch { index });
            }
        }

        Ok(Self {
            pool: WorkerPool::spawn(drivers)?,
            tracker,
            problem,
            total_run_length: 0,
            last_statistics: None,
        })
    }

    /// Runs up to `restart_bound` restarts of `optimize` on every lane.
    ///
    /// Returns the best pair of this call, or `None` if no lane produced one.
    #[tracing::instrument(skip(self))]
    pub fn optimize(&mut self, restart_bound: u64) -> Result<Option<SolutionCostPair<S, C>>, MultistartError> {
        let started = Instant::now();
        let pending = self.launch(RestartMode::Optimize, move |driver| driver.optimize(restart_bound))?;
        self.conclude(RestartMode::Optimize, pending, started, 0)
    }

    /// Rebinds every lane's worker, and this coordinator, to `tracker`.
    #[tracing::instrument(skip(self, tracker))]
    pub fn set_progress_tracker(&mut self, tracker: Arc<ProgressTracker<S, C>>) -> Result<(), MultistartError> {
        let lane_tracker = Arc::clone(&tracker);
        let replies = self
            .pool
            .dispatch(move |driver| driver.worker_mut().set_progress_tracker(Arc::clone(&lane_tracker)))?;
        self.tracker = tracker;

        let failures: Vec<WorkerFailure> = replies
            .into_iter()
            .enumerate()
            .filter_map(|(index, reply)| {
                reply.err().map(|message| WorkerFailure {
                    index,
                    worker: self.pool.worker_names().get(index).cloned().unwrap_or_default(),
                    message,
                })
            })
            .collect();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(MultistartError::WorkerFailed { failures })
        }
    }

    /// Sends the restart loop `run` to every lane without waiting.
    pub(crate) fn launch<R>(&self, mode: RestartMode, run: R) -> Result<Pending<LaneReport<S, C>>, MultistartError>
    where
        R: Fn(&mut Multistarter<S, C, W>) -> Option<SolutionCostPair<S, C>> + Clone + Send + 'static,
    {
        tracing::debug!(%mode, lanes = self.pool.len(), "fan-out started");
        self.pool.submit(move |driver| LaneReport::capture(driver, &run))
    }

    /// Waits for the lanes of a launched call and aggregates their reports.
    pub(crate) fn conclude(
        &mut self,
        mode: RestartMode,
        pending: Pending<LaneReport<S, C>>,
        started: Instant,
        time_units: usize,
    ) -> Result<Option<SolutionCostPair<S, C>>, MultistartError> {
        let summary = CallSummary::collect(pending.wait()?, self.pool.worker_names());
        self.total_run_length += summary.run_length;

        let termination = TerminationReason::from_tracker(&self.tracker);
        if termination.is_early() {
            tracing::info!(%mode, %termination, "run ended early");
        }

        let statistics = RunStatisticsBuilder::new()
            .restarts(summary.restarts)
            .run_length(summary.run_length)
            .used_threads(self.pool.len())
            .time_units(time_units)
            .duration(started.elapsed())
            .termination(termination)
            .build();
        tracing::debug!(
            %mode,
            restarts = statistics.restarts,
            run_length = statistics.run_length,
            best = summary.best.as_ref().map(|b| b.cost_f64()),
            failures = summary.failures.len(),
            "fan-out finished"
        );
        self.last_statistics = Some(statistics);

        summary.into_result()
    }
}

impl<S, C, W> ParallelMultistarter<S, C, W>
where
    S: Clone + Send + 'static,
    C: Cost,
    W: ReoptimizableWorker<S, C> + 'static,
{
    /// Runs up to `restart_bound` restarts of `reoptimize` on every lane.
    #[tracing::instrument(skip(self))]
    pub fn reoptimize(&mut self, restart_bound: u64) -> Result<Option<SolutionCostPair<S, C>>, MultistartError> {
        let started = Instant::now();
        let pending = self.launch(RestartMode::Reoptimize, move |driver| driver.reoptimize(restart_bound))?;
        self.conclude(RestartMode::Reoptimize, pending, started, 0)
    }
}

impl<S, C, W> ParallelMultistarter<S, C, W> {
    /// Returns the run length accumulated over every call so far.
    #[inline]
    pub fn total_run_length(&self) -> u64 {
        self.total_run_length
    }

    /// Returns the shared progress tracker.
    #[inline]
    pub fn progress_tracker(&self) -> &Arc<ProgressTracker<S, C>> {
        &self.tracker
    }

    /// Returns the shared problem.
    #[inline]
    pub fn problem(&self) -> &Arc<dyn Problem<S, C>> {
        &self.problem
    }

    /// Returns the number of lanes.
    #[inline]
    pub fn num_threads(&self) -> usize {
        self.pool.len()
    }

    /// Returns the statistics of the most recent call.
    #[inline]
    pub fn last_statistics(&self) -> Option<&RunStatistics> {
        self.last_statistics.as_ref()
    }

    /// Joins every lane. Later calls return `MultistartError::Closed`.
    pub fn close(&mut self) {
        self.pool.close();
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

/// Returns `prototype` followed by `count - 1` splits of it.
pub(crate) fn replicate<S, C, W>(mut prototype: W, count: usize) -> Result<Vec<W>, MultistartError>
where
    C: Cost,
    W: SearchWorker<S, C>,
{
    if count == 0 {
        return Err(MultistartError::EmptyWorkerSet);
    }
    let mut splits: Vec<W> = (1..count).map(|_| prototype.split()).collect();
    let mut workers = Vec::with_capacity(count);
    workers.push(prototype);
    workers.append(&mut splits);
    Ok(workers)
}
