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


//! # Timed Sampling Layer
//!
//! `TimedParallelMultistarter` bounds a parallel run by wall-clock time instead
//! of a restart count. A call to `optimize(k)` lets every lane restart its
//! worker back to back while the calling thread samples the shared tracker
//! once per time unit, producing a history of `k` snapshots.
//!
//! ## Quanta
//!
//! Quantum `i` ends at `call_start + (i + 1) * time_unit`. At the end of each
//! quantum the tracker's best pair is appended to the history. The wait is done
//! in slices of the poll interval so a found optimum or a cancellation ends
//! the current quantum early; its snapshot is still taken and no further
//! quanta follow. Once sampling is over the lanes are told to halt and the
//! call waits for their in-flight restarts, so the elapsed time of a call is
//! at least `k * time_unit` and exceeds it by at most the longest restart.
//! A deadline past what the clock can represent is never reached; such a
//! quantum lasts until the tracker signals found-best or stopped.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use flotilla_parallel::timed::TimedParallelMultistarter;
//! use std::time::Duration;
//!
//! let mut timed = TimedParallelMultistarter::new(workers, 1_000)?;
//! timed.set_time_unit(Duration::from_millis(100))?;
//! let best = timed.optimize(50)?; // five seconds
//! for (quantum, snapshot) in timed.search_history().unwrap().iter().enumerate() {
//!     println!("{quantum}: {snapshot}");
//! }
//! ```

use crate::{
    config::{DEFAULT_POLL_INTERVAL, DEFAULT_TIME_UNIT},
    coordinator::ParallelMultistarter,
    error::MultistartError,
};
use flotilla_core::num::Cost;
use flotilla_search::{
    multistart::{Multistarter, RestartMode},
    pair::SolutionCostPair,
    problem::Problem,
    schedule::RestartSchedule,
    stats::RunStatistics,
    tracker::ProgressTracker,
    worker::{ReoptimizableWorker, SearchWorker},
};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::{Duration, Instant};

/// Upper bound on the history capacity reserved up front.
const HISTORY_PREALLOCATION: usize = 1_024;

/// Raises the lanes' halt flag when dropped, so an unwinding sampler does not
/// leave lanes restarting forever.
struct HaltGuard(Arc<AtomicBool>);

impl HaltGuard {
    fn new(raised: bool) -> Self {
        Self(Arc::new(AtomicBool::new(raised)))
    }

    fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.0)
    }
}

impl Drop for HaltGuard {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Release);
    }
}

/// Runs search workers in parallel for a number of time units.
pub struct TimedParallelMultistarter<S, C, W> {
    inner: ParallelMultistarter<S, C, W>,
    time_unit: Duration,
    poll_interval: Duration,
    history: Option<Vec<SolutionCostPair<S, C>>>,
}

impl<S, C, W> std::fmt::Debug for TimedParallelMultistarter<S, C, W>
where
    C: Cost,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimedParallelMultistarter")
            .field("inner", &self.inner)
            .field("time_unit", &self.time_unit)
            .field("poll_interval", &self.poll_interval)
            .field("history_len", &self.history.as_ref().map(Vec::len))
            .finish()
    }
}

impl<S, C, W> TimedParallelMultistarter<S, C, W>
where
    S: Clone + Send + 'static,
    C: Cost,
    W: SearchWorker<S, C> + 'static,
{
    /// Creates a timed layer whose workers restart with a constant run length.
    /// The time unit defaults to one second.
    pub fn new(workers: Vec<W>, run_length: u64) -> Result<Self, MultistartError> {
        Ok(Self::from_coordinator(
            ParallelMultistarter::new(workers, run_length)?,
            DEFAULT_TIME_UNIT,
            DEFAULT_POLL_INTERVAL,
        ))
    }

    /// Creates a timed layer with one restart schedule per worker.
    pub fn with_schedules(
        workers: Vec<W>,
        schedules: Vec<Box<dyn RestartSchedule>>,
    ) -> Result<Self, MultistartError> {
        Ok(Self::from_coordinator(
            ParallelMultistarter::with_schedules(workers, schedules)?,
            DEFAULT_TIME_UNIT,
            DEFAULT_POLL_INTERVAL,
        ))
    }

    /// Creates a timed layer from `prototype` and `num_threads - 1` splits of it.
    pub fn from_prototype(prototype: W, num_threads: usize, run_length: u64) -> Result<Self, MultistartError> {
        Ok(Self::from_coordinator(
            ParallelMultistarter::from_prototype(prototype, num_threads, run_length)?,
            DEFAULT_TIME_UNIT,
            DEFAULT_POLL_INTERVAL,
        ))
    }

    pub(crate) fn from_coordinator(
        inner: ParallelMultistarter<S, C, W>,
        time_unit: Duration,
        poll_interval: Duration,
    ) -> Self {
        Self {
            inner,
            time_unit,
            poll_interval,
            history: None,
        }
    }

    /// Runs `optimize` restarts on every lane for `num_time_units` time units.
    ///
    /// Returns the tracker's best pair at the end of the call, or `None` if no
    /// solution has been found yet.
    #[tracing::instrument(skip(self))]
    pub fn optimize(&mut self, num_time_units: usize) -> Result<Option<SolutionCostPair<S, C>>, MultistartError> {
        self.run_timed(RestartMode::Optimize, num_time_units, |driver, halt| {
            driver.optimize_until(halt)
        })
    }

    /// Rebinds every lane's worker to `tracker`.
    pub fn set_progress_tracker(&mut self, tracker: Arc<ProgressTracker<S, C>>) -> Result<(), MultistartError> {
        self.inner.set_progress_tracker(tracker)
    }

    fn run_timed<R>(
        &mut self,
        mode: RestartMode,
        num_time_units: usize,
        run: R,
    ) -> Result<Option<SolutionCostPair<S, C>>, MultistartError>
    where
        R: Fn(&mut Multistarter<S, C, W>, &AtomicBool) -> Option<SolutionCostPair<S, C>>
            + Clone
            + Send
            + 'static,
    {
        let started = Instant::now();
        let halt = HaltGuard::new(num_time_units == 0);

        let lane_halt = halt.flag();
        let pending = self
            .inner
            .launch(mode, move |driver| run(driver, &lane_halt))?;

        let history = self.sample(started, num_time_units);
        drop(halt);

        let time_units = history.len();
        self.history = Some(history);
        self.inner.conclude(mode, pending, started, time_units)?;

        let tracker = self.inner.progress_tracker();
        Ok(tracker.has_solution().then(|| tracker.solution_cost_pair()))
    }

    /// Takes one snapshot per quantum until `num_time_units` quanta elapsed or
    /// the tracker signals found-best or stopped.
    fn sample(&self, started: Instant, num_time_units: usize) -> Vec<SolutionCostPair<S, C>> {
        let tracker = self.inner.progress_tracker();
        let mut history = Vec::with_capacity(num_time_units.min(HISTORY_PREALLOCATION));
        let mut deadline = Some(started);

        for quantum in 0..num_time_units {
            deadline = deadline.and_then(|d| d.checked_add(self.time_unit));
            self.wait_until(deadline, tracker);

            let snapshot = tracker.solution_cost_pair();
            tracing::trace!(quantum, cost = snapshot.cost_f64(), "history snapshot");
            history.push(snapshot);

            if tracker.should_stop() {
                break;
            }
        }
        history
    }

    /// Sleeps until `deadline` or until the tracker signals. A `None` deadline
    /// lies past what the clock can represent and only a signal ends the wait.
    fn wait_until(&self, deadline: Option<Instant>, tracker: &ProgressTracker<S, C>) {
        loop {
            if tracker.should_stop() {
                return;
            }
            let now = Instant::now();
            let slice = match deadline {
                Some(deadline) if now >= deadline => return,
                Some(deadline) => (deadline - now).min(self.poll_interval),
                None => self.poll_interval,
            };
            std::thread::sleep(slice);
        }
    }
}

impl<S, C, W> TimedParallelMultistarter<S, C, W>
where
    S: Clone + Send + 'static,
    C: Cost,
    W: ReoptimizableWorker<S, C> + 'static,
{
    /// Runs `reoptimize` restarts on every lane for `num_time_units` time units.
    #[tracing::instrument(skip(self))]
    pub fn reoptimize(&mut self, num_time_units: usize) -> Result<Option<SolutionCostPair<S, C>>, MultistartError> {
        self.run_timed(RestartMode::Reoptimize, num_time_units, |driver, halt| {
            driver.reoptimize_until(halt)
        })
    }
}

impl<S, C, W> TimedParallelMultistarter<S, C, W> {
    /// Returns the length of one time unit.
    #[inline]
    pub fn time_unit(&self) -> Duration {
        self.time_unit
    }

    /// Sets the length of one time unit for subsequent calls.
    pub fn set_time_unit(&mut self, time_unit: Duration) -> Result<(), MultistartError> {
        if time_unit.is_zero() {
            return Err(MultistartError::InvalidTimeUnit);
        }
        self.time_unit = time_unit;
        Ok(())
    }

    /// Returns how often the tracker is checked while waiting out a quantum.
    #[inline]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Returns one snapshot per elapsed time unit of the most recent call, or
    /// `None` before the first call.
    #[inline]
    pub fn search_history(&self) -> Option<&[SolutionCostPair<S, C>]> {
        self.history.as_deref()
    }

    #[inline]
    pub fn total_run_length(&self) -> u64 {
        self.inner.total_run_length()
    }

    #[inline]
    pub fn progress_tracker(&self) -> &Arc<ProgressTracker<S, C>> {
        self.inner.progress_tracker()
    }

    #[inline]
    pub fn problem(&self) -> &Arc<dyn Problem<S, C>> {
        self.inner.problem()
    }

    #[inline]
    pub fn num_threads(&self) -> usize {
        self.inner.num_threads()
    }

    #[inline]
    pub fn last_statistics(&self) -> Option<&RunStatistics> {
        self.inner.last_statistics()
    }

    /// Joins every lane. Later calls return `MultistartError::Closed`.
    pub fn close(&mut self) {
        self.inner.close();
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }
}
