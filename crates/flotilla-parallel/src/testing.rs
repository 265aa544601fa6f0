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


//! Test doubles shared by the unit tests of this crate.

use flotilla_core::split::Splittable;
use flotilla_search::{
    multistart::Multistarter,
    pair::SolutionCostPair,
    problem::Problem,
    tracker::ProgressTracker,
    worker::{ReoptimizableWorker, SearchWorker},
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::{
    Arc, Mutex, Once,
    atomic::{AtomicU64, Ordering},
};

pub(crate) type Tracker = Arc<ProgressTracker<u32, i64>>;
pub(crate) type SharedProblem = Arc<dyn Problem<u32, i64>>;

/// Installs a `RUST_LOG`-driven subscriber once per test binary.
pub(crate) fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Cost is the value itself. The optimum lies below anything the doubles draw.
pub(crate) struct ValueProblem;

impl Problem<u32, i64> for ValueProblem {
    fn cost(&self, solution: &u32) -> i64 {
        i64::from(*solution)
    }

    fn min_cost(&self) -> i64 {
        -10_000
    }
}

pub(crate) fn shared() -> (Tracker, SharedProblem) {
    (Arc::new(ProgressTracker::new()), Arc::new(ValueProblem))
}

/// How often each entry point of a `SampleWorker` was called.
#[derive(Debug, Default)]
pub(crate) struct Calls {
    pub(crate) optimize: AtomicU64,
    pub(crate) reoptimize: AtomicU64,
}

impl Calls {
    pub(crate) fn optimize(&self) -> u64 {
        self.optimize.load(Ordering::SeqCst)
    }

    pub(crate) fn reoptimize(&self) -> u64 {
        self.reoptimize.load(Ordering::SeqCst)
    }
}

/// Draws `1 + run_length` random values per restart and keeps the smallest.
pub(crate) struct SampleWorker {
    id: usize,
    rng: ChaCha8Rng,
    total_run_length: u64,
    explode: bool,
    signal: Option<(u64, fn(&ProgressTracker<u32, i64>))>,
    calls: Arc<Calls>,
    tracker: Tracker,
    problem: SharedProblem,
}

impl SampleWorker {
    pub(crate) fn new(id: usize, tracker: Tracker, problem: SharedProblem) -> Self {
        Self {
            id,
            rng: ChaCha8Rng::seed_from_u64(id as u64),
            total_run_length: 0,
            explode: false,
            signal: None,
            calls: Arc::new(Calls::default()),
            tracker,
            problem,
        }
    }

    /// A worker whose every restart panics.
    pub(crate) fn exploding(id: usize, tracker: Tracker, problem: SharedProblem) -> Self {
        Self {
            explode: true,
            ..Self::new(id, tracker, problem)
        }
    }

    /// A worker that raises `signal` on its tracker at the end of restart
    /// number `after`.
    pub(crate) fn signalling(
        id: usize,
        tracker: Tracker,
        problem: SharedProblem,
        after: u64,
        signal: fn(&ProgressTracker<u32, i64>),
    ) -> Self {
        Self {
            signal: Some((after, signal)),
            ..Self::new(id, tracker, problem)
        }
    }

    pub(crate) fn id(&self) -> usize {
        self.id
    }

    pub(crate) fn calls(&self) -> Arc<Calls> {
        Arc::clone(&self.calls)
    }

    fn restart(&mut self, run_length: u64) -> Option<SolutionCostPair<u32, i64>> {
        if self.explode {
            panic!("worker {} exploded", self.id);
        }

        let mut best = self.rng.random_range(0..10_000u32);
        self.total_run_length += 1;
        self.tracker.update(self.problem.cost(&best), &best);

        for _ in 0..run_length {
            let candidate = self.rng.random_range(0..10_000u32);
            self.total_run_length += 1;
            if candidate < best {
                best = candidate;
                self.tracker.update(self.problem.cost(&best), &best);
            }
        }

        if let Some((after, signal)) = self.signal {
            if self.calls.optimize() + self.calls.reoptimize() == after {
                signal(&self.tracker);
            }
        }

        Some(SolutionCostPair::new(best, self.problem.cost(&best)))
    }
}

impl Splittable for SampleWorker {
    fn split(&mut self) -> Self {
        Self::new(self.id * 10 + 1, Arc::clone(&self.tracker), Arc::clone(&self.problem))
    }
}

impl SearchWorker<u32, i64> for SampleWorker {
    fn name(&self) -> &str {
        "SampleWorker"
    }

    fn optimize(&mut self, run_length: u64) -> Option<SolutionCostPair<u32, i64>> {
        self.calls.optimize.fetch_add(1, Ordering::SeqCst);
        self.restart(run_length)
    }

    fn total_run_length(&self) -> u64 {
        self.total_run_length
    }

    fn progress_tracker(&self) -> &Tracker {
        &self.tracker
    }

    fn set_progress_tracker(&mut self, tracker: Tracker) {
        self.tracker = tracker;
    }

    fn problem(&self) -> &SharedProblem {
        &self.problem
    }
}

impl ReoptimizableWorker<u32, i64> for SampleWorker {
    fn reoptimize(&mut self, run_length: u64) -> Option<SolutionCostPair<u32, i64>> {
        self.calls.reoptimize.fetch_add(1, Ordering::SeqCst);
        self.restart(run_length)
    }
}

/// `n` sample workers sharing one tracker and one problem.
pub(crate) fn sample_workers(n: usize) -> (Vec<SampleWorker>, Tracker, SharedProblem) {
    let (tracker, problem) = shared();
    let workers = (0..n)
        .map(|id| SampleWorker::new(id, Arc::clone(&tracker), Arc::clone(&problem)))
        .collect();
    (workers, tracker, problem)
}

pub(crate) fn sample_drivers(n: usize, run_length: u64) -> Vec<Multistarter<u32, i64, SampleWorker>> {
    sample_workers(n)
        .0
        .into_iter()
        .map(|w| Multistarter::with_run_length(w, run_length))
        .collect()
}

/// A worker whose first sample of every restart is a new personal best and
/// whose remaining samples only get worse, until the first sample bottoms out
/// at zero. Records every first sample.
pub(crate) struct FirstSampleWorker {
    id: usize,
    restarts: u32,
    total_run_length: u64,
    firsts: Arc<Mutex<Vec<i64>>>,
    tracker: Tracker,
    problem: SharedProblem,
}

impl FirstSampleWorker {
    pub(crate) fn new(id: usize, firsts: Arc<Mutex<Vec<i64>>>, tracker: Tracker, problem: SharedProblem) -> Self {
        Self {
            id,
            restarts: 0,
            total_run_length: 0,
            firsts,
            tracker,
            problem,
        }
    }
}

impl Splittable for FirstSampleWorker {
    fn split(&mut self) -> Self {
        Self::new(
            self.id + 100,
            Arc::clone(&self.firsts),
            Arc::clone(&self.tracker),
            Arc::clone(&self.problem),
        )
    }
}

impl SearchWorker<u32, i64> for FirstSampleWorker {
    fn name(&self) -> &str {
        "FirstSampleWorker"
    }

    fn optimize(&mut self, run_length: u64) -> Option<SolutionCostPair<u32, i64>> {
        let first = (1_000 * (self.id as u32 + 1)).saturating_sub(10u32.saturating_mul(self.restarts));
        self.restarts = self.restarts.saturating_add(1);
        if let Ok(mut firsts) = self.firsts.lock() {
            firsts.push(i64::from(first));
        }

        for step in 0..=run_length {
            let sample = first + step as u32;
            self.total_run_length += 1;
            self.tracker.update(self.problem.cost(&sample), &sample);
        }

        Some(SolutionCostPair::new(first, self.problem.cost(&first)))
    }

    fn total_run_length(&self) -> u64 {
        self.total_run_length
    }

    fn progress_tracker(&self) -> &Tracker {
        &self.tracker
    }

    fn set_progress_tracker(&mut self, tracker: Tracker) {
        self.tracker = tracker;
    }

    fn problem(&self) -> &SharedProblem {
        &self.problem
    }
}
