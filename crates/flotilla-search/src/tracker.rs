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


//! # Progress Tracker (Shared Best-So-Far Register)
//!
//! A concurrent record of the best solution discovered by any worker of one
//! run, plus the two run-wide signals every worker polls between restarts:
//! `found_best` (the theoretical optimum was reached) and `stopped` (external
//! cancellation).
//!
//! ## Highlights
//!
//! - `update(cost, &solution) -> bool` installs strictly better candidates.
//!   Ties keep the incumbent, so the first writer wins.
//! - The solution and its cost live together behind one `Mutex`, so a reader
//!   never observes a solution paired with another solution's cost.
//! - A lock-free `f64` cost hint short-circuits candidates that are obviously
//!   worse without touching the mutex. The hint is only ever used to reject;
//!   the decision to install is always made under the lock with the exact cost.
//! - `found_best` and `stopped` are sticky. A fresh tracker is the only reset.
//!
//! ## Usage
//!
//! ```rust
//! use flotilla_search::tracker::ProgressTracker;
//!
//! let tracker: ProgressTracker<Vec<usize>, i64> = ProgressTracker::new();
//! assert!(tracker.update(120, &vec![2, 0, 1]));
//! assert!(!tracker.update(120, &vec![1, 0, 2])); // ties keep the first
//! assert_eq!(tracker.cost(), 120);
//!
//! tracker.stop();
//! assert!(tracker.should_stop());
//! ```

use crate::pair::SolutionCostPair;
use flotilla_core::num::Cost;
use std::sync::{
    Mutex, MutexGuard, PoisonError,
    atomic::{AtomicBool, AtomicU64, Ordering},
};
use std::time::{Duration, Instant};

#[derive(Debug)]
struct Incumbent<S, C> {
    solution: Option<S>,
    cost: C,
    found_after: Option<Duration>,
}

/// A concurrent holder for the best solution found across all workers of a run.
///
/// Concurrency and memory ordering:
/// - The incumbent (solution, exact cost, time-to-best) is the source of truth
///   and is only read or written under the mutex.
/// - The cost hint stores `cost.as_f64()` bits. It is written with `Release`
///   while the mutex is held and read with `Acquire`, so a thread that observes
///   a hint also observes the install that produced it.
/// - Flags use `Release` stores and `Acquire` loads.
///
/// Rounding: the hint may round large integer costs. Rounding is monotone, so a
/// candidate strictly better than the incumbent never maps to a strictly larger
/// `f64` and is never rejected by the hint.
#[derive(Debug)]
pub struct ProgressTracker<S, C> {
    cost_hint: AtomicU64,
    incumbent: Mutex<Incumbent<S, C>>,
    found_best: AtomicBool,
    stopped: AtomicBool,
    created_at: Instant,
}

impl<S, C> Default for ProgressTracker<S, C>
where
    C: Cost,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S, C> std::fmt::Display for ProgressTracker<S, C>
where
    C: Cost,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ProgressTracker(cost: {}, found_best: {}, stopped: {})",
            self.cost(),
            self.found_best(),
            self.is_stopped()
        )
    }
}

impl<S, C> ProgressTracker<S, C>
where
    C: Cost,
{
    /// Creates a tracker with no solution. The cost starts at `C::worst()`.
    #[inline]
    pub fn new() -> Self {
        let worst = C::worst();
        Self {
            cost_hint: AtomicU64::new(worst.as_f64().to_bits()),
            incumbent: Mutex::new(Incumbent {
                solution: None,
                cost: worst,
                found_after: None,
            }),
            found_best: AtomicBool::new(false),
            stopped: AtomicBool::new(false),
            created_at: Instant::now(),
        }
    }

    // A panicking worker cannot leave the incumbent half-written: both fields
    // are assigned after all fallible work, so a poisoned lock is still valid.
    #[inline]
    fn lock(&self) -> MutexGuard<'_, Incumbent<S, C>> {
        self.incumbent.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Offers a candidate. Installs a clone of `solution` if `cost` is strictly
    /// lower than the current best cost and returns whether it did.
    #[inline]
    pub fn update(&self, cost: C, solution: &S) -> bool
    where
        S: Clone,
    {
        self.install_with(cost, || solution.clone())
    }

    /// Offers an owned candidate, avoiding a clone when the caller no longer
    /// needs it. Returns whether it was installed.
    #[inline]
    pub fn update_owned(&self, cost: C, solution: S) -> bool {
        self.install_with(cost, || solution)
    }

    fn install_with<F>(&self, cost: C, make_solution: F) -> bool
    where
        F: FnOnce() -> S,
    {
        // Cheap rejection of obviously worse candidates.
        if cost.as_f64() > self.cost_f64() {
            return false;
        }

        let mut guard = self.lock();
        // Another thread may have installed something better since the hint read.
        if !cost.improves_on(guard.cost) {
            return false;
        }

        guard.solution = Some(make_solution());
        guard.cost = cost;
        guard.found_after = Some(self.created_at.elapsed());
        self.cost_hint
            .store(cost.as_f64().to_bits(), Ordering::Release);

        true
    }

    /// Returns the exact best cost, or `C::worst()` if nothing was installed.
    #[inline]
    pub fn cost(&self) -> C {
        self.lock().cost
    }

    /// Returns the best cost as `f64` without locking.
    #[inline]
    pub fn cost_f64(&self) -> f64 {
        f64::from_bits(self.cost_hint.load(Ordering::Acquire))
    }

    /// Returns a clone of the best solution, if any.
    #[inline]
    pub fn solution(&self) -> Option<S>
    where
        S: Clone,
    {
        self.lock().solution.clone()
    }

    /// Returns `true` if any solution has been installed.
    #[inline]
    pub fn has_solution(&self) -> bool {
        self.lock().solution.is_some()
    }

    /// Returns a consistent snapshot of the best solution and its cost.
    #[inline]
    pub fn solution_cost_pair(&self) -> SolutionCostPair<S, C>
    where
        S: Clone,
    {
        let guard = self.lock();
        match &guard.solution {
            Some(solution) => SolutionCostPair::new(solution.clone(), guard.cost),
            None => SolutionCostPair::without_solution(guard.cost),
        }
    }

    /// Returns the time between tracker creation and the last installed improvement.
    #[inline]
    pub fn time_to_best(&self) -> Option<Duration> {
        self.lock().found_after
    }

    /// Records that a worker reached the theoretical optimum. Idempotent.
    #[inline]
    pub fn set_found_best(&self) {
        self.found_best.store(true, Ordering::Release);
    }

    /// Returns `true` once a worker reached the theoretical optimum.
    #[inline]
    pub fn found_best(&self) -> bool {
        self.found_best.load(Ordering::Acquire)
    }

    /// Requests cooperative cancellation of every worker using this tracker.
    /// Idempotent. Workers observe it at their next restart boundary.
    #[inline]
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    /// Returns `true` once cancellation was requested.
    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Returns `true` if workers should not start another restart.
    #[inline]
    pub fn should_stop(&self) -> bool {
        self.found_best() || self.is_stopped()
    }
}
