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


//! Per-lane reports of a fan-out call and their aggregation.

use crate::{
    error::{MultistartError, WorkerFailure},
    pool::panic_message,
};
use flotilla_core::num::Cost;
use flotilla_search::{
    multistart::Multistarter,
    pair::{SolutionCostPair, best_of},
    worker::SearchWorker,
};
use std::panic::{self, AssertUnwindSafe};

/// What one lane did during one call.
///
/// The restart loop is run under `catch_unwind` so the work done before a
/// panic is still accounted for.
#[derive(Debug)]
pub(crate) struct LaneReport<S, C> {
    pub(crate) outcome: Result<Option<SolutionCostPair<S, C>>, String>,
    pub(crate) run_length: u64,
    pub(crate) restarts: u64,
}

impl<S, C> LaneReport<S, C>
where
    S: Clone,
    C: Cost,
{
    pub(crate) fn capture<W, R>(driver: &mut Multistarter<S, C, W>, run: &R) -> Self
    where
        W: SearchWorker<S, C>,
        R: Fn(&mut Multistarter<S, C, W>) -> Option<SolutionCostPair<S, C>>,
    {
        let run_length_before = driver.total_run_length();
        let restarts_before = driver.restarts();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| run(driver))).map_err(panic_message);

        Self {
            outcome,
            run_length: driver.total_run_length().saturating_sub(run_length_before),
            restarts: driver.restarts().saturating_sub(restarts_before),
        }
    }
}

/// The aggregate of every lane's report for one call.
#[derive(Debug)]
pub(crate) struct CallSummary<S, C> {
    pub(crate) best: Option<SolutionCostPair<S, C>>,
    pub(crate) run_length: u64,
    pub(crate) restarts: u64,
    pub(crate) failures: Vec<WorkerFailure>,
}

impl<S, C> CallSummary<S, C>
where
    C: Cost,
{
    /// Folds the replies in lane order. Ties between lanes go to the lowest index.
    pub(crate) fn collect(replies: Vec<Result<LaneReport<S, C>, String>>, worker_names: &[String]) -> Self {
        let mut bests = Vec::with_capacity(replies.len());
        let mut failures = Vec::new();
        let mut run_length = 0u64;
        let mut restarts = 0u64;

        for (index, reply) in replies.into_iter().enumerate() {
            let message = match reply {
                Ok(LaneReport {
                    outcome,
                    run_length: lane_run_length,
                    restarts: lane_restarts,
                }) => {
                    run_length += lane_run_length;
                    restarts += lane_restarts;
                    match outcome {
                        Ok(best) => {
                            bests.extend(best);
                            continue;
                        }
                        Err(message) => message,
                    }
                }
                Err(message) => message,
            };

            let failure = WorkerFailure {
                index,
                worker: worker_names.get(index).cloned().unwrap_or_default(),
                message,
            };
            tracing::warn!(lane = failure.index, worker = %failure.worker, message = %failure.message, "worker failed");
            failures.push(failure);
        }

        Self {
            best: best_of(bests),
            run_length,
            restarts,
            failures,
        }
    }

    /// Returns the best pair, or `WorkerFailed` if any lane failed.
    pub(crate) fn into_result(self) -> Result<Option<SolutionCostPair<S, C>>, MultistartError> {
        if self.failures.is_empty() {
            Ok(self.best)
        } else {
            Err(MultistartError::WorkerFailed {
                failures: self.failures,
            })
        }
    }
}
