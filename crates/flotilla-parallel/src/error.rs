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


use thiserror::Error;

/// A worker whose restart loop panicked during a fan-out call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerFailure {
    /// Lane index of the worker, in construction order.
    pub index: usize,
    /// Name reported by the worker.
    pub worker: String,
    /// Panic message.
    pub message: String,
}

impl std::fmt::Display for WorkerFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "worker {} ({}): {}", self.index, self.worker, self.message)
    }
}

fn join_failures(failures: &[WorkerFailure]) -> String {
    failures
        .iter()
        .map(WorkerFailure::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors raised by the parallel orchestration layer.
#[derive(Debug, Error)]
pub enum MultistartError {
    #[error("the worker set is empty")]
    EmptyWorkerSet,

    #[error("worker {index} reports into a different progress tracker than worker 0")]
    TrackerMismatch { index: usize },

    #[error("worker {index} solves a different problem instance than worker 0")]
    ProblemMismatch { index: usize },

    #[error("{schedules} restart schedules given for {workers} workers")]
    ScheduleCountMismatch { workers: usize, schedules: usize },

    #[error("the time unit must be positive")]
    InvalidTimeUnit,

    #[error("failed to spawn a lane thread: {0}")]
    ThreadSpawn(#[source] std::io::Error),

    #[error("{} worker(s) failed: {}", .failures.len(), join_failures(.failures))]
    WorkerFailed { failures: Vec<WorkerFailure> },

    #[error("the multistarter has been closed")]
    Closed,

    #[error("lane {index} disconnected")]
    LaneDisconnected { index: usize },
}

impl MultistartError {
    /// Returns the failed workers if this is a `WorkerFailed` error.
    #[inline]
    pub fn failures(&self) -> &[WorkerFailure] {
        match self {
            MultistartError::WorkerFailed { failures } => failures,
            _ => &[],
        }
    }
}
