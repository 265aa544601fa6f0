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


//! # Flotilla Parallel
//!
//! Parallel orchestration of restart-based stochastic local search. A set of
//! search workers that share one progress tracker and one problem is run on
//! dedicated lane threads, either for a bounded number of restarts per lane
//! (`ParallelMultistarter`) or for a number of wall-clock time units
//! (`TimedParallelMultistarter`, which also records one best-so-far snapshot
//! per time unit).
//!
//! ## Modules
//!
//! - `coordinator`: the restart-bounded fan-out coordinator.
//! - `timed`: the time-bounded sampling layer on top of it.
//! - `builder`: `MultistarterBuilder` for both.
//! - `config`: default time unit, poll interval and run length.
//! - `error`: `MultistartError` and `WorkerFailure`.
//!
//! Logging goes through `tracing`; no subscriber is installed here.

pub mod builder;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod timed;

mod pool;
mod report;

#[cfg(test)]
mod testing;
