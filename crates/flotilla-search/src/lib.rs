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


//! # Flotilla Search
//!
//! The single-threaded half of the orchestration layer: everything a worker
//! thread touches, and the shared register that ties the threads together.
//!
//! ## Modules
//!
//! - `tracker`: `ProgressTracker`, the concurrent best-so-far register with the
//!   run-wide found-best and stopped flags.
//! - `pair`: `SolutionCostPair`, an immutable solution/cost value ordered by cost.
//! - `problem`: the `Problem` contract shared by every worker of a run.
//! - `worker`: the `SearchWorker` and `ReoptimizableWorker` capability traits.
//! - `initializer`: candidate generators for sampling-based workers.
//! - `schedule`: constant and Luby restart schedules.
//! - `multistart`: `Multistarter`, the restart driver for one worker.
//! - `sampling`: `IterativeSampling`, a minimal reference worker.
//! - `stats` / `termination`: what a fan-out call reports back.

pub mod initializer;
pub mod multistart;
pub mod pair;
pub mod problem;
pub mod sampling;
pub mod schedule;
pub mod stats;
pub mod termination;
pub mod tracker;
pub mod worker;
