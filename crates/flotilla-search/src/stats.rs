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


use crate::termination::TerminationReason;

/// Statistics of the most recent fan-out call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStatistics {
    /// Number of restarts started across all lanes.
    pub restarts: u64,
    /// Run length accumulated by all lanes during the call.
    pub run_length: u64,
    /// Number of lanes that took part.
    pub used_threads: usize,
    /// Time quanta sampled. Always zero for count-bounded calls.
    pub time_units: usize,
    /// Wall-clock duration of the call.
    pub duration: std::time::Duration,
    /// Why the call ended.
    pub termination: TerminationReason,
}

impl std::fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Run Statistics:")?;
        writeln!(f, "  Restarts: {}", self.restarts)?;
        writeln!(f, "  Run Length: {}", self.run_length)?;
        writeln!(f, "  Used Threads: {}", self.used_threads)?;
        writeln!(f, "  Time Units: {}", self.time_units)?;
        writeln!(f, "  Duration (secs): {:.3}", self.duration.as_secs_f64())?;
        writeln!(f, "  Termination: {}", self.termination)
    }
}

/// Builder for `RunStatistics`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStatisticsBuilder {
    restarts: u64,
    run_length: u64,
    used_threads: usize,
    time_units: usize,
    duration: std::time::Duration,
    termination: TerminationReason,
}

impl Default for RunStatisticsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RunStatisticsBuilder {
    /// Creates a builder with zeroed counters and a single thread.
    #[inline]
    pub fn new() -> Self {
        Self {
            restarts: 0,
            run_length: 0,
            used_threads: 1,
            time_units: 0,
            duration: std::time::Duration::ZERO,
            termination: TerminationReason::BudgetExhausted,
        }
    }

    #[inline]
    pub fn restarts(mut self, restarts: u64) -> Self {
        self.restarts = restarts;
        self
    }

    #[inline]
    pub fn run_length(mut self, run_length: u64) -> Self {
        self.run_length = run_length;
        self
    }

    #[inline]
    pub fn used_threads(mut self, used_threads: usize) -> Self {
        self.used_threads = used_threads;
        self
    }

    #[inline]
    pub fn time_units(mut self, time_units: usize) -> Self {
        self.time_units = time_units;
        self
    }

    #[inline]
    pub fn duration(mut self, duration: std::time::Duration) -> Self {
        self.duration = duration;
        self
    }

    #[inline]
    pub fn termination(mut self, termination: TerminationReason) -> Self {
        self.termination = termination;
        self
    }

    /// Builds the `RunStatistics` instance.
    #[inline]
    pub fn build(self) -> RunStatistics {
        RunStatistics {
            restarts: self.restarts,
            run_length: self.run_length,
            used_threads: self.used_threads,
            time_units: self.time_units,
            duration: self.duration,
            termination: self.termination,
        }
    }
}
