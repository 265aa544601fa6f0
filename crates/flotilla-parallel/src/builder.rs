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


use crate::{
    config::{DEFAULT_POLL_INTERVAL, DEFAULT_RUN_LENGTH, DEFAULT_TIME_UNIT},
    coordinator::{ParallelMultistarter, replicate},
    error::MultistartError,
    timed::TimedParallelMultistarter,
};
use flotilla_core::num::Cost;
use flotilla_search::{
    multistart::Multistarter,
    schedule::{ConstantRestartSchedule, RestartSchedule},
    worker::SearchWorker,
};
use std::marker::PhantomData;
use std::time::Duration;

/// Builder for `ParallelMultistarter` and `TimedParallelMultistarter`.
///
/// Workers added without a schedule restart with the builder's run length,
/// which defaults to `DEFAULT_RUN_LENGTH`.
pub struct MultistarterBuilder<S, C, W> {
    lanes: Vec<(W, Option<Box<dyn RestartSchedule>>)>,
    run_length: u64,
    time_unit: Duration,
    poll_interval: Duration,
    prototype_error: Option<MultistartError>,
    _marker: PhantomData<fn() -> (S, C)>,
}

impl<S, C, W> Default for MultistarterBuilder<S, C, W>
where
    S: Clone + Send + 'static,
    C: Cost,
    W: SearchWorker<S, C> + 'static,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<S, C, W> MultistarterBuilder<S, C, W>
where
    S: Clone + Send + 'static,
    C: Cost,
    W: SearchWorker<S, C> + 'static,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            lanes: Vec::new(),
            run_length: DEFAULT_RUN_LENGTH,
            time_unit: DEFAULT_TIME_UNIT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            prototype_error: None,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn add_worker(mut self, worker: W) -> Self {
        self.lanes.push((worker, None));
        self
    }

    #[inline]
    pub fn add_worker_with_schedule<R>(mut self, worker: W, schedule: R) -> Self
    where
        R: RestartSchedule + 'static,
    {
        self.lanes.push((worker, Some(Box::new(schedule))));
        self
    }

    /// Adds `prototype` and `num_threads - 1` splits of it.
    ///
    /// Zero threads is reported by `build` / `build_timed`.
    pub fn with_prototype(mut self, prototype: W, num_threads: usize) -> Self {
        match replicate::<S, C, W>(prototype, num_threads) {
            Ok(workers) => self.lanes.extend(workers.into_iter().map(|w| (w, None))),
            Err(err) => self.prototype_error = Some(err),
        }
        self
    }

    #[inline]
    pub fn with_run_length(mut self, run_length: u64) -> Self {
        self.run_length = run_length;
        self
    }

    #[inline]
    pub fn with_time_unit(mut self, time_unit: Duration) -> Self {
        self.time_unit = time_unit;
        self
    }

    #[inline]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Builds a restart-bounded coordinator.
    pub fn build(self) -> Result<ParallelMultistarter<S, C, W>, MultistartError> {
        if let Some(err) = self.prototype_error {
            return Err(err);
        }
        let run_length = self.run_length;
        let drivers = self
            .lanes
            .into_iter()
            .map(|(worker, schedule)| {
                let schedule = schedule.unwrap_or_else(|| {
                    Box::new(ConstantRestartSchedule::new(run_length)) as Box<dyn RestartSchedule>
                });
                Multistarter::new(worker, schedule)
            })
            .collect();
        ParallelMultistarter::from_drivers(drivers)
    }

    /// Builds a time-bounded coordinator.
    pub fn build_timed(self) -> Result<TimedParallelMultistarter<S, C, W>, MultistartError> {
        if self.time_unit.is_zero() {
            return Err(MultistartError::InvalidTimeUnit);
        }
        let time_unit = self.time_unit;
        let poll_interval = self.poll_interval;
        Ok(TimedParallelMultistarter::from_coordinator(
            self.build()?,
            time_unit,
            poll_interval,
        ))
    }
}
