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


//! # Lane Pool
//!
//! One dedicated OS thread ("lane") per worker. Each lane owns the restart
//! driver of its worker for the lifetime of the pool, so the worker is only
//! ever touched by that thread. The coordinator talks to the lanes by sending
//! boxed tasks over a `crossbeam_channel`; every task replies on a per-call
//! channel with its lane index.
//!
//! Panics inside a task are caught on the lane and reported as a message,
//! leaving the lane alive for the next call. `close()` drops the task senders
//! and joins every lane; it is idempotent and also runs on drop.

use crate::error::MultistartError;
use crossbeam_channel::{Receiver, Sender};
use flotilla_core::num::Cost;
use flotilla_search::{multistart::Multistarter, worker::SearchWorker};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread::JoinHandle;

type Task<S, C, W> = Box<dyn FnOnce(&mut Multistarter<S, C, W>) + Send>;

/// A lane's reply: its index and either the task's value or a panic message.
type Reply<T> = (usize, Result<T, String>);

struct Lane<S, C, W> {
    tasks: Option<Sender<Task<S, C, W>>>,
    handle: Option<JoinHandle<()>>,
}

/// Replies of a submitted task that have not been collected yet.
#[must_use]
pub(crate) struct Pending<T> {
    replies: Receiver<Reply<T>>,
    lanes: usize,
}

impl<T> Pending<T> {
    /// Blocks until every lane has replied. Replies are ordered by lane index.
    pub(crate) fn wait(self) -> Result<Vec<Result<T, String>>, MultistartError> {
        let mut slots: Vec<Option<Result<T, String>>> = (0..self.lanes).map(|_| None).collect();

        // Every task drops its reply sender once it ran, so the iterator ends
        // when all lanes are done (or gone).
        for (index, outcome) in self.replies.iter() {
            if let Some(slot) = slots.get_mut(index) {
                *slot = Some(outcome);
            }
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| slot.ok_or(MultistartError::LaneDisconnected { index }))
            .collect()
    }
}

/// A fixed set of persistent lane threads, one per restart driver.
pub(crate) struct WorkerPool<S, C, W> {
    lanes: Vec<Lane<S, C, W>>,
    worker_names: Vec<String>,
    closed: bool,
}

impl<S, C, W> WorkerPool<S, C, W>
where
    S: Clone + Send + 'static,
    C: Cost,
    W: SearchWorker<S, C> + 'static,
{
    /// Spawns one lane per driver.
    ///
    /// If a spawn fails the lanes started so far are shut down before the
    /// error is returned.
    pub(crate) fn spawn(drivers: Vec<Multistarter<S, C, W>>) -> Result<Self, MultistartError> {
        let mut pool = Self {
            lanes: Vec::with_capacity(drivers.len()),
            worker_names: drivers.iter().map(|d| d.worker().name().to_owned()).collect(),
            closed: false,
        };

        for (index, mut driver) in drivers.into_iter().enumerate() {
            let (tasks, inbox) = crossbeam_channel::unbounded::<Task<S, C, W>>();
            let handle = std::thread::Builder::new()
                .name(format!("flotilla-lane-{index}"))
                .spawn(move || {
                    for task in inbox {
                        task(&mut driver);
                    }
                })
                .map_err(MultistartError::ThreadSpawn)?;

            pool.lanes.push(Lane {
                tasks: Some(tasks),
                handle: Some(handle),
            });
        }

        tracing::debug!(lanes = pool.lanes.len(), "lane pool started");
        Ok(pool)
    }

    /// Sends a copy of `job` to every lane without waiting for the replies.
    pub(crate) fn submit<T, F>(&self, job: F) -> Result<Pending<T>, MultistartError>
    where
        T: Send + 'static,
        F: Fn(&mut Multistarter<S, C, W>) -> T + Clone + Send + 'static,
    {
        if self.closed {
            return Err(MultistartError::Closed);
        }

        let (reply_to, replies) = crossbeam_channel::unbounded::<Reply<T>>();
        for (index, lane) in self.lanes.iter().enumerate() {
            let sender = lane.tasks.as_ref().ok_or(MultistartError::Closed)?;
            let job = job.clone();
            let reply_to = reply_to.clone();
            let task: Task<S, C, W> = Box::new(move |driver: &mut Multistarter<S, C, W>| {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| job(driver))).map_err(panic_message);
                // The caller may have given up on this call already.
                let _ = reply_to.send((index, outcome));
            });
            sender
                .send(task)
                .map_err(|_| MultistartError::LaneDisconnected { index })?;
        }

        Ok(Pending {
            replies,
            lanes: self.lanes.len(),
        })
    }

    /// Runs `job` on every lane and waits for all replies.
    pub(crate) fn dispatch<T, F>(&self, job: F) -> Result<Vec<Result<T, String>>, MultistartError>
    where
        T: Send + 'static,
        F: Fn(&mut Multistarter<S, C, W>) -> T + Clone + Send + 'static,
    {
        self.submit(job)?.wait()
    }
}

impl<S, C, W> WorkerPool<S, C, W> {
    /// Returns the number of lanes.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.lanes.len()
    }

    /// Returns the worker names in lane order.
    #[inline]
    pub(crate) fn worker_names(&self) -> &[String] {
        &self.worker_names
    }

    #[inline]
    pub(crate) fn is_closed(&self) -> bool {
        self.closed
    }

    /// Stops accepting tasks and joins every lane. Pending tasks run first.
    pub(crate) fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        for lane in &mut self.lanes {
            lane.tasks.take();
        }
        for (index, lane) in self.lanes.iter_mut().enumerate() {
            let Some(handle) = lane.handle.take() else {
                continue;
            };
            if handle.join().is_err() {
                tracing::warn!(lane = index, "lane thread panicked during shutdown");
            }
        }
        tracing::debug!(lanes = self.lanes.len(), "lane pool closed");
    }
}

impl<S, C, W> Drop for WorkerPool<S, C, W> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with a non-string payload".to_owned()
    }
}
