//! Polling process state machine

use super::types::{CancelHandle, PollOperation, Scheduler};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, trace};

#[derive(Debug, Default)]
struct ProcessState {
    running: bool,
    /// Bumped on every start/stop; callbacks from older generations are ignored
    generation: u64,
    last_unit: u64,
    last_completed: u64,
    units_started: u64,
    timer: Option<CancelHandle>,
    in_flight: Option<(u64, CancelHandle)>,
}

struct ProcessInner {
    operation: Box<dyn PollOperation>,
    scheduler: Box<dyn Scheduler>,
    interval: Duration,
    state: Mutex<ProcessState>,
}

impl ProcessInner {
    fn is_current(state: &ProcessState, generation: u64) -> bool {
        state.running && state.generation == generation
    }

    fn schedule_next(self: &Arc<Self>, generation: u64) {
        let inner = Arc::clone(self);
        let timer = self.scheduler.schedule_after(
            self.interval,
            Box::new(move || inner.run_unit(generation)),
        );

        let mut state = self.state.lock();
        if Self::is_current(&state, generation) {
            state.timer = Some(timer);
        } else {
            drop(state);
            timer.cancel();
        }
    }

    fn run_unit(self: &Arc<Self>, generation: u64) {
        let unit = {
            let mut state = self.state.lock();
            if !Self::is_current(&state, generation) {
                return;
            }
            state.timer = None;
            state.last_unit += 1;
            state.units_started += 1;
            state.last_unit
        };
        trace!(generation, unit, "Running poll unit");

        let completion = Completion {
            process: Arc::clone(self),
            generation,
            unit,
        };
        let cancel = self.operation.perform_one(completion);

        let mut state = self.state.lock();
        if Self::is_current(&state, generation) {
            // A unit that completed synchronously has nothing left to cancel.
            if state.last_completed < unit {
                state.in_flight = Some((unit, cancel));
            }
        } else {
            drop(state);
            cancel.cancel();
        }
    }

    fn unit_finished(self: &Arc<Self>, generation: u64, unit: u64) {
        {
            let mut state = self.state.lock();
            if !Self::is_current(&state, generation) {
                trace!(generation, unit, "Ignoring completion from stopped poll");
                return;
            }
            state.last_completed = state.last_completed.max(unit);
            if state.in_flight.as_ref().is_some_and(|(id, _)| *id == unit) {
                state.in_flight = None;
            }
        }
        self.schedule_next(generation);
    }
}

/// Completion token handed to each poll unit
///
/// Calling [`Completion::complete`] schedules the next unit, provided the
/// process is still running the generation that started this unit.
pub struct Completion {
    process: Arc<ProcessInner>,
    generation: u64,
    unit: u64,
}

impl Completion {
    /// Report the unit as done
    pub fn complete(self) {
        self.process.unit_finished(self.generation, self.unit);
    }
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completion")
            .field("generation", &self.generation)
            .field("unit", &self.unit)
            .finish()
    }
}

/// Recurring operation driven at a fixed interval
///
/// Only one unit runs at a time: the next one is scheduled after the current
/// one completes. Dropping the process stops it.
pub struct PollingProcess {
    inner: Arc<ProcessInner>,
}

impl PollingProcess {
    /// Create an idle process
    pub fn new(
        operation: impl PollOperation,
        scheduler: impl Scheduler,
        interval: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(ProcessInner {
                operation: Box::new(operation),
                scheduler: Box::new(scheduler),
                interval,
                state: Mutex::new(ProcessState::default()),
            }),
        }
    }

    /// Transition `Idle -> Running`; no-op when already running
    pub fn start(&self, immediately: bool) {
        let generation = {
            let mut state = self.inner.state.lock();
            if state.running {
                debug!("Poll already running");
                return;
            }
            state.running = true;
            state.generation += 1;
            state.generation
        };
        info!(
            interval_ms = self.inner.interval.as_millis() as u64,
            immediately, "Polling started"
        );

        if immediately {
            self.inner.run_unit(generation);
        } else {
            self.inner.schedule_next(generation);
        }
    }

    /// Transition `Running -> Idle`, cancelling the pending timer and any in-flight unit
    pub fn stop(&self) {
        let (timer, in_flight) = {
            let mut state = self.inner.state.lock();
            if !state.running {
                return;
            }
            state.running = false;
            state.generation += 1;
            (state.timer.take(), state.in_flight.take())
        };

        if let Some(timer) = timer {
            timer.cancel();
        }
        if let Some((unit, cancel)) = in_flight {
            debug!(unit, "Cancelling in-flight poll unit");
            cancel.cancel();
        }
        info!("Polling stopped");
    }

    /// Check if the process is running
    pub fn is_running(&self) -> bool {
        self.inner.state.lock().running
    }

    /// Number of units started over the lifetime of the process
    pub fn units_started(&self) -> u64 {
        self.inner.state.lock().units_started
    }

    /// Configured interval
    pub fn interval(&self) -> Duration {
        self.inner.interval
    }
}

impl Drop for PollingProcess {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for PollingProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollingProcess")
            .field("interval", &self.inner.interval)
            .field("running", &self.is_running())
            .finish()
    }
}
