//! Polling module
//!
//! Drives a recurring unit of work at a fixed interval until stopped.
//!
//! # Overview
//!
//! - `PollingProcess` - `Idle <-> Running` state machine scheduling one unit at a time
//! - `PollOperation` - the unit of work, reporting back through a `Completion`
//! - `Scheduler` - timer primitive; `TokioScheduler` is the runtime-backed one
//! - `AsyncOperation` - adapter running an async closure as a poll unit

mod operation;
mod process;
mod scheduler;
mod types;

pub use operation::AsyncOperation;
pub use process::{Completion, PollingProcess};
pub use scheduler::TokioScheduler;
pub use types::{CancelHandle, PollOperation, PollingConfig, Scheduler};
