//! Loading state module
//!
//! A tagged union for the lifecycle of any asynchronous operation, plus a
//! single-value loader that drives it.
//!
//! # Overview
//!
//! - `LoadingState` - `Initial`, `Loading`, `Success(S)`, `Failure(F)`
//! - `AsyncLoader` - runs one future at a time and publishes its `LoadingState`

mod async_loader;
mod types;

pub use async_loader::{AsyncLoader, AsyncState};
pub use types::LoadingState;
