//! Upload-notification fan-out.
//!
//! Turns a batch of storage upload notifications into independent worker
//! task launches, one per record, with per-record failure isolation.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod launcher;

pub use config::DispatcherConfig;
pub use dispatch::{Dispatcher, RecordOutcome};
pub use error::{DispatchError, DispatchResult};
pub use launcher::{EcsLauncher, TaskLauncher};
