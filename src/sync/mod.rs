//! Synchronization controller: push channel with fixed-delay reconnect plus
//! a pull fallback that only runs while the channel is down.

pub mod controller;
pub mod machine;
pub mod timer;

pub use controller::{SyncController, SyncHandle};
pub use machine::{Effect, LinkState, SyncMachine};
pub use timer::ScheduledTask;
