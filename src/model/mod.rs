// Wire data shapes shared by the transport, sync loop and store

pub mod command;
pub mod snapshot;

pub use command::{Command, CommandType};
pub use snapshot::{
    AccountState, EngineMetrics, EngineMode, EngineSnapshot, GridState, GuardLevel, HealthStatus,
    Position, Side, StatusSnapshot, SymbolSnapshot,
};
