// Hayalet Dashboard Client Library
//
// Live monitoring and control client for the Hayalet trading engine: keeps a
// local copy of the engine status in sync over push + pull and relays operator
// commands back.

pub mod clients;
pub mod config;
pub mod dispatch;    // Operator command submission
pub mod display;     // Text views over the store
pub mod error;       // Unified error handling
pub mod i18n;
pub mod model;
pub mod progress;
pub mod store;       // Derived-state store
pub mod sync;        // Push/pull synchronization controller

// Re-export model types
pub use model::{
    AccountState, Command, CommandType, EngineMetrics, EngineMode, EngineSnapshot, GridState,
    GuardLevel, HealthStatus, Position, Side, StatusSnapshot, SymbolSnapshot,
};

// Re-export error types
pub use error::{DashboardError, DashboardResult, TransportError};

// Re-export transport types
pub use clients::{
    ChannelEvent, ChannelHandle, ChannelId, ChannelSink, HttpTransport, InboundEvent, Transport,
};

// Re-export configuration
pub use config::{ApiConfig, Config, ConfigError, DisplayConfig, LoggingConfig, SyncConfig};

// Re-export core components
pub use dispatch::{CollectingErrorSink, CommandDispatcher, CommandErrorSink, LogErrorSink};
pub use i18n::{translate, Locale};
pub use store::{DashboardState, DashboardStore, DisplayMode, StoreWriter};
pub use sync::{SyncController, SyncHandle};
