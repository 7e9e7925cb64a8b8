//! Derived-state store.
//!
//! Holds exactly one canonical [`StatusSnapshot`] and the connectivity flag.
//! Every secondary view (mode, guard level, filtered tables, uptime) is
//! recomputed from that cell on each read; nothing derived is stored.
//!
//! The cell lives in a `tokio::sync::watch` channel. The sync controller owns
//! the only [`StoreWriter`]; any number of [`DashboardStore`] readers can be
//! cloned from it. A snapshot is swapped in as a whole `Arc`, so a reader
//! sees either the previous snapshot or the new one, never a mix.

use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

use crate::model::{
    AccountState, EngineMetrics, EngineMode, GridState, GuardLevel, Position, StatusSnapshot,
    SymbolSnapshot,
};

/// Engine mode as shown to the operator, with a sentinel for "no data".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayMode {
    Running,
    Paused,
    Frozen,
    Unknown,
}

impl DisplayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::Running => "RUNNING",
            DisplayMode::Paused => "PAUSED",
            DisplayMode::Frozen => "FROZEN",
            DisplayMode::Unknown => "UNKNOWN",
        }
    }
}

impl From<Option<EngineMode>> for DisplayMode {
    fn from(mode: Option<EngineMode>) -> Self {
        match mode {
            Some(EngineMode::Running) => DisplayMode::Running,
            Some(EngineMode::Paused) => DisplayMode::Paused,
            Some(EngineMode::Frozen) => DisplayMode::Frozen,
            None => DisplayMode::Unknown,
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contents of the store cell at one moment.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub snapshot: Option<Arc<StatusSnapshot>>,
    pub connected: bool,
    pub last_update: Option<DateTime<Utc>>,
}

impl DashboardState {
    pub fn mode(&self) -> DisplayMode {
        DisplayMode::from(self.snapshot.as_ref().and_then(|s| s.mode))
    }

    /// Falls back to GREEN before any data has arrived. This is a display
    /// default only and must not be used as a risk gate.
    pub fn guard_level(&self) -> GuardLevel {
        self.snapshot
            .as_ref()
            .and_then(|s| s.guard_level)
            .unwrap_or(GuardLevel::Green)
    }

    /// Confirmed positions; pending orders are left out.
    pub fn positions(&self) -> Vec<Position> {
        self.snapshot
            .as_ref()
            .map(|s| {
                s.snapshot
                    .positions
                    .iter()
                    .filter(|p| !p.pending)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Symbols with a live tick and a positive bid.
    pub fn symbols(&self) -> Vec<SymbolSnapshot> {
        self.snapshot
            .as_ref()
            .map(|s| {
                s.snapshot
                    .symbols
                    .iter()
                    .filter(|sym| sym.has_tick && sym.bid > 0.0)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn accounts(&self) -> Vec<AccountState> {
        self.snapshot
            .as_ref()
            .map(|s| s.snapshot.accounts.clone())
            .unwrap_or_default()
    }

    pub fn grids(&self) -> Vec<GridState> {
        self.snapshot
            .as_ref()
            .map(|s| s.grid_states.clone())
            .unwrap_or_default()
    }

    pub fn metrics(&self) -> Option<EngineMetrics> {
        self.snapshot.as_ref().and_then(|s| s.metrics.clone())
    }

    pub fn bridge_mode(&self) -> String {
        self.snapshot
            .as_ref()
            .and_then(|s| s.bridge_mode.clone())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "-".to_string())
    }

    /// Engine uptime relative to `now`, `"0s"` without a snapshot.
    pub fn uptime_at(&self, now: DateTime<Utc>) -> String {
        match &self.snapshot {
            Some(s) => format_uptime((now - s.started_at).num_seconds()),
            None => format_uptime(0),
        }
    }
}

/// Coarsest two non-zero units: `"1h 1m"`, `"2m 5s"`, `"7s"`.
pub fn format_uptime(total_secs: i64) -> String {
    let secs = total_secs.max(0);
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;

    if h > 0 {
        format!("{}h {}m", h, m)
    } else if m > 0 {
        format!("{}m {}s", m, s)
    } else {
        format!("{}s", s)
    }
}

/// Write side of the store. Held only by the sync controller.
#[derive(Debug)]
pub struct StoreWriter {
    tx: watch::Sender<DashboardState>,
}

impl StoreWriter {
    /// Swap in a new canonical snapshot; last write wins.
    pub fn replace_snapshot(&self, snapshot: StatusSnapshot) {
        let snapshot = Arc::new(snapshot);
        self.tx.send_modify(|state| {
            state.snapshot = Some(snapshot);
            state.last_update = Some(Utc::now());
        });
    }

    pub fn set_connected(&self, connected: bool) {
        self.tx.send_if_modified(|state| {
            if state.connected == connected {
                return false;
            }
            state.connected = connected;
            true
        });
    }

    pub fn reader(&self) -> DashboardStore {
        DashboardStore {
            rx: self.tx.subscribe(),
        }
    }
}

/// Read side of the store.
#[derive(Debug, Clone)]
pub struct DashboardStore {
    rx: watch::Receiver<DashboardState>,
}

impl DashboardStore {
    /// Fresh store: no snapshot, disconnected.
    pub fn new() -> (StoreWriter, DashboardStore) {
        let (tx, rx) = watch::channel(DashboardState::default());
        (StoreWriter { tx }, DashboardStore { rx })
    }

    /// Consistent copy of the cell for several reads against one snapshot.
    pub fn view(&self) -> DashboardState {
        self.rx.borrow().clone()
    }

    pub fn snapshot(&self) -> Option<Arc<StatusSnapshot>> {
        self.rx.borrow().snapshot.clone()
    }

    pub fn connected(&self) -> bool {
        self.rx.borrow().connected
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.rx.borrow().last_update
    }

    pub fn mode(&self) -> DisplayMode {
        self.rx.borrow().mode()
    }

    pub fn guard_level(&self) -> GuardLevel {
        self.rx.borrow().guard_level()
    }

    pub fn positions(&self) -> Vec<Position> {
        self.rx.borrow().positions()
    }

    pub fn symbols(&self) -> Vec<SymbolSnapshot> {
        self.rx.borrow().symbols()
    }

    pub fn accounts(&self) -> Vec<AccountState> {
        self.rx.borrow().accounts()
    }

    pub fn grids(&self) -> Vec<GridState> {
        self.rx.borrow().grids()
    }

    pub fn metrics(&self) -> Option<EngineMetrics> {
        self.rx.borrow().metrics()
    }

    pub fn bridge_mode(&self) -> String {
        self.rx.borrow().bridge_mode()
    }

    /// Re-derived from the wall clock on every call.
    pub fn uptime(&self) -> String {
        self.uptime_at(Utc::now())
    }

    pub fn uptime_at(&self, now: DateTime<Utc>) -> String {
        self.rx.borrow().uptime_at(now)
    }

    /// Wait for the next write. Returns `false` once the writer is gone.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}
