//! Status snapshot published by the trading engine.
//!
//! A [`StatusSnapshot`] is the complete state of the engine at one instant.
//! It arrives either as the body of `GET /api/status` or as the `data` of a
//! `"status"` push frame and is always replaced wholesale, never patched.
//!
//! Decoding is forgiving about the parts the engine may leave
//! empty: `null` sequences read as empty and unrecognised enum strings read
//! as absent, so one odd field never discards an otherwise good snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Trading direction of a position or grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(Side::Buy),
            "SELL" => Ok(Side::Sell),
            other => Err(format!("unknown side '{}'", other)),
        }
    }
}

/// Engine lifecycle mode as reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EngineMode {
    Running,
    Paused,
    Frozen,
}

impl EngineMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineMode::Running => "RUNNING",
            EngineMode::Paused => "PAUSED",
            EngineMode::Frozen => "FROZEN",
        }
    }
}

impl fmt::Display for EngineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EngineMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RUNNING" => Ok(EngineMode::Running),
            "PAUSED" => Ok(EngineMode::Paused),
            "FROZEN" => Ok(EngineMode::Frozen),
            other => Err(format!("unknown engine mode '{}'", other)),
        }
    }
}

/// Balance guard severity, ordered from least to most severe.
///
/// The derived `Ord` follows declaration order, so `GuardLevel::Red >
/// GuardLevel::Yellow` holds and threshold checks can compare directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GuardLevel {
    Green,
    Yellow,
    Orange,
    Red,
    Black,
}

impl GuardLevel {
    pub const ALL: [GuardLevel; 5] = [
        GuardLevel::Green,
        GuardLevel::Yellow,
        GuardLevel::Orange,
        GuardLevel::Red,
        GuardLevel::Black,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GuardLevel::Green => "GREEN",
            GuardLevel::Yellow => "YELLOW",
            GuardLevel::Orange => "ORANGE",
            GuardLevel::Red => "RED",
            GuardLevel::Black => "BLACK",
        }
    }

    /// 0 for GREEN up to 4 for BLACK.
    pub fn severity(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for GuardLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GuardLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GuardLevel::ALL
            .iter()
            .find(|level| level.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown guard level '{}'", s))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SymbolSnapshot {
    pub symbol: String,
    pub bid: f64,
    pub ask: f64,
    pub time: Option<DateTime<Utc>>,
    pub position_count: u32,
    pub has_tick: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountState {
    pub account_id: String,
    pub balance: f64,
    pub equity: f64,
    pub margin: f64,
    pub free_margin: f64,
    pub margin_level: f64,
    pub peak_equity: f64,
    pub drawdown_pct: f64,
    #[serde(deserialize_with = "lenient_enum")]
    pub guard_level: Option<GuardLevel>,
    pub time: Option<DateTime<Utc>>,
}

/// An open position, or a pending order when `pending` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: i64,
    pub symbol: String,
    pub side: Side,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub open_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub magic: i64,
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub pending: bool,
    #[serde(default)]
    pub profit_loss: f64,
    #[serde(default)]
    pub swap: f64,
    #[serde(default)]
    pub comment: String,
}

/// Grid strategy state for one (symbol, account) pair.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridState {
    pub symbol: String,
    pub account_id: String,
    pub active: bool,
    /// Absent when the grid trades both directions.
    #[serde(deserialize_with = "lenient_enum")]
    pub direction: Option<Side>,
    pub anchor_price: f64,
    pub current_level: i32,
    pub max_level: i32,
    pub total_lots: f64,
    pub floating_pl: f64,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineMetrics {
    pub tick_count: u64,
    pub position_count: u64,
    pub command_count: u64,
    pub signal_count: u64,
    pub active_accounts: u32,
    pub last_tick_at: Option<DateTime<Utc>>,
    pub last_command_at: Option<DateTime<Utc>>,
    pub last_signal_at: Option<DateTime<Utc>>,
}

/// Market-side part of the status: symbols, accounts and positions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineSnapshot {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub symbols: Vec<SymbolSnapshot>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub accounts: Vec<AccountState>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub positions: Vec<Position>,
}

/// Complete engine status at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub time: DateTime<Utc>,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub bridge_mode: Option<String>,
    #[serde(default, deserialize_with = "lenient_enum")]
    pub mode: Option<EngineMode>,
    #[serde(default, deserialize_with = "lenient_enum")]
    pub guard_level: Option<GuardLevel>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub snapshot: EngineSnapshot,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub grid_states: Vec<GridState>,
    #[serde(default)]
    pub metrics: Option<EngineMetrics>,
    #[serde(default)]
    pub symbol_count: usize,
    #[serde(default)]
    pub account_count: usize,
    #[serde(default)]
    pub position_count: usize,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub last_signals: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub last_commands: Vec<Value>,
    #[serde(default)]
    pub latest_tick_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub latest_symbol: Option<String>,
    #[serde(default)]
    pub config: Option<Value>,
}

impl StatusSnapshot {
    /// Decode a snapshot from an already-parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

/// Body of `GET /api/health`, unwrapped from the response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// Unknown or empty strings become `None` instead of failing the document.
fn lenient_enum<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}
