//! Text views of the dashboard state.
//!
//! Everything here reads a [`DashboardState`] and produces strings. Nothing
//! flows back into the store or the sync loop.

use chrono::{DateTime, Utc};
use std::fmt::Write as _;

use crate::i18n::{translate, Locale};
use crate::model::{AccountState, Command, GridState, GuardLevel, Position, Side, SymbolSnapshot};
use crate::store::{DashboardState, DisplayMode};

/// Operator control exposed in the control panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Pause,
    Resume,
    HedgeAll,
    CloseAll,
    Freeze,
}

impl Action {
    pub fn command(&self) -> Command {
        match self {
            Action::Pause => Command::Pause,
            Action::Resume => Command::Resume,
            Action::HedgeAll => Command::HedgeAll,
            Action::CloseAll => Command::CloseAll,
            Action::Freeze => Command::Freeze,
        }
    }

    pub fn label_key(&self) -> &'static str {
        match self {
            Action::Pause => "controls.pause",
            Action::Resume => "controls.resume",
            Action::HedgeAll => "controls.hedgeAll",
            Action::CloseAll => "controls.closeAll",
            Action::Freeze => "controls.freeze",
        }
    }

    pub fn requires_confirmation(&self) -> bool {
        self.command().requires_confirmation()
    }
}

/// Pause while running, Resume in any other mode, then the fixed controls.
pub fn available_actions(mode: DisplayMode) -> Vec<Action> {
    let toggle = if mode == DisplayMode::Running {
        Action::Pause
    } else {
        Action::Resume
    };
    vec![toggle, Action::HedgeAll, Action::CloseAll, Action::Freeze]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DrawdownTier {
    Green,
    Yellow,
    Orange,
    Red,
}

impl DrawdownTier {
    pub fn from_pct(drawdown_pct: f64) -> Self {
        if drawdown_pct >= 30.0 {
            DrawdownTier::Red
        } else if drawdown_pct >= 20.0 {
            DrawdownTier::Orange
        } else if drawdown_pct >= 10.0 {
            DrawdownTier::Yellow
        } else {
            DrawdownTier::Green
        }
    }

    pub fn indicator(&self) -> &'static str {
        match self {
            DrawdownTier::Green => "🟢",
            DrawdownTier::Yellow => "🟡",
            DrawdownTier::Orange => "🟠",
            DrawdownTier::Red => "🔴",
        }
    }
}

pub fn guard_indicator(level: GuardLevel) -> &'static str {
    match level {
        GuardLevel::Green => "🟢",
        GuardLevel::Yellow => "🟡",
        GuardLevel::Orange => "🟠",
        GuardLevel::Red => "🔴",
        GuardLevel::Black => "⚫",
    }
}

pub fn mode_indicator(mode: DisplayMode) -> &'static str {
    match mode {
        DisplayMode::Running => "▶️",
        DisplayMode::Paused => "⏸️",
        DisplayMode::Frozen => "🧊",
        DisplayMode::Unknown => "❔",
    }
}

/// Spread in points, 5-digit pricing.
pub fn spread_points(symbol: &SymbolSnapshot) -> f64 {
    (symbol.ask - symbol.bid) * 100_000.0
}

pub fn direction_label(direction: Option<Side>) -> &'static str {
    match direction {
        Some(side) => side.as_str(),
        None => "BOTH",
    }
}

/// `+12.50` / `-3.10`, zero counts as a gain.
pub fn format_pl(value: f64) -> String {
    if value >= 0.0 {
        format!("+{:.2}", value)
    } else {
        format!("{:.2}", value)
    }
}

pub fn render_status_bar(state: &DashboardState, locale: Locale, now: DateTime<Utc>) -> String {
    let mode = state.mode();
    let guard = state.guard_level();
    let link = if state.connected {
        format!("🟢 {}", translate(locale, "overview.connected"))
    } else {
        format!("🔴 {}", translate(locale, "overview.disconnected"))
    };

    format!(
        "{} {}: {} | {} {}: {} | {}: {} | {}: {} | {}",
        mode_indicator(mode),
        translate(locale, "overview.mode"),
        mode,
        guard_indicator(guard),
        translate(locale, "overview.guard"),
        guard,
        translate(locale, "overview.bridge"),
        state.bridge_mode(),
        translate(locale, "overview.uptime"),
        state.uptime_at(now),
        link
    )
}

/// Card for the first account only.
pub fn render_account_card(accounts: &[AccountState], locale: Locale) -> String {
    let mut out = format!("💰 {}\n", translate(locale, "account.title"));
    let Some(account) = accounts.first() else {
        out.push_str(&format!("   {}\n", translate(locale, "account.none")));
        return out;
    };

    let tier = DrawdownTier::from_pct(account.drawdown_pct);
    let _ = writeln!(out, "   {}", account.account_id);
    let _ = writeln!(out, "   {}: {:.2}", translate(locale, "account.balance"), account.balance);
    let _ = writeln!(out, "   {}: {:.2}", translate(locale, "account.equity"), account.equity);
    let _ = writeln!(out, "   {}: {:.2}", translate(locale, "account.margin"), account.margin);
    let _ = writeln!(
        out,
        "   {}: {} {:.1}%",
        translate(locale, "account.drawdown"),
        tier.indicator(),
        account.drawdown_pct
    );
    out
}

pub fn render_metrics_card(state: &DashboardState, locale: Locale) -> String {
    let metrics = state.metrics().unwrap_or_default();
    let mut out = format!("📊 {}\n", translate(locale, "metrics.title"));
    let _ = writeln!(out, "   {}: {}", translate(locale, "metrics.ticks"), metrics.tick_count);
    let _ = writeln!(out, "   {}: {}", translate(locale, "metrics.positions"), metrics.position_count);
    let _ = writeln!(out, "   {}: {}", translate(locale, "metrics.commands"), metrics.command_count);
    let _ = writeln!(out, "   {}: {}", translate(locale, "metrics.signals"), metrics.signal_count);
    out
}

pub fn render_positions(positions: &[Position], locale: Locale) -> String {
    let mut out = format!("📋 {} ({})\n", translate(locale, "positions.title"), positions.len());
    if positions.is_empty() {
        let _ = writeln!(out, "   {}", translate(locale, "positions.empty"));
        return out;
    }

    let _ = writeln!(
        out,
        "   {:<10} {:<10} {:<5} {:>8} {:>12} {:>10}",
        "TICKET", "SYMBOL", "SIDE", "VOLUME", "PRICE", "P/L"
    );
    for position in positions {
        let _ = writeln!(
            out,
            "   {:<10} {:<10} {:<5} {:>8.2} {:>12.5} {:>10}",
            position.id,
            position.symbol,
            position.side.as_str(),
            position.volume,
            position.price,
            format_pl(position.profit_loss)
        );
    }
    out
}

pub fn render_symbols(symbols: &[SymbolSnapshot], locale: Locale) -> String {
    let mut out = format!("💱 {}\n", translate(locale, "symbols.title"));
    if symbols.is_empty() {
        let _ = writeln!(out, "   {}", translate(locale, "symbols.empty"));
        return out;
    }

    let _ = writeln!(out, "   {:<10} {:>12} {:>12} {:>8}", "SYMBOL", "BID", "ASK", "SPREAD");
    for symbol in symbols {
        let _ = writeln!(
            out,
            "   {:<10} {:>12.5} {:>12.5} {:>8.1}",
            symbol.symbol,
            symbol.bid,
            symbol.ask,
            spread_points(symbol)
        );
    }
    out
}

pub fn render_grids(grids: &[GridState], locale: Locale) -> String {
    let mut out = format!("🕸️ {}\n", translate(locale, "grids.title"));
    if grids.is_empty() {
        let _ = writeln!(out, "   {}", translate(locale, "grids.empty"));
        return out;
    }

    let _ = writeln!(
        out,
        "   {:<10} {:<12} {:<4} {:<5} {:>12} {:>7} {:>8} {:>10}",
        "SYMBOL", "ACCOUNT", "ON", "DIR", "ANCHOR", "LEVEL", "LOTS", "P/L"
    );
    for grid in grids {
        let anchor = if grid.anchor_price > 0.0 {
            format!("{:.5}", grid.anchor_price)
        } else {
            "-".to_string()
        };
        let _ = writeln!(
            out,
            "   {:<10} {:<12} {:<4} {:<5} {:>12} {:>7} {:>8.2} {:>10}",
            grid.symbol,
            grid.account_id,
            if grid.active { "ON" } else { "OFF" },
            direction_label(grid.direction),
            anchor,
            format!("{}/{}", grid.current_level, grid.max_level),
            grid.total_lots,
            format_pl(grid.floating_pl)
        );
    }
    out
}

pub fn render_controls(mode: DisplayMode, locale: Locale) -> String {
    let labels: Vec<String> = available_actions(mode)
        .iter()
        .map(|action| {
            let label = translate(locale, action.label_key());
            if action.requires_confirmation() {
                format!("[{} ⚠️]", label)
            } else {
                format!("[{}]", label)
            }
        })
        .collect();
    format!("🎛️ {}\n", labels.join(" "))
}

/// Full dashboard: status bar, controls, cards and tables.
pub fn render_dashboard(state: &DashboardState, locale: Locale, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", render_status_bar(state, locale, now));
    out.push_str(&render_controls(state.mode(), locale));
    out.push('\n');
    out.push_str(&render_account_card(&state.accounts(), locale));
    out.push_str(&render_metrics_card(state, locale));
    out.push('\n');
    out.push_str(&render_positions(&state.positions(), locale));
    out.push('\n');
    out.push_str(&render_symbols(&state.symbols(), locale));
    out.push('\n');
    out.push_str(&render_grids(&state.grids(), locale));
    out
}
