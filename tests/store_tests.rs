// Integration tests for the derived-state store

mod common;

use chrono::{DateTime, Duration, Utc};
use common::{busy_status_json, status_snapshot};
use hayalet_dashboard::display::{render_dashboard, spread_points, DrawdownTier};
use hayalet_dashboard::{DashboardStore, DisplayMode, GuardLevel, Locale, StatusSnapshot};

fn busy_snapshot() -> StatusSnapshot {
    StatusSnapshot::from_value(busy_status_json()).expect("busy status decodes")
}

#[test]
fn test_positions_exclude_pending_orders() {
    let (writer, store) = DashboardStore::new();
    writer.replace_snapshot(busy_snapshot());

    let positions = store.positions();
    assert_eq!(positions.len(), 1);
    assert_eq!(positions[0].id, 101);
    assert!(!positions[0].pending);
}

#[test]
fn test_symbols_require_tick_and_positive_bid() {
    let (writer, store) = DashboardStore::new();
    writer.replace_snapshot(busy_snapshot());

    let symbols = store.symbols();
    assert_eq!(symbols.len(), 1);
    assert_eq!(symbols[0].symbol, "EURUSD");
    assert!((spread_points(&symbols[0]) - 12.0).abs() < 1e-6);
}

#[test]
fn test_null_grids_and_missing_sections_read_empty() {
    let (writer, store) = DashboardStore::new();
    writer.replace_snapshot(busy_snapshot());
    assert!(store.grids().is_empty());

    let accounts = store.accounts();
    assert_eq!(accounts.len(), 1);
    assert_eq!(DrawdownTier::from_pct(accounts[0].drawdown_pct), DrawdownTier::Yellow);

    let metrics = store.metrics().expect("metrics present");
    assert_eq!(metrics.tick_count, 420);
}

#[test]
fn test_replacement_is_wholesale() {
    let (writer, store) = DashboardStore::new();
    writer.replace_snapshot(busy_snapshot());
    assert_eq!(store.positions().len(), 1);
    assert_eq!(store.mode(), DisplayMode::Paused);

    writer.replace_snapshot(status_snapshot("RUNNING", "GREEN"));
    assert!(store.positions().is_empty());
    assert!(store.symbols().is_empty());
    assert!(store.metrics().is_none());
    assert_eq!(store.mode(), DisplayMode::Running);
}

#[test]
fn test_unknown_guard_level_reads_as_green() {
    let (writer, store) = DashboardStore::new();
    writer.replace_snapshot(status_snapshot("RUNNING", "PURPLE"));
    assert_eq!(store.guard_level(), GuardLevel::Green);
}

#[test]
fn test_view_is_consistent_across_later_writes() {
    let (writer, store) = DashboardStore::new();
    writer.replace_snapshot(busy_snapshot());
    let view = store.view();

    writer.replace_snapshot(status_snapshot("RUNNING", "RED"));
    writer.set_connected(true);

    assert_eq!(view.mode(), DisplayMode::Paused);
    assert_eq!(view.guard_level(), GuardLevel::Orange);
    assert!(!view.connected);
    assert_eq!(store.guard_level(), GuardLevel::Red);
}

#[test]
fn test_uptime_tracks_started_at() {
    let (writer, store) = DashboardStore::new();
    writer.replace_snapshot(busy_snapshot());

    let started: DateTime<Utc> = "2026-01-05T08:58:59Z".parse().unwrap();
    assert_eq!(store.uptime_at(started + Duration::seconds(3661)), "1h 1m");
    assert_eq!(store.uptime_at(started + Duration::seconds(125)), "2m 5s");
    assert_eq!(store.uptime_at(started - Duration::seconds(5)), "0s");
}

#[test]
fn test_dashboard_render_uses_locale() {
    let (writer, store) = DashboardStore::new();
    writer.replace_snapshot(busy_snapshot());
    writer.set_connected(true);
    let now = Utc::now();

    let english = render_dashboard(&store.view(), Locale::En, now);
    assert!(english.contains("PAUSED"));
    assert!(english.contains("Connected"));
    assert!(english.contains("[Resume]"));
    assert!(english.contains("+12.50"));
    assert!(english.contains("No grids"));

    let turkish = render_dashboard(&store.view(), Locale::Tr, now);
    assert!(turkish.contains("Bağlı"));
    assert!(turkish.contains("[Devam]"));
}
