// Watch, status and health commands
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use hayalet_dashboard::display::render_dashboard;
use hayalet_dashboard::progress::Spinner;
use hayalet_dashboard::{
    Config, DashboardResult, DashboardState, DashboardStore, HttpTransport, SyncController, Transport,
};

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[H";

pub async fn watch(once: bool, config: &Config) -> DashboardResult<()> {
    let transport = Arc::new(HttpTransport::new(config)?);
    info!("📡 Engine: {} (push: {})", config.api.base_url, transport.push_url());

    let (controller, mut store) = SyncController::new(transport, config.sync.clone());
    let handle = controller.spawn();

    let spinner = Spinner::new("Waiting for the first engine snapshot...");
    let got_snapshot = tokio::select! {
        ready = wait_for_snapshot(&mut store) => ready,
        _ = tokio::signal::ctrl_c() => false,
    };

    if !got_snapshot {
        spinner.finish_with_error("Stopped before any snapshot arrived");
        handle.shutdown().await;
        return Ok(());
    }
    spinner.clear();

    if once {
        print!("{}", render_dashboard(&store.view(), config.display.locale, Utc::now()));
        handle.shutdown().await;
        return Ok(());
    }

    let mut refresh = tokio::time::interval(Duration::from_millis(config.display.refresh_ms));
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("🛑 Ctrl-C received, disconnecting...");
                break;
            }
            changed = store.changed() => {
                if !changed {
                    warn!("⚠️  Sync loop ended unexpectedly");
                    break;
                }
                redraw(&store, config);
            }
            _ = refresh.tick() => redraw(&store, config),
        }
    }

    handle.shutdown().await;
    info!("👋 Dashboard closed");
    Ok(())
}

pub async fn status(json: bool, config: &Config) -> DashboardResult<()> {
    let transport = HttpTransport::new(config)?;

    let spinner = if json {
        Spinner::hidden()
    } else {
        Spinner::new("Fetching engine status...")
    };

    let snapshot = match transport.fetch_status().await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            spinner.finish_with_error("Status request failed");
            return Err(e.into());
        }
    };
    spinner.clear();

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let view = DashboardState {
        snapshot: Some(Arc::new(snapshot)),
        connected: false,
        last_update: Some(Utc::now()),
    };
    print!("{}", render_dashboard(&view, config.display.locale, Utc::now()));
    Ok(())
}

pub async fn health(config: &Config) -> DashboardResult<()> {
    let transport = HttpTransport::new(config)?;
    let health = transport.fetch_health().await?;

    if health.is_ok() {
        info!("✅ Engine healthy ({})", health.status);
    } else {
        warn!("⚠️  Engine reports status: {}", health.status);
    }
    Ok(())
}

async fn wait_for_snapshot(store: &mut DashboardStore) -> bool {
    while store.snapshot().is_none() {
        if !store.changed().await {
            return false;
        }
    }
    true
}

fn redraw(store: &DashboardStore, config: &Config) {
    print!(
        "{}{}",
        CLEAR_SCREEN,
        render_dashboard(&store.view(), config.display.locale, Utc::now())
    );
}
