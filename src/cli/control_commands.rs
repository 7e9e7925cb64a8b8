// Operator command implementations
use std::sync::Arc;

use tracing::{info, warn};

use hayalet_dashboard::{
    Command, CommandDispatcher, CommandType, Config, DashboardError, DashboardResult, HttpTransport,
    CollectingErrorSink, Side,
};

// Failures come back as the returned error, which main reports once.
fn dispatcher(config: &Config) -> DashboardResult<CommandDispatcher<HttpTransport>> {
    let transport = Arc::new(HttpTransport::new(config)?);
    Ok(CommandDispatcher::with_sink(transport, Arc::new(CollectingErrorSink::new()))
        .log_commands(config.logging.log_commands))
}

async fn submit(command: Command, confirmed: bool, config: &Config) -> DashboardResult<()> {
    let kind = command.command_type();
    dispatcher(config)?.dispatch_confirmed(command, confirmed).await?;

    info!("✅ {} accepted by the engine", kind);
    info!("💡 The next status update shows whether it took effect");
    Ok(())
}

pub async fn send_lifecycle(kind: CommandType, confirmed: bool, config: &Config) -> DashboardResult<()> {
    let command = Command::lifecycle(kind)
        .ok_or_else(|| DashboardError::Internal(format!("{} is not a lifecycle command", kind)))?;

    if command.requires_confirmation() && !confirmed {
        warn!("⚠️  {} closes every open position", kind);
    }

    submit(command, confirmed, config).await
}

#[allow(clippy::too_many_arguments)]
pub async fn open_order(
    symbol: String,
    side: &str,
    volume: f64,
    price: Option<f64>,
    tp: Option<f64>,
    sl: Option<f64>,
    magic: Option<i64>,
    account: Option<String>,
    config: &Config,
) -> DashboardResult<()> {
    let side: Side = side.parse()?;
    if volume <= 0.0 {
        return Err(DashboardError::Internal(format!("volume must be positive, got {}", volume)));
    }

    let command = Command::Open {
        symbol,
        side,
        volume,
        price,
        tp,
        sl,
        magic,
        account_id: account,
        reason: Some("manual".to_string()),
    };
    submit(command, true, config).await
}

pub async fn close_order(ticket: i64, account: Option<String>, config: &Config) -> DashboardResult<()> {
    let command = Command::Close {
        ticket,
        account_id: account,
        reason: Some("manual".to_string()),
    };
    submit(command, true, config).await
}

pub async fn modify_order(
    ticket: i64,
    tp: Option<f64>,
    sl: Option<f64>,
    account: Option<String>,
    config: &Config,
) -> DashboardResult<()> {
    if tp.is_none() && sl.is_none() {
        return Err(DashboardError::Internal("modify needs --tp and/or --sl".to_string()));
    }

    let command = Command::Modify {
        ticket,
        tp,
        sl,
        account_id: account,
    };
    submit(command, true, config).await
}
