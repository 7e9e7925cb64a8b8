// Common test utilities and helpers
#![allow(dead_code)]

use async_trait::async_trait;
use hayalet_dashboard::{
    ChannelHandle, ChannelSink, Command, HealthStatus, StatusSnapshot, Transport, TransportError,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::oneshot;

/// Scripted transport that records every call.
pub struct MockTransport {
    status: Mutex<Result<StatusSnapshot, TransportError>>,
    send_result: Mutex<Result<(), TransportError>>,
    fetches: AtomicUsize,
    sinks: Mutex<Vec<ChannelSink>>,
    close_signals: Mutex<Vec<oneshot::Receiver<()>>>,
    sent: Mutex<Vec<Command>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::with_status(Ok(status_snapshot("RUNNING", "GREEN")))
    }

    pub fn with_status(status: Result<StatusSnapshot, TransportError>) -> Self {
        Self {
            status: Mutex::new(status),
            send_result: Mutex::new(Ok(())),
            fetches: AtomicUsize::new(0),
            sinks: Mutex::new(Vec::new()),
            close_signals: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn set_status(&self, status: Result<StatusSnapshot, TransportError>) {
        *self.status.lock().unwrap() = status;
    }

    pub fn set_send_result(&self, result: Result<(), TransportError>) {
        *self.send_result.lock().unwrap() = result;
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn connects(&self) -> usize {
        self.sinks.lock().unwrap().len()
    }

    /// Sink handed to the n-th connect call (0-based).
    pub fn sink(&self, index: usize) -> ChannelSink {
        self.sinks.lock().unwrap()[index].clone()
    }

    pub fn latest_sink(&self) -> ChannelSink {
        self.sinks.lock().unwrap().last().cloned().expect("no connect call yet")
    }

    /// Whether the owner closed (or dropped) the n-th channel.
    pub fn channel_closed_by_owner(&self, index: usize) -> bool {
        let mut signals = self.close_signals.lock().unwrap();
        !matches!(
            signals[index].try_recv(),
            Err(oneshot::error::TryRecvError::Empty)
        )
    }

    pub fn sent(&self) -> Vec<Command> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn fetch_status(&self) -> Result<StatusSnapshot, TransportError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.status.lock().unwrap().clone()
    }

    async fn fetch_health(&self) -> Result<HealthStatus, TransportError> {
        Ok(HealthStatus {
            status: "ok".to_string(),
        })
    }

    async fn send(&self, command: &Command) -> Result<(), TransportError> {
        self.sent.lock().unwrap().push(command.clone());
        self.send_result.lock().unwrap().clone()
    }

    fn connect(&self, sink: ChannelSink) -> ChannelHandle {
        let (handle, close_rx) = ChannelHandle::new(sink.id());
        self.sinks.lock().unwrap().push(sink);
        self.close_signals.lock().unwrap().push(close_rx);
        handle
    }
}

/// Minimal status body with the given mode and guard level strings.
pub fn status_json(mode: &str, guard: &str) -> Value {
    json!({
        "time": "2026-01-05T10:00:00Z",
        "startedAt": "2026-01-05T09:00:00Z",
        "bridgeMode": "ZMQ",
        "mode": mode,
        "guardLevel": guard,
        "snapshot": {"symbols": [], "accounts": [], "positions": []},
        "gridStates": [],
    })
}

pub fn status_snapshot(mode: &str, guard: &str) -> StatusSnapshot {
    StatusSnapshot::from_value(status_json(mode, guard)).expect("valid status json")
}

/// Status body shaped like a busy engine: a pending order, a symbol without
/// a tick, a null grid list.
pub fn busy_status_json() -> Value {
    json!({
        "time": "2026-01-05T10:00:00Z",
        "startedAt": "2026-01-05T08:58:59Z",
        "mode": "PAUSED",
        "guardLevel": "ORANGE",
        "snapshot": {
            "symbols": [
                {"symbol": "EURUSD", "bid": 1.10000, "ask": 1.10012, "hasTick": true, "positionCount": 1},
                {"symbol": "GBPUSD", "bid": 0.0, "ask": 0.0, "hasTick": true},
                {"symbol": "XAUUSD", "bid": 2050.1, "ask": 2050.4, "hasTick": false}
            ],
            "accounts": [
                {"accountId": "A1", "balance": 10000.0, "equity": 8700.0, "drawdownPct": 13.0, "guardLevel": "YELLOW"}
            ],
            "positions": [
                {"id": 101, "symbol": "EURUSD", "side": "BUY", "volume": 0.1, "price": 1.1, "profitLoss": 12.5},
                {"id": 102, "symbol": "EURUSD", "side": "SELL", "volume": 0.1, "price": 1.1, "pending": true}
            ]
        },
        "gridStates": null,
        "metrics": {"tickCount": 420, "positionCount": 1, "commandCount": 3, "signalCount": 7}
    })
}

/// Let every ready task run; under a paused clock this also advances 1ms.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}
