//! Engine transport: request/response over HTTP plus a push channel.
//!
//! The sync loop only ever talks to the engine through [`Transport`], so a
//! test double can stand in for the real network. Push channel activity is
//! reported as [`ChannelEvent`]s through a [`ChannelSink`]; every connection
//! attempt carries its own [`ChannelId`] so late events from an abandoned
//! connection can be told apart from the current one.

pub mod engine_api;
pub mod engine_ws;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

use crate::error::TransportError;
use crate::model::{Command, HealthStatus, StatusSnapshot};

pub use engine_api::HttpTransport;
pub use engine_ws::{decode_frame, spawn_push_channel};

/// Push frame kind carrying a full [`StatusSnapshot`].
pub const STATUS_EVENT: &str = "status";

/// One decoded push frame. `payload` is left opaque for the consumer.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEvent {
    pub kind: String,
    pub payload: Value,
    pub timestamp: Option<DateTime<Utc>>,
}

impl InboundEvent {
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
            timestamp: None,
        }
    }

    pub fn is_status(&self) -> bool {
        self.kind == STATUS_EVENT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    Opened,
    Message(InboundEvent),
    Closed,
}

/// Where a push channel reports what happens to it.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    id: ChannelId,
    tx: mpsc::UnboundedSender<(ChannelId, ChannelEvent)>,
}

impl ChannelSink {
    pub fn new(id: ChannelId, tx: mpsc::UnboundedSender<(ChannelId, ChannelEvent)>) -> Self {
        Self { id, tx }
    }

    pub fn id(&self) -> ChannelId {
        self.id
    }

    pub fn opened(&self) {
        self.emit(ChannelEvent::Opened);
    }

    pub fn message(&self, event: InboundEvent) {
        self.emit(ChannelEvent::Message(event));
    }

    pub fn closed(&self) {
        self.emit(ChannelEvent::Closed);
    }

    // The receiver is gone once the controller has shut down.
    fn emit(&self, event: ChannelEvent) {
        let _ = self.tx.send((self.id, event));
    }
}

/// Owner side of an open or opening push channel.
///
/// Calling [`ChannelHandle::close`] or dropping the handle both tell the
/// connection to shut down.
#[derive(Debug)]
pub struct ChannelHandle {
    id: ChannelId,
    close_tx: Option<oneshot::Sender<()>>,
}

impl ChannelHandle {
    /// Returns the handle and the receiver the connection watches for shutdown.
    pub fn new(id: ChannelId) -> (Self, oneshot::Receiver<()>) {
        let (close_tx, close_rx) = oneshot::channel();
        (
            Self {
                id,
                close_tx: Some(close_tx),
            },
            close_rx,
        )
    }

    pub fn id(&self) -> ChannelId {
        self.id
    }

    pub fn close(mut self) {
        if let Some(tx) = self.close_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Capability interface the core needs from the engine connection.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// `GET /api/status`: one pull of the full snapshot.
    async fn fetch_status(&self) -> Result<StatusSnapshot, TransportError>;

    /// `GET /api/health`.
    async fn fetch_health(&self) -> Result<HealthStatus, TransportError>;

    /// `POST /api/command`. A single exchange, never retried.
    async fn send(&self, command: &Command) -> Result<(), TransportError>;

    /// Start opening the push channel. Returns immediately; progress is
    /// reported through `sink`.
    fn connect(&self, sink: ChannelSink) -> ChannelHandle;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sink_tags_events_with_channel_id() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = ChannelSink::new(ChannelId(4), tx);

        sink.opened();
        sink.message(InboundEvent::new("status", json!({})));
        sink.closed();

        assert_eq!(rx.try_recv().unwrap(), (ChannelId(4), ChannelEvent::Opened));
        assert!(matches!(rx.try_recv().unwrap(), (ChannelId(4), ChannelEvent::Message(_))));
        assert_eq!(rx.try_recv().unwrap(), (ChannelId(4), ChannelEvent::Closed));
    }

    #[test]
    fn test_sink_ignores_dropped_receiver() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        ChannelSink::new(ChannelId(1), tx).closed();
    }

    #[test]
    fn test_handle_close_and_drop_both_signal() {
        let (handle, mut rx) = ChannelHandle::new(ChannelId(1));
        handle.close();
        assert_eq!(rx.try_recv(), Ok(()));

        let (handle, mut rx) = ChannelHandle::new(ChannelId(2));
        drop(handle);
        assert!(matches!(rx.try_recv(), Err(oneshot::error::TryRecvError::Closed)));
    }
}
