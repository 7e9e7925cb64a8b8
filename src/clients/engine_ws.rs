// WebSocket push channel to the engine's /ws endpoint

use chrono::{DateTime, Utc};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::Value;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use tracing::{debug, info, trace, warn};

use super::{ChannelHandle, ChannelSink, InboundEvent};

#[derive(Debug, Deserialize)]
struct WireFrame {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    timestamp: Option<String>,
}

/// Decode one text frame `{type, data, timestamp}`.
///
/// Anything that is not a JSON object with a string `type` yields `None`;
/// the caller drops it without further noise.
pub fn decode_frame(text: &str) -> Option<InboundEvent> {
    let frame: WireFrame = serde_json::from_str(text).ok()?;
    let timestamp = frame
        .timestamp
        .as_deref()
        .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
        .map(|ts| ts.with_timezone(&Utc));

    Some(InboundEvent {
        kind: frame.kind,
        payload: frame.data,
        timestamp,
    })
}

/// Open the push channel in a background task.
///
/// The task reports `Opened` once the handshake completes, one `Message` per
/// decodable text frame, and a single `Closed` when the connection fails or
/// ends. Closing the returned handle ends the task without a `Closed` event.
pub fn spawn_push_channel(url: String, sink: ChannelSink) -> ChannelHandle {
    let (handle, mut close_rx) = ChannelHandle::new(sink.id());

    tokio::spawn(async move {
        let connect = connect_async(url.as_str());
        tokio::pin!(connect);

        let ws_stream = tokio::select! {
            _ = &mut close_rx => return,
            result = &mut connect => match result {
                Ok((stream, _)) => stream,
                Err(e) => {
                    debug!("Push channel connect to {} failed: {}", url, e);
                    sink.closed();
                    return;
                }
            },
        };

        info!("✅ Connected to engine push channel");
        sink.opened();

        let (mut ws_sender, mut ws_receiver) = ws_stream.split();

        loop {
            tokio::select! {
                _ = &mut close_rx => {
                    let _ = ws_sender.send(Message::Close(None)).await;
                    debug!("Push channel closed by owner");
                    return;
                }
                frame = ws_receiver.next() => match frame {
                    Some(Ok(Message::Text(text))) => match decode_frame(&text) {
                        Some(event) => sink.message(event),
                        None => trace!("Dropped undecodable push frame"),
                    },
                    Some(Ok(Message::Close(_))) | None => {
                        warn!("⚠️ Engine push channel closed");
                        sink.closed();
                        return;
                    }
                    Some(Err(e)) => {
                        warn!("⚠️ Engine push channel error: {}", e);
                        sink.closed();
                        return;
                    }
                    Some(Ok(_)) => {}
                },
            }
        }
    });

    handle
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_status_frame() {
        let text = r#"{"type":"status","data":{"mode":"RUNNING"},"timestamp":"2026-01-05T10:00:00.123Z"}"#;
        let event = decode_frame(text).unwrap();
        assert_eq!(event.kind, "status");
        assert_eq!(event.payload, json!({"mode": "RUNNING"}));
        assert!(event.timestamp.is_some());
        assert!(event.is_status());
    }

    #[test]
    fn test_decode_other_kinds_are_kept() {
        let event = decode_frame(r#"{"type":"heartbeat"}"#).unwrap();
        assert_eq!(event.kind, "heartbeat");
        assert_eq!(event.payload, Value::Null);
        assert!(!event.is_status());
    }

    #[test]
    fn test_malformed_frames_yield_none() {
        assert!(decode_frame("not json").is_none());
        assert!(decode_frame("[1,2,3]").is_none());
        assert!(decode_frame(r#"{"data":{}}"#).is_none());
        assert!(decode_frame(r#"{"type":42}"#).is_none());
    }

    #[test]
    fn test_bad_timestamp_does_not_drop_frame() {
        let event = decode_frame(r#"{"type":"status","data":{},"timestamp":"yesterday"}"#).unwrap();
        assert!(event.timestamp.is_none());
    }
}
