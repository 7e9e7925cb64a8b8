//! Connection state machine of the sync loop.
//!
//! [`SyncMachine`] holds no I/O. Each transition takes one event (start,
//! channel open/message/close, timer firing, fetch result, stop) and returns
//! the [`Effect`]s the driver must carry out. This keeps every liveness rule
//! testable by feeding synthetic events.

use std::time::Duration;
use tracing::{debug, info, trace};

use crate::clients::{ChannelId, InboundEvent};
use crate::error::TransportError;
use crate::model::StatusSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Connecting,
    Connected,
}

/// Work the driver performs on behalf of the machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Pull the full status once; the result comes back via `fetch_completed`.
    FetchStatus,
    OpenChannel(ChannelId),
    CloseChannel,
    ScheduleReconnect(Duration),
    CancelReconnect,
    ApplySnapshot(Box<StatusSnapshot>),
    SetConnected(bool),
}

#[derive(Debug)]
pub struct SyncMachine {
    state: LinkState,
    channel: Option<ChannelId>,
    next_channel: u64,
    reconnect_delay: Duration,
    reconnect_pending: bool,
    started: bool,
    stopped: bool,
}

impl SyncMachine {
    pub fn new(reconnect_delay: Duration) -> Self {
        Self {
            state: LinkState::Disconnected,
            channel: None,
            next_channel: 0,
            reconnect_delay,
            reconnect_pending: false,
            started: false,
            stopped: false,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == LinkState::Connected
    }

    pub fn reconnect_pending(&self) -> bool {
        self.reconnect_pending
    }

    pub fn current_channel(&self) -> Option<ChannelId> {
        self.channel
    }

    /// Initial pull for a fast first paint, then the first channel attempt.
    pub fn start(&mut self) -> Vec<Effect> {
        if self.started || self.stopped {
            return Vec::new();
        }
        self.started = true;

        let mut effects = vec![Effect::FetchStatus];
        effects.extend(self.open_channel());
        effects
    }

    pub fn channel_opened(&mut self, id: ChannelId) -> Vec<Effect> {
        if !self.accepts(id) || self.state != LinkState::Connecting {
            return Vec::new();
        }

        self.state = LinkState::Connected;
        info!("🔗 Push channel {} open", id.0);
        vec![Effect::SetConnected(true)]
    }

    /// Only `"status"` frames on an open, current channel replace the
    /// snapshot. Other kinds and undecodable payloads are dropped.
    pub fn channel_message(&mut self, id: ChannelId, event: InboundEvent) -> Vec<Effect> {
        if !self.accepts(id) || self.state != LinkState::Connected {
            return Vec::new();
        }

        if !event.is_status() {
            trace!("Ignoring push event of kind '{}'", event.kind);
            return Vec::new();
        }

        match StatusSnapshot::from_value(event.payload) {
            Ok(snapshot) => vec![Effect::ApplySnapshot(Box::new(snapshot))],
            Err(e) => {
                debug!("Dropped undecodable status payload: {}", e);
                Vec::new()
            }
        }
    }

    /// Close or error on the current channel. A repeated close for the same
    /// channel changes nothing, and at most one reconnect is ever pending.
    pub fn channel_closed(&mut self, id: ChannelId) -> Vec<Effect> {
        if !self.accepts(id) || self.state == LinkState::Disconnected {
            return Vec::new();
        }

        self.state = LinkState::Disconnected;
        let mut effects = vec![Effect::SetConnected(false)];

        if !self.reconnect_pending {
            self.reconnect_pending = true;
            info!("🔌 Push channel {} closed, reconnecting in {:?}", id.0, self.reconnect_delay);
            effects.push(Effect::ScheduleReconnect(self.reconnect_delay));
        }

        effects
    }

    pub fn reconnect_due(&mut self) -> Vec<Effect> {
        if self.stopped || !self.reconnect_pending {
            return Vec::new();
        }
        self.reconnect_pending = false;
        self.open_channel()
    }

    /// Fallback pull, only while the push channel is not open.
    pub fn poll_tick(&mut self) -> Vec<Effect> {
        if self.stopped || self.state == LinkState::Connected {
            return Vec::new();
        }
        vec![Effect::FetchStatus]
    }

    /// Successful pulls replace the snapshot regardless of channel state;
    /// failures are absorbed until the next tick.
    pub fn fetch_completed(&mut self, result: Result<StatusSnapshot, TransportError>) -> Vec<Effect> {
        if self.stopped {
            return Vec::new();
        }

        match result {
            Ok(snapshot) => vec![Effect::ApplySnapshot(Box::new(snapshot))],
            Err(e) => {
                debug!("Status pull failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Teardown: cancel the pending reconnect and close the channel.
    pub fn stop(&mut self) -> Vec<Effect> {
        if self.stopped {
            return Vec::new();
        }
        self.stopped = true;

        let mut effects = Vec::new();
        if self.reconnect_pending {
            self.reconnect_pending = false;
            effects.push(Effect::CancelReconnect);
        }
        if self.channel.take().is_some() {
            effects.push(Effect::CloseChannel);
        }
        self.state = LinkState::Disconnected;
        effects
    }

    fn accepts(&self, id: ChannelId) -> bool {
        !self.stopped && self.channel == Some(id)
    }

    fn open_channel(&mut self) -> Vec<Effect> {
        if self.state != LinkState::Disconnected {
            return Vec::new();
        }

        self.next_channel += 1;
        let id = ChannelId(self.next_channel);
        self.channel = Some(id);
        self.state = LinkState::Connecting;
        vec![Effect::OpenChannel(id)]
    }
}
