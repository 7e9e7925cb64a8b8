//! Async driver for [`SyncMachine`].
//!
//! One tokio task owns the machine, the push channel handle and both timers.
//! Channel events, timer firings and fetch results all arrive on channels and
//! are handled one at a time, so the machine never sees concurrent input.

use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::machine::{Effect, SyncMachine};
use super::timer::ScheduledTask;
use crate::clients::{ChannelEvent, ChannelHandle, ChannelId, ChannelSink, Transport};
use crate::config::SyncConfig;
use crate::error::TransportError;
use crate::model::StatusSnapshot;
use crate::store::{DashboardStore, StoreWriter};

enum Internal {
    PollTick,
    ReconnectDue,
    Fetched(Result<StatusSnapshot, TransportError>),
}

/// Keeps the store in sync with the engine until shut down.
pub struct SyncController<T: Transport> {
    transport: Arc<T>,
    writer: StoreWriter,
    config: SyncConfig,
}

impl<T: Transport> SyncController<T> {
    /// Controller with a fresh store; returns the read side alongside.
    pub fn new(transport: Arc<T>, config: SyncConfig) -> (Self, DashboardStore) {
        let (writer, store) = DashboardStore::new();
        (Self::with_writer(transport, writer, config), store)
    }

    pub fn with_writer(transport: Arc<T>, writer: StoreWriter, config: SyncConfig) -> Self {
        Self {
            transport,
            writer,
            config,
        }
    }

    pub fn spawn(self) -> SyncHandle {
        let store = self.writer.reader();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(self.run(shutdown_rx));

        SyncHandle {
            shutdown: Some(shutdown_tx),
            task,
            store,
        }
    }

    /// Run until `shutdown` fires or its sender is dropped.
    pub async fn run(self, mut shutdown: oneshot::Receiver<()>) {
        let (channel_tx, mut channel_rx) = mpsc::unbounded_channel();
        let (internal_tx, mut internal_rx) = mpsc::unbounded_channel();

        let poll_tx = internal_tx.clone();
        let poll = ScheduledTask::repeating(self.config.poll_interval(), move || {
            let _ = poll_tx.send(Internal::PollTick);
        });

        let mut driver = Driver {
            machine: SyncMachine::new(self.config.reconnect_delay()),
            transport: self.transport,
            writer: self.writer,
            channel: None,
            reconnect: None,
            channel_tx,
            internal_tx,
        };

        info!(
            "🔄 Sync started (reconnect {:?}, poll {:?})",
            self.config.reconnect_delay(),
            self.config.poll_interval()
        );
        let effects = driver.machine.start();
        driver.apply(effects);

        loop {
            let effects = tokio::select! {
                _ = &mut shutdown => break,
                Some((id, event)) = channel_rx.recv() => driver.on_channel(id, event),
                Some(event) = internal_rx.recv() => driver.on_internal(event),
            };
            driver.apply(effects);
        }

        poll.cancel();
        let effects = driver.machine.stop();
        driver.apply(effects);
        info!("🛑 Sync stopped");
    }
}

/// Running controller. Dropping it without [`SyncHandle::shutdown`] also
/// stops the loop, just without waiting for teardown.
#[derive(Debug)]
pub struct SyncHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
    store: DashboardStore,
}

impl SyncHandle {
    pub fn store(&self) -> DashboardStore {
        self.store.clone()
    }

    /// Stop polling, cancel any pending reconnect, close the channel and wait
    /// for the loop to finish.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        let _ = (&mut self.task).await;
    }
}

struct Driver<T: Transport> {
    machine: SyncMachine,
    transport: Arc<T>,
    writer: StoreWriter,
    channel: Option<ChannelHandle>,
    reconnect: Option<ScheduledTask>,
    channel_tx: mpsc::UnboundedSender<(ChannelId, ChannelEvent)>,
    internal_tx: mpsc::UnboundedSender<Internal>,
}

impl<T: Transport> Driver<T> {
    fn on_channel(&mut self, id: ChannelId, event: ChannelEvent) -> Vec<Effect> {
        match event {
            ChannelEvent::Opened => self.machine.channel_opened(id),
            ChannelEvent::Message(event) => self.machine.channel_message(id, event),
            ChannelEvent::Closed => self.machine.channel_closed(id),
        }
    }

    fn on_internal(&mut self, event: Internal) -> Vec<Effect> {
        match event {
            Internal::PollTick => self.machine.poll_tick(),
            Internal::ReconnectDue => {
                self.reconnect = None;
                self.machine.reconnect_due()
            }
            Internal::Fetched(result) => self.machine.fetch_completed(result),
        }
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchStatus => {
                    let transport = self.transport.clone();
                    let tx = self.internal_tx.clone();
                    tokio::spawn(async move {
                        let result = transport.fetch_status().await;
                        let _ = tx.send(Internal::Fetched(result));
                    });
                }
                Effect::OpenChannel(id) => {
                    if let Some(old) = self.channel.take() {
                        old.close();
                    }
                    debug!("Opening push channel {}", id.0);
                    let sink = ChannelSink::new(id, self.channel_tx.clone());
                    self.channel = Some(self.transport.connect(sink));
                }
                Effect::CloseChannel => {
                    if let Some(handle) = self.channel.take() {
                        handle.close();
                    }
                }
                Effect::ScheduleReconnect(delay) => {
                    let tx = self.internal_tx.clone();
                    self.reconnect = Some(ScheduledTask::once(delay, move || {
                        let _ = tx.send(Internal::ReconnectDue);
                    }));
                }
                Effect::CancelReconnect => {
                    if let Some(task) = self.reconnect.take() {
                        task.cancel();
                    }
                }
                Effect::ApplySnapshot(snapshot) => self.writer.replace_snapshot(*snapshot),
                Effect::SetConnected(connected) => self.writer.set_connected(connected),
            }
        }
    }
}
