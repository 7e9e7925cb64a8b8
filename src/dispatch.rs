//! Command dispatcher.
//!
//! Sends one operator intent to the engine and reports failures to a
//! [`CommandErrorSink`]. Each command is a single exchange: no retry, and no
//! local prediction of what the engine will do. The next snapshot is the only
//! evidence that a command took effect.

use std::sync::{Arc, Mutex};
use tracing::{error, info};

use crate::clients::Transport;
use crate::error::{DashboardError, DashboardResult, TransportError};
use crate::model::{Command, CommandType};

/// Operator-visible destination for failed commands.
pub trait CommandErrorSink: Send + Sync {
    fn report(&self, command: &Command, error: &TransportError);
}

/// Default sink: an `error!` log line per failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogErrorSink;

impl CommandErrorSink for LogErrorSink {
    fn report(&self, command: &Command, error: &TransportError) {
        error!("❌ Command {} failed: {}", command.command_type(), error);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommandFailure {
    pub command_type: CommandType,
    pub error: TransportError,
}

/// Keeps every reported failure in memory.
#[derive(Debug, Default)]
pub struct CollectingErrorSink {
    failures: Mutex<Vec<CommandFailure>>,
}

impl CollectingErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failures(&self) -> Vec<CommandFailure> {
        match self.failures.lock() {
            Ok(failures) => failures.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.failures().is_empty()
    }
}

impl CommandErrorSink for CollectingErrorSink {
    fn report(&self, command: &Command, error: &TransportError) {
        let failure = CommandFailure {
            command_type: command.command_type(),
            error: error.clone(),
        };
        match self.failures.lock() {
            Ok(mut failures) => failures.push(failure),
            Err(poisoned) => poisoned.into_inner().push(failure),
        }
    }
}

pub struct CommandDispatcher<T: Transport> {
    transport: Arc<T>,
    sink: Arc<dyn CommandErrorSink>,
    log_commands: bool,
}

impl<T: Transport> CommandDispatcher<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self::with_sink(transport, Arc::new(LogErrorSink))
    }

    pub fn with_sink(transport: Arc<T>, sink: Arc<dyn CommandErrorSink>) -> Self {
        Self {
            transport,
            sink,
            log_commands: true,
        }
    }

    /// Toggle the info line written for every outgoing command.
    pub fn log_commands(mut self, enabled: bool) -> Self {
        self.log_commands = enabled;
        self
    }

    pub async fn dispatch(&self, command: Command) -> DashboardResult<()> {
        let kind = command.command_type();
        if self.log_commands {
            info!("📤 Sending {} command", kind);
        }

        match self.transport.send(&command).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.sink.report(&command, &e);
                Err(DashboardError::CommandFailed(kind.to_string(), e))
            }
        }
    }

    /// Like [`dispatch`](Self::dispatch), but refuses commands that need an
    /// explicit confirmation when `confirmed` is false. Nothing is sent then.
    pub async fn dispatch_confirmed(&self, command: Command, confirmed: bool) -> DashboardResult<()> {
        if command.requires_confirmation() && !confirmed {
            return Err(DashboardError::CommandNotConfirmed(
                command.command_type().to_string(),
            ));
        }
        self.dispatch(command).await
    }
}
