// Operator commands and their wire encoding for POST /api/command

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::snapshot::Side;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandType {
    Open,
    Close,
    Modify,
    Pause,
    Resume,
    HedgeAll,
    CloseAll,
    Freeze,
}

impl CommandType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandType::Open => "OPEN",
            CommandType::Close => "CLOSE",
            CommandType::Modify => "MODIFY",
            CommandType::Pause => "PAUSE",
            CommandType::Resume => "RESUME",
            CommandType::HedgeAll => "HEDGE_ALL",
            CommandType::CloseAll => "CLOSE_ALL",
            CommandType::Freeze => "FREEZE",
        }
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "OPEN" => Ok(CommandType::Open),
            "CLOSE" => Ok(CommandType::Close),
            "MODIFY" => Ok(CommandType::Modify),
            "PAUSE" => Ok(CommandType::Pause),
            "RESUME" => Ok(CommandType::Resume),
            "HEDGE_ALL" => Ok(CommandType::HedgeAll),
            "CLOSE_ALL" => Ok(CommandType::CloseAll),
            "FREEZE" => Ok(CommandType::Freeze),
            other => Err(format!("unknown command type '{}'", other)),
        }
    }
}

/// An operator intent. Each variant carries only the fields it needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "CommandBody")]
pub enum Command {
    Open {
        symbol: String,
        side: Side,
        volume: f64,
        price: Option<f64>,
        tp: Option<f64>,
        sl: Option<f64>,
        magic: Option<i64>,
        account_id: Option<String>,
        reason: Option<String>,
    },
    Close {
        ticket: i64,
        account_id: Option<String>,
        reason: Option<String>,
    },
    Modify {
        ticket: i64,
        tp: Option<f64>,
        sl: Option<f64>,
        account_id: Option<String>,
    },
    Pause,
    Resume,
    HedgeAll,
    CloseAll,
    Freeze,
}

impl Command {
    /// Market order with only the required fields set.
    pub fn open(symbol: impl Into<String>, side: Side, volume: f64) -> Self {
        Command::Open {
            symbol: symbol.into(),
            side,
            volume,
            price: None,
            tp: None,
            sl: None,
            magic: None,
            account_id: None,
            reason: None,
        }
    }

    pub fn close(ticket: i64) -> Self {
        Command::Close {
            ticket,
            account_id: None,
            reason: None,
        }
    }

    /// Build a lifecycle command from its type; order types return `None`.
    pub fn lifecycle(kind: CommandType) -> Option<Self> {
        match kind {
            CommandType::Pause => Some(Command::Pause),
            CommandType::Resume => Some(Command::Resume),
            CommandType::HedgeAll => Some(Command::HedgeAll),
            CommandType::CloseAll => Some(Command::CloseAll),
            CommandType::Freeze => Some(Command::Freeze),
            CommandType::Open | CommandType::Close | CommandType::Modify => None,
        }
    }

    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Open { .. } => CommandType::Open,
            Command::Close { .. } => CommandType::Close,
            Command::Modify { .. } => CommandType::Modify,
            Command::Pause => CommandType::Pause,
            Command::Resume => CommandType::Resume,
            Command::HedgeAll => CommandType::HedgeAll,
            Command::CloseAll => CommandType::CloseAll,
            Command::Freeze => CommandType::Freeze,
        }
    }

    /// Commands an operator must confirm before they are sent.
    pub fn requires_confirmation(&self) -> bool {
        matches!(self, Command::CloseAll)
    }

    pub fn to_body(&self) -> CommandBody {
        CommandBody::from(self.clone())
    }
}

/// Flat JSON body understood by the engine. Absent fields are omitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandBody {
    #[serde(rename = "type")]
    pub kind: CommandType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sl: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub magic: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl CommandBody {
    fn bare(kind: CommandType) -> Self {
        Self {
            kind,
            symbol: None,
            side: None,
            volume: None,
            price: None,
            tp: None,
            sl: None,
            ticket: None,
            magic: None,
            account_id: None,
            reason: None,
        }
    }
}

impl From<Command> for CommandBody {
    fn from(command: Command) -> Self {
        let kind = command.command_type();
        match command {
            Command::Open { symbol, side, volume, price, tp, sl, magic, account_id, reason } => {
                CommandBody {
                    symbol: Some(symbol),
                    side: Some(side),
                    volume: Some(volume),
                    price,
                    tp,
                    sl,
                    magic,
                    account_id,
                    reason,
                    ..CommandBody::bare(kind)
                }
            }
            Command::Close { ticket, account_id, reason } => CommandBody {
                ticket: Some(ticket),
                account_id,
                reason,
                ..CommandBody::bare(kind)
            },
            Command::Modify { ticket, tp, sl, account_id } => CommandBody {
                ticket: Some(ticket),
                tp,
                sl,
                account_id,
                ..CommandBody::bare(kind)
            },
            Command::Pause
            | Command::Resume
            | Command::HedgeAll
            | Command::CloseAll
            | Command::Freeze => CommandBody::bare(kind),
        }
    }
}
