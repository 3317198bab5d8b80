//! Remote command payload parsing.
//!
//! A command is two decimal integers separated by a literal `z`:
//!
//! ```text
//!   <eventId>z<token>        e.g. "2z47"  → open, token 47
//! ```
//!
//! Only three event ids are remote-triggerable: open (2), close (4) and
//! halt (6).  They are the wire ids of the matching [`Event`]s.

use core::str::FromStr;

use crate::error::CommandError;
use crate::events::Event;

/// Separator between the event id and the token.
pub const DELIMITER: char = 'z';

/// A door intent that may be requested remotely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteIntent {
    Open,
    Close,
    Halt,
}

impl RemoteIntent {
    pub fn from_id(id: u8) -> Option<Self> {
        match Event::from_u8(id)? {
            Event::DoorOpen => Some(Self::Open),
            Event::DoorClose => Some(Self::Close),
            Event::DoorHalt => Some(Self::Halt),
            _ => None,
        }
    }

    pub fn event(self) -> Event {
        match self {
            Self::Open => Event::DoorOpen,
            Self::Close => Event::DoorClose,
            Self::Halt => Event::DoorHalt,
        }
    }

    /// Halt jumps the queue like a touch-triggered halt does.
    pub fn is_emergency(self) -> bool {
        self == Self::Halt
    }
}

/// A parsed, not yet authenticated, remote command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteCommand {
    pub intent: RemoteIntent,
    pub token: u32,
}

impl RemoteCommand {
    /// Parse a raw payload.  An empty or blank payload means "nothing
    /// pending" and yields [`CommandError::Empty`].
    pub fn parse(raw: &str) -> Result<Self, CommandError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(CommandError::Empty);
        }
        let (id, token) = raw
            .split_once(DELIMITER)
            .ok_or(CommandError::MissingDelimiter)?;
        let id: u8 = id
            .trim()
            .parse()
            .map_err(|_| CommandError::InvalidEventId)?;
        let token: u32 = token
            .trim()
            .parse()
            .map_err(|_| CommandError::InvalidToken)?;
        let intent = RemoteIntent::from_id(id).ok_or(CommandError::UnknownEvent(id))?;
        Ok(Self { intent, token })
    }
}

impl FromStr for RemoteCommand {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
