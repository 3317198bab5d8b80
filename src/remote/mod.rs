//! Remote link: command parsing, token bookkeeping, value encoding.
//!
//! ```text
//!  device ──put──▶ door_status, re_value, event_bus (token)
//!  device ◀──get── app_e ("<eventId>z<token>")
//! ```

pub mod command;
pub mod link;
pub mod wire;

pub use command::{RemoteCommand, RemoteIntent};
pub use link::{Rejection, RemoteLink};

/// Keys the controller reads and writes in the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteKey {
    /// Current door status wire code.
    DoorStatus,
    /// Current dial value.
    DialValue,
    /// Token a remote command must carry.
    Token,
    /// Incoming command payload.
    Command,
}

impl RemoteKey {
    pub const ALL: [RemoteKey; 4] = [
        RemoteKey::DoorStatus,
        RemoteKey::DialValue,
        RemoteKey::Token,
        RemoteKey::Command,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::DoorStatus => "door_status",
            Self::DialValue => "re_value",
            Self::Token => "event_bus",
            Self::Command => "app_e",
        }
    }
}

impl core::fmt::Display for RemoteKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
