//! Token bookkeeping for the remote command channel.
//!
//! The device publishes a short-lived random token; a remote command is
//! only honoured if it carries the token currently published.  A token
//! authorises one command: once spent, the link asks for a fresh one.

use core::fmt;

use super::command::{RemoteCommand, RemoteIntent};

/// Why a well-formed command was not honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// No token has been published yet (or the last one was spent).
    NoTokenIssued { got: u32 },
    /// The command carries a token other than the published one.
    StaleToken { expected: u32, got: u32 },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTokenIssued { got } => write!(f, "token {got} but none issued"),
            Self::StaleToken { expected, got } => {
                write!(f, "token {got} does not match {expected}")
            }
        }
    }
}

/// Last-issued token and its modulus.
#[derive(Debug)]
pub struct RemoteLink {
    token: Option<u32>,
    modulus: u32,
    accepted: u32,
    rejected: u32,
}

impl RemoteLink {
    pub fn new(token_modulus: u32) -> Self {
        Self {
            token: None,
            modulus: token_modulus.max(1),
            accepted: 0,
            rejected: 0,
        }
    }

    /// Token currently published, if any.
    pub fn token(&self) -> Option<u32> {
        self.token
    }

    /// `true` when there is no live token to publish.
    pub fn needs_token(&self) -> bool {
        self.token.is_none()
    }

    /// Reduce `raw` entropy into the token range and make it current.
    pub fn issue(&mut self, raw: u32) -> u32 {
        let token = raw % self.modulus;
        self.token = Some(token);
        token
    }

    /// Check `cmd` against the live token.  On success the token is spent.
    pub fn authorize(&mut self, cmd: &RemoteCommand) -> Result<RemoteIntent, Rejection> {
        match self.token {
            Some(expected) if expected == cmd.token => {
                self.token = None;
                self.accepted += 1;
                Ok(cmd.intent)
            }
            Some(expected) => {
                self.rejected += 1;
                Err(Rejection::StaleToken {
                    expected,
                    got: cmd.token,
                })
            }
            None => {
                self.rejected += 1;
                Err(Rejection::NoTokenIssued { got: cmd.token })
            }
        }
    }

    pub fn accepted(&self) -> u32 {
        self.accepted
    }

    pub fn rejected(&self) -> u32 {
        self.rejected
    }
}
