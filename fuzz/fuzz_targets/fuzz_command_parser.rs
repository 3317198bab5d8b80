//! Fuzz target: `RemoteCommand::parse` and `RemoteLink::authorize`
//!
//! Feeds arbitrary bytes through the remote command path the same way the
//! dispatch loop does after a poll.
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - Whatever parses re-parses identically from its canonical form
//! - A command is accepted only when its token equals the issued token,
//!   and at most once per token
//!
//! cargo fuzz run fuzz_command_parser

#![no_main]

use garagedoor::remote::{RemoteCommand, RemoteLink};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = core::str::from_utf8(data) else {
        return;
    };
    let Ok(cmd) = RemoteCommand::parse(raw) else {
        return;
    };

    let canonical = format!("{}z{}", cmd.intent.event() as u8, cmd.token);
    assert_eq!(RemoteCommand::parse(&canonical), Ok(cmd));

    let mut link = RemoteLink::new(100);
    let issued = link.issue(cmd.token);
    let first = link.authorize(&cmd);
    assert_eq!(first.is_ok(), issued == cmd.token);
    assert!(link.authorize(&cmd).is_err(), "a token must not authorise twice");
});
