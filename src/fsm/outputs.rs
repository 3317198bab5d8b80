//! Display and remote-sync handlers.  Read-only with respect to state:
//! they only fill in output commands.

use core::fmt::Write;

use heapless::String;

use super::context::{FsmContext, LCD_COLS, Publish, Screen};
use crate::error::QueueError;
use crate::shared::DoorStatus;

const DOOR_TITLE: &str = "  Door  ";
const DIAL_TITLE: &str = "DoorOpen";

/// Second display line for a door status.
pub fn status_label(status: DoorStatus) -> &'static str {
    match status {
        DoorStatus::Opened => " Opened ",
        DoorStatus::Closed => " Closed ",
        DoorStatus::Opening => "Opening ",
        DoorStatus::Closing => "Closing ",
    }
}

/// `"  NNN % "`: the percentage right-justified in three cells.
pub fn percent_line(percent: i32) -> String<LCD_COLS> {
    let mut line = String::new();
    if write!(line, "  {:>3} % ", percent).is_err() {
        line.clear();
        let _ = line.push_str("  --- % ");
    }
    line
}

pub fn show_door_status(ctx: &mut FsmContext) -> Result<(), QueueError> {
    let mut line1 = String::new();
    let _ = line1.push_str(status_label(ctx.door_status()));
    ctx.commands.screen = Some(Screen {
        line0: DOOR_TITLE,
        line1,
    });
    Ok(())
}

pub fn show_dial_value(ctx: &mut FsmContext) -> Result<(), QueueError> {
    let percent = ctx.dial_value * ctx.config.dial_step_percent;
    ctx.commands.screen = Some(Screen {
        line0: DIAL_TITLE,
        line1: percent_line(percent),
    });
    Ok(())
}

pub fn sync_door_status(ctx: &mut FsmContext) -> Result<(), QueueError> {
    ctx.commands.publish = Some(Publish::DoorStatus(ctx.door_status()));
    Ok(())
}

pub fn sync_dial_value(ctx: &mut FsmContext) -> Result<(), QueueError> {
    ctx.commands.publish = Some(Publish::DialValue(ctx.dial_value));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SystemConfig;
    use crate::events::EventQueue;
    use crate::shared::SharedState;

    #[test]
    fn every_label_fills_the_line() {
        for status in [
            DoorStatus::Opened,
            DoorStatus::Closed,
            DoorStatus::Opening,
            DoorStatus::Closing,
        ] {
            assert_eq!(status_label(status).len(), LCD_COLS);
        }
        assert_eq!(DOOR_TITLE.len(), LCD_COLS);
        assert_eq!(DIAL_TITLE.len(), LCD_COLS);
    }

    #[test]
    fn percent_is_right_justified() {
        assert_eq!(percent_line(0).as_str(), "    0 % ");
        assert_eq!(percent_line(40).as_str(), "   40 % ");
        assert_eq!(percent_line(100).as_str(), "  100 % ");
    }

    #[test]
    fn percent_overflow_falls_back() {
        assert_eq!(percent_line(1000).as_str(), "  --- % ");
    }

    #[test]
    fn dial_screen_uses_step_percent() {
        let q = EventQueue::new();
        let s = SharedState::new();
        let mut ctx = FsmContext::new(&q, &s, SystemConfig::default());
        ctx.dial_value = 3;

        show_dial_value(&mut ctx).unwrap();
        let screen = ctx.commands.screen.unwrap();
        assert_eq!(screen.line0, "DoorOpen");
        assert_eq!(screen.line1.as_str(), "   60 % ");
    }

    #[test]
    fn sync_reads_current_state() {
        let q = EventQueue::new();
        let s = SharedState::new();
        s.set_door_status(DoorStatus::Closing);
        let mut ctx = FsmContext::new(&q, &s, SystemConfig::default());

        sync_door_status(&mut ctx).unwrap();
        assert_eq!(
            ctx.commands.publish,
            Some(Publish::DoorStatus(DoorStatus::Closing))
        );
        sync_dial_value(&mut ctx).unwrap();
        assert_eq!(ctx.commands.publish, Some(Publish::DialValue(5)));
        assert!(q.is_empty());
    }
}
