//! Built-in subscription sources.
//!
//! All of them read from one shared terminal event hub, so any number of
//! them can be active at once:
//!
//! - [`terminal_events`] / [`TerminalEvents`] -- every terminal event.
//! - [`pointer_events`] -- left-button presses only, under a caller-chosen
//!   identity. Used for click-outside detection.

mod terminal;

pub use terminal::*;
