//! Core runtime for **chippy**.
//!
//! `chippy-core` provides the traits, types, and runtime that host the chip
//! input. The design follows the [Elm Architecture]: state lives in a
//! [`Model`], changes only in [`Model::update`], and is drawn by
//! [`Model::view`]. Side effects leave through [`Command`]s; input arrives
//! through [`Subscription`]s.
//!
//! # Key types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Model`] | Top-level application trait (init / update / view) |
//! | [`Component`] | Reusable sub-model that renders into a [`ratatui::layout::Rect`] |
//! | [`Command`] | Describes a side effect to be executed by the runtime |
//! | [`Subscription`] | Long-lived, runtime-managed event source |
//! | [`Program`] | Wires a [`Model`] to a real terminal and drives the message loop |
//! | [`TestProgram`](testing::TestProgram) | Headless harness for unit-testing a [`Model`] |
//!
//! # Scoped listeners
//!
//! A subscription stays alive exactly as long as the model keeps returning
//! it from [`Model::subscriptions`]. A widget that needs a process-wide
//! listener (such as click-outside detection) declares one while it is
//! mounted; the runtime starts it once, stops it once when the widget stops
//! declaring it, and stops everything when the program exits.
//!
//! [Elm Architecture]: https://guide.elm-lang.org/architecture/

pub mod command;
pub mod component;
pub mod event;
pub mod model;
pub mod runtime;
pub mod subscription;
pub mod subscriptions;
pub mod testing;

pub use command::{Command, MouseMode, TerminalCommand};
pub use component::Component;
pub use event::TerminalEvent;
pub use model::Model;
pub use runtime::{OutputTarget, Program, ProgramError, ProgramOptions};
pub use subscription::{subscribe, Subscription, SubscriptionId, SubscriptionSource};
pub use subscriptions::{listen, pointer_events, terminal_events, TerminalEvents};

/// Run a chippy application with default options.
pub async fn run<M: Model>(flags: M::Flags) -> Result<M, ProgramError> {
    Program::<M>::new(flags)?.run().await
}

/// Run with custom options.
pub async fn run_with<M: Model>(
    flags: M::Flags,
    options: ProgramOptions,
) -> Result<M, ProgramError> {
    Program::<M>::with_options(flags, options)?.run().await
}
