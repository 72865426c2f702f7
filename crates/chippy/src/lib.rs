//! **chippy** -- a terminal chip input for [`ratatui`].
//!
//! This is the umbrella crate. It re-exports the runtime from
//! [`chippy_core`] at the crate root, the widget from [`chippy_widgets`]
//! under [`widgets`], and hosts the [`app::UserList`] model that the
//! `user-list` binary runs.
//!
//! # Quick start
//!
//! ```ignore
//! use chippy::app::{Flags, UserList};
//! use chippy::{MouseMode, ProgramOptions};
//!
//! #[chippy::tokio::main]
//! async fn main() -> Result<(), chippy::ProgramError> {
//!     let options = ProgramOptions {
//!         mouse_mode: Some(MouseMode::CellMotion),
//!         ..ProgramOptions::default()
//!     };
//!     let list = chippy::run_with::<UserList>(Flags::default(), options).await?;
//!     println!("{:?}", list.selected());
//!     Ok(())
//! }
//! ```

pub mod app;

pub use chippy_core::*;
pub mod widgets {
    pub use chippy_widgets::*;
}

pub use crossterm;
pub use ratatui;
pub use tokio;
