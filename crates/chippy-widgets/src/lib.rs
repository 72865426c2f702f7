//! The chip input widget for **chippy**, and the pieces it is built from.
//!
//! [`ChipInput`](chip_input::ChipInput) implements [`chippy_core::Component`],
//! so it embeds in any [`chippy_core::Model`] and lays out with ordinary
//! [`ratatui`] constraints.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`catalog`] | The immutable list of selectable people, built in or loaded from TOML |
//! | [`chips`] | Ordered chip collection with never-reused ids |
//! | [`filter`] | Case-insensitive name search that hides chipped names |
//! | [`text_edit`] | Single-line text buffer with a cursor |
//! | [`chip_input`] | The interactive widget: typing, dropdown, Backspace, clicks |

pub mod catalog;
pub mod chip_input;
pub mod chips;
pub mod filter;
pub mod text_edit;

pub use catalog::{Catalog, CatalogEntry, CatalogError};
pub use chip_input::{ChipInput, ChipInputStyle};
pub use chips::{Chip, ChipId, ChipSet};
