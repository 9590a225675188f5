//! **gridsnap** — keyboard-driven window tiling on a preset grid.
//!
//! Each window carries a tile: a preset grid key ("1" through "9"), a cell
//! index in that grid, and a row/column span.  Commands move, expand, and
//! shrink the tile; gridsnap turns the result into pixel geometry on the
//! window's monitor and places the window there, animated or snapped.
//! Rows may have different widths (preset "7" is 1-2-4), so cell indices
//! are flattened row-major and decoded against the preset's row list.
//!
//! # Architecture
//!
//! The crate is organised around three core traits:
//!
//! * [`traits::Compositor`] — abstracts window queries and placement so
//!   the tiling logic is not coupled to any specific compositor.
//! * [`traits::SettingsStore`] — abstracts persisted user settings
//!   (animation, padding, last used preset).
//! * [`traits::CommandSource`] — abstracts the transport that delivers
//!   user intent (a Unix socket, Hyprland's event stream, …) so the main
//!   loop is not coupled to any specific IPC mechanism.
//!
//! Concrete implementations live in [`hyprland`] (Hyprland IPC), [`ipc`]
//! (Unix-socket command listener), and [`settings`] (JSON settings file).
//! The [`tiler::GridTiler`] ties them together; [`catalog`], [`span`],
//! [`transform`], [`geometry`], [`focus`], and [`animator`] hold the pure
//! grid logic underneath it.

pub mod animator;
pub mod catalog;
pub mod command;
pub mod focus;
pub mod geometry;
pub mod hyprland;
pub mod ipc;
pub mod settings;
pub mod span;
pub mod state;
pub mod tiler;
pub mod traits;
pub mod transform;
