//! taskdeck — a terminal console for background coding agents.
//!
//! The TUI follows the Elm architecture: a model in [`tui::app`], messages
//! in [`tui::event`], and a runtime loop in [`tui::runner`] that owns every
//! side effect. Slash commands drive a [`agent::BackgroundAgent`], sessions
//! can be restored from [`checkpoint`] files, and a small line-protocol
//! [`server`] exposes task status to external tools.

pub mod agent;
pub mod checkpoint;
pub mod config;
pub mod server;
pub mod tui;
