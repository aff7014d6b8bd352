//! Terminal user interface.
//!
//! Model/update/view split: [`app`] holds the model and the update function,
//! [`event`] defines the messages, [`layout`] renders, [`input`] translates
//! raw key events, [`commands`] implements the slash commands, and
//! [`runner`] drives the whole thing on the tokio runtime. [`select`] is the
//! reusable picker controller the task and checkpoint overlays share.

pub mod app;
pub mod commands;
pub mod event;
pub mod input;
pub mod layout;
pub mod runner;
pub mod select;
