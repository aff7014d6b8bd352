//! Messages driving the TUI update loop.

use crossterm::event::KeyEvent;

use super::select::TimerToken;

/// Everything that can happen to the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TuiMessage {
    /// A key press from the terminal.
    Input(KeyEvent),
    /// A picker debounce timer elapsed.
    PickerTimer(TimerToken),
    /// Periodic housekeeping (task status refresh).
    Tick,
    /// Redraw request.
    Render,
}
