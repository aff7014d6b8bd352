//! Application model.
//!
//! `TuiApp` is pure state plus synchronous transitions. Anything that needs
//! the runtime — agent calls, checkpoint reads, timers — is expressed as a
//! pending effect the runner drains after each update.

use crate::agent::TaskRecord;

use super::select::{SelectKey, SelectList, SelectOutcome, TimerOp, TimerToken};

/// Who produced a chat line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    System,
    Agent,
}

#[derive(Debug, Clone)]
pub struct ChatEntry {
    pub role: ChatRole,
    pub text: String,
}

/// What confirming a picker row means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerAction {
    /// Show the picked task's transcript.
    ShowTask,
    /// Restore the picked checkpoint into the chat log.
    ResumeCheckpoint,
}

/// An open selection overlay. The list payload is the id of the task or
/// checkpoint behind each row.
pub struct Picker {
    pub title: String,
    pub action: PickerAction,
    pub list: SelectList<String>,
}

/// Effect the runner must perform after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingEffect {
    /// Run a slash command line.
    Command(String),
    /// Send a plain prompt to the agent as a new task.
    StartTask(String),
    /// A picker row was confirmed.
    Pick(PickerAction, String),
}

pub struct TuiApp {
    pub chat_log: Vec<ChatEntry>,
    pub input: String,
    pub picker: Option<Picker>,
    /// One-line preview under the picker, updated on highlight.
    pub picker_status: Option<String>,
    /// Cached task snapshot for the status line.
    pub tasks: Vec<TaskRecord>,
    pub should_quit: bool,
    /// Picker window size, from config.
    pub picker_window: usize,
    /// Show ▲/▼ scroll affordances in pickers, from config.
    pub picker_arrows: bool,
    pending: Vec<PendingEffect>,
    timer_op: TimerOp,
}

impl TuiApp {
    pub fn new() -> Self {
        Self {
            chat_log: Vec::new(),
            input: String::new(),
            picker: None,
            picker_status: None,
            tasks: Vec::new(),
            should_quit: false,
            picker_window: 10,
            picker_arrows: true,
            pending: Vec::new(),
            timer_op: TimerOp::Keep,
        }
    }

    pub fn push_chat(&mut self, role: ChatRole, text: impl Into<String>) {
        self.chat_log.push(ChatEntry {
            role,
            text: text.into(),
        });
    }

    /// Queue an effect for the runner.
    pub fn push_effect(&mut self, effect: PendingEffect) {
        self.pending.push(effect);
    }

    /// Drain queued effects, oldest first.
    pub fn take_effects(&mut self) -> Vec<PendingEffect> {
        std::mem::take(&mut self.pending)
    }

    /// Take the timer instruction accumulated since the last drain.
    pub fn take_timer_op(&mut self) -> TimerOp {
        std::mem::replace(&mut self.timer_op, TimerOp::Keep)
    }

    /// Open a selection overlay, cancelling any previous one first. The
    /// initially active row is surfaced right away, before any key arrives.
    pub fn open_picker(&mut self, picker: Picker) {
        self.close_picker();
        self.picker = Some(picker);
        if let Some(picker) = self.picker.as_ref() {
            if let Some(index) = picker.list.active_index() {
                self.picker_status = Self::status_line(picker, index);
            }
        }
    }

    /// Tear down the overlay, cancelling its pending timer.
    pub fn close_picker(&mut self) {
        if let Some(mut picker) = self.picker.take() {
            self.merge_timer_op(picker.list.deactivate());
        }
        self.picker_status = None;
    }

    /// Forward a pre-classified key to the open picker.
    pub fn picker_key(&mut self, key: SelectKey) {
        let Some(picker) = self.picker.as_mut() else {
            return;
        };
        let outcome = picker.list.handle_key(key);
        self.apply_picker_outcome(outcome);
    }

    /// A debounce timer fired.
    pub fn picker_timer(&mut self, token: TimerToken) {
        let Some(picker) = self.picker.as_mut() else {
            return;
        };
        let outcome = picker.list.on_timer(token);
        self.apply_picker_outcome(outcome);
    }

    fn apply_picker_outcome(&mut self, outcome: SelectOutcome) {
        self.merge_timer_op(outcome.timer);
        let Some(picker) = self.picker.as_ref() else {
            return;
        };
        if let Some(index) = outcome.highlight {
            self.picker_status = Self::status_line(picker, index);
        }
        let picked = outcome
            .select
            .and_then(|index| picker.list.value(index).cloned())
            .map(|id| (picker.action, id));
        if outcome.select.is_some() {
            if let Some((action, id)) = picked {
                self.push_effect(PendingEffect::Pick(action, id));
            }
            self.close_picker();
        }
    }

    /// One-line preview for a highlighted row.
    fn status_line(picker: &Picker, index: usize) -> Option<String> {
        picker
            .list
            .value(index)
            .map(|id| format!("{} — {}", index + 1, id))
    }

    /// Later timer instructions supersede earlier ones within one update.
    fn merge_timer_op(&mut self, op: TimerOp) {
        if op != TimerOp::Keep {
            self.timer_op = op;
        }
    }

    /// Submit the input bar.
    pub fn submit_input(&mut self) {
        let line = std::mem::take(&mut self.input);
        let line = line.trim().to_string();
        if line.is_empty() {
            return;
        }
        self.push_chat(ChatRole::User, line.clone());
        if line.starts_with('/') {
            self.push_effect(PendingEffect::Command(line));
        } else {
            self.push_effect(PendingEffect::StartTask(line));
        }
    }
}

impl Default for TuiApp {
    fn default() -> Self {
        Self::new()
    }
}
