//! Selection picker controller — cursor, scroll window, numeric fast-select.
//!
//! A keyboard-driven single-choice list. Three coupled pieces of transient
//! state: the active index, the visible window, and a buffer of typed digits
//! that lets the user jump straight to row N ("1","5" → row 15) without a
//! confirm keystroke. A single digit is ambiguous — it may be a complete
//! selection or the prefix of a longer one — so a committed selection is
//! debounced behind a short timer, and an out-of-range number behind a
//! longer reset timer.
//!
//! The controller is pure state: `handle_key` and `on_timer` are synchronous
//! transitions returning a [`SelectOutcome`] of effects. It renders nothing
//! and schedules nothing itself; the host owns the runtime timer and feeds
//! fires back through [`SelectList::on_timer`]. Every schedule mints a fresh
//! [`TimerToken`], so a fire against a superseded buffer is a no-op.

use std::time::Duration;

/// Delay before a buffered number commits as a selection. Long enough for a
/// second digit to arrive, short enough to feel instant.
pub const COMMIT_DELAY: Duration = Duration::from_millis(350);

/// Delay before an out-of-range number buffer is discarded.
pub const RESET_DELAY: Duration = Duration::from_millis(1000);

/// One row in the list.
#[derive(Debug, Clone)]
pub struct SelectItem<T> {
    /// Display label.
    pub label: String,
    /// Opaque payload handed back on highlight/select.
    pub value: T,
    /// Advisory: rendered dimmed, but still navigable and selectable.
    pub disabled: bool,
    /// Alternate two-part label, used instead of `label` when both are set.
    pub name_display: Option<String>,
    pub type_display: Option<String>,
}

impl<T> SelectItem<T> {
    pub fn new(label: impl Into<String>, value: T) -> Self {
        Self {
            label: label.into(),
            value,
            disabled: false,
            name_display: None,
            type_display: None,
        }
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set the two-part alternate label.
    pub fn with_display(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.name_display = Some(name.into());
        self.type_display = Some(ty.into());
        self
    }

    /// Label to render: "name type" when both display parts are present.
    pub fn display_label(&self) -> String {
        match (&self.name_display, &self.type_display) {
            (Some(name), Some(ty)) => format!("{name} {ty}"),
            _ => self.label.clone(),
        }
    }
}

/// A key event, pre-classified by the host's input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectKey {
    Up,
    Down,
    Confirm,
    /// Decimal digit 0–9.
    Digit(u8),
    /// Anything else — silently ignored.
    Other,
}

/// Opaque handle identifying one scheduled timer. Monotonic per controller;
/// a fire whose token no longer matches the pending record is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerToken(u64);

/// What a pending timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Commit the buffered number as a selection.
    Commit,
    /// Discard the (out-of-range) number buffer.
    Reset,
}

/// Instruction to the host's timer runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerRequest {
    pub token: TimerToken,
    pub kind: TimerKind,
    pub delay: Duration,
}

/// Timer side effect of a transition. At most one timer is live per
/// controller: `Schedule` always replaces whatever was pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerOp {
    /// No change to any pending timer.
    #[default]
    Keep,
    /// Abort the pending timer.
    Cancel,
    /// Abort the pending timer, then arm this one.
    Schedule(TimerRequest),
}

/// Effects of one event. Indices point into the item sequence; the host
/// resolves them to values via [`SelectList::value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectOutcome {
    /// The active row moved here.
    pub highlight: Option<usize>,
    /// This row was selected.
    pub select: Option<usize>,
    pub timer: TimerOp,
}

/// A row of the visible window, for the renderer.
#[derive(Debug)]
pub struct VisibleRow<'a, T> {
    /// Position in the full item sequence (0-based).
    pub index: usize,
    pub item: &'a SelectItem<T>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    token: TimerToken,
    kind: TimerKind,
}

/// Single-choice list state machine.
///
/// Invariants (whenever the list is non-empty):
/// - `active < items.len()`
/// - `scroll <= active < scroll + window`
/// - `scroll <= items.len().saturating_sub(window)`
/// - at most one pending timer, replaced or cancelled before it goes stale
pub struct SelectList<T> {
    items: Vec<SelectItem<T>>,
    active: usize,
    scroll: usize,
    window: usize,
    show_arrows: bool,
    buffer: String,
    pending: Option<PendingTimer>,
    next_token: u64,
}

impl<T> SelectList<T> {
    /// Build a list with defaults: initial index 0, window of 10, no arrows.
    pub fn new(items: Vec<SelectItem<T>>) -> Self {
        Self {
            items,
            active: 0,
            scroll: 0,
            window: 10,
            show_arrows: false,
            buffer: String::new(),
            pending: None,
            next_token: 0,
        }
    }

    /// Start with this row highlighted (clamped into range).
    pub fn with_initial_index(mut self, index: usize) -> Self {
        self.active = match self.items.len() {
            0 => 0,
            len => index.min(len - 1),
        };
        self.ensure_visible();
        self
    }

    /// Rows rendered at once (minimum 1).
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window.max(1);
        self.ensure_visible();
        self
    }

    /// Enable the scroll-affordance flags.
    pub fn with_scroll_arrows(mut self, show: bool) -> Self {
        self.show_arrows = show;
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Active row index, or None when the list is empty.
    pub fn active_index(&self) -> Option<usize> {
        (!self.items.is_empty()).then_some(self.active)
    }

    pub fn value(&self, index: usize) -> Option<&T> {
        self.items.get(index).map(|item| &item.value)
    }

    pub fn active_value(&self) -> Option<&T> {
        self.active_index().and_then(|i| self.value(i))
    }

    /// Current digit buffer ("" when idle).
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Consume one key event.
    pub fn handle_key(&mut self, key: SelectKey) -> SelectOutcome {
        if self.items.is_empty() {
            return SelectOutcome::default();
        }
        match key {
            SelectKey::Up => self.navigate(|active, len| {
                if active == 0 {
                    len - 1
                } else {
                    active - 1
                }
            }),
            SelectKey::Down => self.navigate(|active, len| (active + 1) % len),
            SelectKey::Confirm => {
                let timer = self.reset_buffer();
                SelectOutcome {
                    highlight: None,
                    select: Some(self.active),
                    timer,
                }
            }
            SelectKey::Digit(d) if d <= 9 => self.on_digit(d),
            SelectKey::Digit(_) | SelectKey::Other => SelectOutcome::default(),
        }
    }

    /// A previously scheduled timer elapsed. Stale tokens are no-ops.
    pub fn on_timer(&mut self, token: TimerToken) -> SelectOutcome {
        match self.pending {
            Some(p) if p.token == token => {
                self.pending = None;
                self.buffer.clear();
                match p.kind {
                    TimerKind::Commit => SelectOutcome {
                        highlight: None,
                        select: Some(self.active),
                        timer: TimerOp::Keep,
                    },
                    TimerKind::Reset => SelectOutcome::default(),
                }
            }
            _ => SelectOutcome::default(),
        }
    }

    /// Focus loss / unmount: clear transient state. The host must abort its
    /// runtime timer when this returns `Cancel`.
    pub fn deactivate(&mut self) -> TimerOp {
        self.reset_buffer()
    }

    /// The rows currently in the window, top to bottom.
    pub fn visible_slice(&self) -> Vec<VisibleRow<'_, T>> {
        let end = (self.scroll + self.window).min(self.items.len());
        self.items[self.scroll..end]
            .iter()
            .enumerate()
            .map(|(offset, item)| VisibleRow {
                index: self.scroll + offset,
                item,
                is_active: self.scroll + offset == self.active,
            })
            .collect()
    }

    /// Column width for padded 1-based row numbers.
    pub fn index_width(&self) -> usize {
        self.items.len().to_string().len()
    }

    pub fn can_scroll_up(&self) -> bool {
        self.show_arrows && self.scroll > 0
    }

    pub fn can_scroll_down(&self) -> bool {
        self.show_arrows && self.scroll + self.window < self.items.len()
    }

    /// Navigation overrides any in-flight numeric entry: reset the buffer
    /// (cancelling its timer) before applying the move. Highlight only
    /// fires when the index actually changes, so a single-item list stays
    /// quiet under Up/Down.
    fn navigate(&mut self, step: impl Fn(usize, usize) -> usize) -> SelectOutcome {
        let timer = self.reset_buffer();
        let previous = self.active;
        self.active = step(self.active, self.items.len());
        self.ensure_visible();
        SelectOutcome {
            highlight: (self.active != previous).then_some(self.active),
            select: None,
            timer,
        }
    }

    /// One more digit. The target is re-evaluated from the full buffer, so
    /// a valid prefix followed by an out-of-range digit ("1" then "0" on a
    /// 9-item list) correctly falls through to the reset path.
    fn on_digit(&mut self, d: u8) -> SelectOutcome {
        self.buffer.push((b'0' + d) as char);
        // Overflowing parses ("99999…") fail and land in the reset arm.
        let target = self
            .buffer
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1));
        match target {
            Some(t) if t < self.items.len() => {
                self.active = t;
                self.ensure_visible();
                SelectOutcome {
                    highlight: Some(t),
                    select: None,
                    timer: self.schedule(TimerKind::Commit, COMMIT_DELAY),
                }
            }
            _ => SelectOutcome {
                highlight: None,
                select: None,
                timer: self.schedule(TimerKind::Reset, RESET_DELAY),
            },
        }
    }

    /// Mint a fresh token and replace the pending timer.
    fn schedule(&mut self, kind: TimerKind, delay: Duration) -> TimerOp {
        self.next_token += 1;
        let token = TimerToken(self.next_token);
        self.pending = Some(PendingTimer { token, kind });
        TimerOp::Schedule(TimerRequest { token, kind, delay })
    }

    /// Back to idle: empty buffer, no pending timer.
    fn reset_buffer(&mut self) -> TimerOp {
        self.buffer.clear();
        if self.pending.take().is_some() {
            TimerOp::Cancel
        } else {
            TimerOp::Keep
        }
    }

    /// Keep the active row inside the window, moving the window only when
    /// the cursor would otherwise leave it.
    fn ensure_visible(&mut self) {
        if self.items.is_empty() {
            self.scroll = 0;
            return;
        }
        if self.active < self.scroll {
            self.scroll = self.active;
        } else if self.active >= self.scroll + self.window {
            let max_scroll = self.items.len().saturating_sub(self.window);
            self.scroll = (self.active + 1 - self.window).min(max_scroll);
        }
    }

    #[cfg(test)]
    fn scroll_offset(&self) -> usize {
        self.scroll
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(n: usize) -> SelectList<usize> {
        SelectList::new(
            (0..n)
                .map(|i| SelectItem::new(format!("item {}", i + 1), i))
                .collect(),
        )
    }

    fn token_of(op: TimerOp) -> TimerToken {
        match op {
            TimerOp::Schedule(req) => req.token,
            _ => panic!("expected Schedule, got {op:?}"),
        }
    }

    #[test]
    fn empty_list_is_inert() {
        let mut l = list(0);
        for key in [
            SelectKey::Up,
            SelectKey::Down,
            SelectKey::Confirm,
            SelectKey::Digit(3),
        ] {
            assert_eq!(l.handle_key(key), SelectOutcome::default());
        }
        assert_eq!(l.active_index(), None);
        assert!(l.visible_slice().is_empty());
    }

    #[test]
    fn wrap_navigation_both_directions() {
        let mut l = list(3);
        let out = l.handle_key(SelectKey::Up);
        assert_eq!(out.highlight, Some(2)); // wraps to bottom
        let out = l.handle_key(SelectKey::Down);
        assert_eq!(out.highlight, Some(0)); // wraps back to top
    }

    #[test]
    fn single_item_navigation_is_silent() {
        // Up/Down wrap 0 -> 0; an unchanged index must not re-highlight.
        let mut l = list(1);
        assert_eq!(l.handle_key(SelectKey::Up), SelectOutcome::default());
        assert_eq!(l.handle_key(SelectKey::Down), SelectOutcome::default());
        assert_eq!(l.active_index(), Some(0));
        // Navigation still clears an in-flight digit buffer.
        l.handle_key(SelectKey::Digit(1));
        let out = l.handle_key(SelectKey::Down);
        assert_eq!(out.highlight, None);
        assert_eq!(out.timer, TimerOp::Cancel);
        assert_eq!(l.buffer(), "");
    }

    #[test]
    fn nav_sequence_matches_modular_arithmetic() {
        // activeIndex == (initial + downs - ups) mod len
        let mut l = list(7).with_initial_index(3);
        let (downs, ups) = (11usize, 4usize);
        for _ in 0..downs {
            l.handle_key(SelectKey::Down);
        }
        for _ in 0..ups {
            l.handle_key(SelectKey::Up);
        }
        assert_eq!(l.active_index(), Some((3 + downs - ups) % 7));
    }

    #[test]
    fn initial_index_clamped() {
        let l = list(5).with_initial_index(99);
        assert_eq!(l.active_index(), Some(4));
    }

    #[test]
    fn window_invariant_holds_under_navigation() {
        let mut l = list(25).with_window(10);
        let keys = [
            SelectKey::Down,
            SelectKey::Down,
            SelectKey::Up,
            SelectKey::Down,
        ];
        for _ in 0..40 {
            for key in keys {
                l.handle_key(key);
                let active = l.active_index().unwrap();
                let scroll = l.scroll_offset();
                assert!(scroll <= active && active < scroll + 10);
                assert!(scroll <= 25 - 10);
            }
        }
    }

    #[test]
    fn scrolling_down_reveals_active_at_bottom() {
        let mut l = list(25).with_window(10);
        for _ in 0..10 {
            l.handle_key(SelectKey::Down);
        }
        // active 10, window shows rows 1..=10
        assert_eq!(l.active_index(), Some(10));
        assert_eq!(l.scroll_offset(), 1);
        let rows = l.visible_slice();
        assert_eq!(rows.last().unwrap().index, 10);
        assert!(rows.last().unwrap().is_active);
    }

    #[test]
    fn scrolling_up_reveals_active_at_top() {
        let mut l = list(25).with_window(10).with_initial_index(20);
        for _ in 0..10 {
            l.handle_key(SelectKey::Up);
        }
        assert_eq!(l.active_index(), Some(10));
        assert_eq!(l.scroll_offset(), 10);
        assert!(l.visible_slice()[0].is_active);
    }

    #[test]
    fn wrap_to_bottom_clamps_scroll() {
        let mut l = list(25).with_window(10);
        l.handle_key(SelectKey::Up); // wraps to 24
        assert_eq!(l.active_index(), Some(24));
        // window must not extend past the end of the list
        assert_eq!(l.scroll_offset(), 15);
    }

    #[test]
    fn confirm_selects_active() {
        let mut l = list(5).with_initial_index(2);
        let out = l.handle_key(SelectKey::Confirm);
        assert_eq!(out.select, Some(2));
        assert_eq!(out.highlight, None);
        assert_eq!(l.value(2), Some(&2));
    }

    #[test]
    fn two_digit_jump_then_commit() {
        // "1" then "5" on a 20-item list lands on index 14, commit fires once.
        let mut l = list(20);
        let out = l.handle_key(SelectKey::Digit(1));
        assert_eq!(out.highlight, Some(0)); // prefix "1" is valid
        let out = l.handle_key(SelectKey::Digit(5));
        assert_eq!(out.highlight, Some(14));
        let token = token_of(out.timer);

        let fired = l.on_timer(token);
        assert_eq!(fired.select, Some(14));
        assert_eq!(l.buffer(), "");
        // A second fire of the same token is stale.
        assert_eq!(l.on_timer(token), SelectOutcome::default());
    }

    #[test]
    fn second_digit_supersedes_first_commit_timer() {
        let mut l = list(20);
        let first = token_of(l.handle_key(SelectKey::Digit(1)).timer);
        let second = token_of(l.handle_key(SelectKey::Digit(5)).timer);
        assert_ne!(first, second);
        // The superseded timer firing late must do nothing.
        assert_eq!(l.on_timer(first), SelectOutcome::default());
        assert_eq!(l.active_index(), Some(14));
    }

    #[test]
    fn out_of_range_digit_schedules_reset() {
        // "9" on a 5-item list: cursor stays, buffer resets after the delay.
        let mut l = list(5).with_initial_index(1);
        let out = l.handle_key(SelectKey::Digit(9));
        assert_eq!(out.highlight, None);
        assert_eq!(out.select, None);
        let req = match out.timer {
            TimerOp::Schedule(req) => req,
            other => panic!("expected Schedule, got {other:?}"),
        };
        assert_eq!(req.kind, TimerKind::Reset);
        assert_eq!(req.delay, RESET_DELAY);
        assert_eq!(l.active_index(), Some(1));
        assert_eq!(l.buffer(), "9");

        let fired = l.on_timer(req.token);
        assert_eq!(fired.select, None);
        assert_eq!(l.buffer(), "");
        assert_eq!(l.active_index(), Some(1));
    }

    #[test]
    fn valid_prefix_then_out_of_range_full_number() {
        // "1" is row 1 on a 9-item list, but "10" is out of range: the second
        // digit re-evaluates the full buffer and switches to the reset path.
        let mut l = list(9);
        let out = l.handle_key(SelectKey::Digit(1));
        assert_eq!(out.highlight, Some(0));
        let out = l.handle_key(SelectKey::Digit(0));
        assert_eq!(out.highlight, None);
        let req = match out.timer {
            TimerOp::Schedule(req) => req,
            other => panic!("expected Schedule, got {other:?}"),
        };
        assert_eq!(req.kind, TimerKind::Reset);
        // Cursor kept the position the valid prefix gave it.
        assert_eq!(l.active_index(), Some(0));
        assert_eq!(l.buffer(), "10");
    }

    #[test]
    fn digit_zero_alone_is_out_of_range() {
        let mut l = list(5);
        let out = l.handle_key(SelectKey::Digit(0));
        assert_eq!(out.highlight, None);
        assert!(matches!(
            out.timer,
            TimerOp::Schedule(TimerRequest {
                kind: TimerKind::Reset,
                ..
            })
        ));
    }

    #[test]
    fn navigation_cancels_pending_commit() {
        let mut l = list(20);
        let token = token_of(l.handle_key(SelectKey::Digit(3)).timer);
        assert_eq!(l.active_index(), Some(2));

        let out = l.handle_key(SelectKey::Down);
        assert_eq!(out.timer, TimerOp::Cancel);
        // Buffer reset first, then one step from the digit-targeted row.
        assert_eq!(out.highlight, Some(3));
        assert_eq!(out.select, None);
        assert_eq!(l.buffer(), "");
        // Even if the host failed to abort the task, the fire is stale.
        assert_eq!(l.on_timer(token), SelectOutcome::default());
    }

    #[test]
    fn confirm_resets_pending_buffer() {
        let mut l = list(20);
        let token = token_of(l.handle_key(SelectKey::Digit(7)).timer);
        let out = l.handle_key(SelectKey::Confirm);
        assert_eq!(out.select, Some(6));
        assert_eq!(out.timer, TimerOp::Cancel);
        assert_eq!(l.on_timer(token), SelectOutcome::default());
    }

    #[test]
    fn deactivate_cancels_pending_timer() {
        let mut l = list(20);
        let token = token_of(l.handle_key(SelectKey::Digit(4)).timer);
        assert_eq!(l.deactivate(), TimerOp::Cancel);
        assert_eq!(l.buffer(), "");
        // No further highlight/select after teardown.
        assert_eq!(l.on_timer(token), SelectOutcome::default());
        // Idle deactivate has nothing to cancel.
        assert_eq!(l.deactivate(), TimerOp::Keep);
    }

    #[test]
    fn commit_delay_is_shorter_than_reset_delay() {
        let mut l = list(20);
        let out = l.handle_key(SelectKey::Digit(5));
        match out.timer {
            TimerOp::Schedule(req) => {
                assert_eq!(req.kind, TimerKind::Commit);
                assert_eq!(req.delay, COMMIT_DELAY);
            }
            other => panic!("expected Schedule, got {other:?}"),
        }
        assert!(COMMIT_DELAY < RESET_DELAY);
    }

    #[test]
    fn visible_slice_length_and_order() {
        let l = list(4).with_window(10);
        let rows = l.visible_slice();
        assert_eq!(rows.len(), 4); // min(window, len)
        assert_eq!(rows[0].index, 0);
        assert_eq!(rows[3].index, 3);

        let l = list(30).with_window(10);
        assert_eq!(l.visible_slice().len(), 10);
    }

    #[test]
    fn index_width_matches_digit_count() {
        assert_eq!(list(9).index_width(), 1);
        assert_eq!(list(10).index_width(), 2);
        assert_eq!(list(100).index_width(), 3);
    }

    #[test]
    fn arrows_gated_by_flag() {
        let mut l = list(30).with_window(10);
        for _ in 0..15 {
            l.handle_key(SelectKey::Down);
        }
        // Mid-list, but flag off: both false regardless of position.
        assert!(!l.can_scroll_up());
        assert!(!l.can_scroll_down());

        let mut l = list(30).with_window(10).with_scroll_arrows(true);
        assert!(!l.can_scroll_up());
        assert!(l.can_scroll_down());
        for _ in 0..15 {
            l.handle_key(SelectKey::Down);
        }
        assert!(l.can_scroll_up());
        assert!(l.can_scroll_down());
    }

    #[test]
    fn disabled_rows_stay_navigable_and_selectable() {
        // Pins current behavior: disabled is cosmetic only.
        let mut l = SelectList::new(vec![
            SelectItem::new("a", 'a'),
            SelectItem::new("b", 'b').with_disabled(true),
            SelectItem::new("c", 'c'),
        ]);
        l.handle_key(SelectKey::Down);
        assert_eq!(l.active_index(), Some(1)); // not skipped
        let out = l.handle_key(SelectKey::Confirm);
        assert_eq!(out.select, Some(1)); // not rejected
    }

    #[test]
    fn display_label_prefers_two_part_form() {
        let plain: SelectItem<()> = SelectItem::new("plain", ());
        assert_eq!(plain.display_label(), "plain");
        let two_part: SelectItem<()> =
            SelectItem::new("ignored", ()).with_display("build", "(running)");
        assert_eq!(two_part.display_label(), "build (running)");
        // One part alone is not enough to switch forms.
        let mut half: SelectItem<()> = SelectItem::new("fallback", ());
        half.name_display = Some("only-name".into());
        assert_eq!(half.display_label(), "fallback");
    }

    #[test]
    fn unmapped_keys_have_no_effect() {
        let mut l = list(5).with_initial_index(2);
        let before = l.active_index();
        assert_eq!(l.handle_key(SelectKey::Other), SelectOutcome::default());
        assert_eq!(l.active_index(), before);
        assert_eq!(l.buffer(), "");
    }
}
