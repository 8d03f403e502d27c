//! Value controller: turns gestures into committed values.
//!
//! # State Machine
//!
//! ```text
//!            push(v)                 push(v') (deadline moves)
//!  ┌──────┐ ───────▶ ┌──────────────┐ ─────┐
//!  │ Idle │          │ Pending(v,t) │ ◀────┘
//!  └──────┘ ◀─────── └──────────────┘
//!      ▲   poll(now ≥ t) → emit v
//!      └── flush() → emit v now, cancel() → drop v
//! ```
//!
//! Time is passed in by the caller. A host calls [`ValueController::tick`]
//! from its frame loop; tests drive it with synthetic instants.
use std::{mem, time::Duration};

use glissade_ui::{Instant, NamedKey};
use tracing::{debug, trace};

use super::{
    RangeValue, SliderArgs, SliderDefaults, SliderMode,
    value::{clamp, normalize},
};

#[derive(Debug, Clone, PartialEq)]
enum DebounceState<T> {
    Idle,
    Pending { value: T, deadline: Instant },
}

/// Trailing debouncer with an explicit flush.
///
/// Every [`push`](Debouncer::push) replaces the pending value and moves the
/// deadline to `now + window`. The value is released either by
/// [`poll`](Debouncer::poll) once the deadline passes or immediately by
/// [`flush`](Debouncer::flush).
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    window: Duration,
    state: DebounceState<T>,
}

impl<T> Debouncer<T> {
    /// Creates an idle debouncer with the given quiet window.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            state: DebounceState::Idle,
        }
    }

    /// The quiet window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Changes the quiet window. A pending deadline is left as scheduled.
    pub fn set_window(&mut self, window: Duration) {
        self.window = window;
    }

    /// Schedules `value`, replacing anything pending.
    pub fn push(&mut self, value: T, now: Instant) {
        self.state = DebounceState::Pending {
            value,
            deadline: now + self.window,
        };
    }

    /// Releases the pending value if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = matches!(self.state, DebounceState::Pending { deadline, .. } if now >= deadline);
        if due { self.flush() } else { None }
    }

    /// Releases the pending value now, regardless of its deadline.
    pub fn flush(&mut self) -> Option<T> {
        match mem::replace(&mut self.state, DebounceState::Idle) {
            DebounceState::Pending { value, .. } => Some(value),
            DebounceState::Idle => None,
        }
    }

    /// Drops the pending value. Returns `true` if something was dropped.
    pub fn cancel(&mut self) -> bool {
        matches!(
            mem::replace(&mut self.state, DebounceState::Idle),
            DebounceState::Pending { .. }
        )
    }

    /// Returns `true` while a value is waiting.
    pub fn is_pending(&self) -> bool {
        matches!(self.state, DebounceState::Pending { .. })
    }

    /// The pending value, if any.
    pub fn pending(&self) -> Option<&T> {
        match &self.state {
            DebounceState::Pending { value, .. } => Some(value),
            DebounceState::Idle => None,
        }
    }

    /// When the pending value will be released by [`poll`](Debouncer::poll).
    pub fn deadline(&self) -> Option<Instant> {
        match &self.state {
            DebounceState::Pending { deadline, .. } => Some(*deadline),
            DebounceState::Idle => None,
        }
    }
}

/// Result of feeding a key press to the slider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyOutcome {
    /// The key moved the value to this committed value.
    Step(f64),
    /// Enter or Escape: pending input was committed and the host should
    /// release focus.
    Release,
    /// The key does not apply to the slider.
    Ignored,
}

/// Maps a key press to the next value.
///
/// Home and End jump to the bounds. Arrow keys move by `step`, or by ten
/// steps while shift is held. The result is clamped and snapped.
pub fn apply_keyboard_delta(
    current: f64,
    key: &NamedKey,
    shift: bool,
    min: f64,
    max: f64,
    step: f64,
) -> KeyOutcome {
    let stride = if shift {
        step * SliderDefaults::SHIFT_MULTIPLIER
    } else {
        step
    };
    let next = match key {
        NamedKey::Home => min,
        NamedKey::End => max,
        NamedKey::ArrowUp | NamedKey::ArrowRight => current + stride,
        NamedKey::ArrowDown | NamedKey::ArrowLeft => current - stride,
        NamedKey::Enter | NamedKey::Escape => return KeyOutcome::Release,
        _ => return KeyOutcome::Ignored,
    };
    KeyOutcome::Step(normalize(next, min, max, step))
}

/// Owns drag state and the debounced change path for one slider.
///
/// The committed value itself always comes from the args of the current
/// render; the controller only holds what is in flight.
#[derive(Debug)]
pub struct ValueController {
    debouncer: Debouncer<f64>,
    dragging: bool,
    bounds: Option<(f64, f64)>,
}

impl Default for ValueController {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueController {
    /// Creates a controller with the default debounce window.
    pub fn new() -> Self {
        Self {
            debouncer: Debouncer::new(SliderDefaults::DEBOUNCE),
            dragging: false,
            bounds: None,
        }
    }

    /// Whether the pointer is currently down on the thumb or track.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// The value waiting in the debounce window, if any.
    pub fn pending(&self) -> Option<f64> {
        self.debouncer.pending().copied()
    }

    /// When the pending value is due.
    pub fn deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Value the thumb should show: the in-flight value while one is
    /// pending, otherwise the clamped committed value.
    pub fn display_value(&self, args: &SliderArgs) -> Option<f64> {
        match &args.mode {
            SliderMode::Scalar { value, .. } => Some(
                self.pending()
                    .unwrap_or_else(|| clamp(*value, args.min, args.max)),
            ),
            SliderMode::Range { .. } => None,
        }
    }

    /// Pointer pressed.
    pub fn pointer_down(&mut self, args: &SliderArgs) {
        if self.disable_if_needed(args) {
            return;
        }
        self.dragging = true;
    }

    /// A continuous scalar value from the drag primitive.
    ///
    /// While the pointer is down the value goes through the debounce window;
    /// otherwise it commits at once.
    pub fn drag(&mut self, args: &SliderArgs, raw: f64, now: Instant) {
        if self.disable_if_needed(args) {
            return;
        }
        let next = normalize(raw, args.min, args.max, args.step);
        if self.dragging {
            self.propagate_debounced(args, next, now);
        } else {
            self.commit(args, next);
        }
    }

    /// Pointer released: flush whatever the drag left pending.
    pub fn pointer_up(&mut self, args: &SliderArgs) {
        self.dragging = false;
        if self.disable_if_needed(args) {
            return;
        }
        if let Some(value) = self.debouncer.flush() {
            trace!("Flushing debounced slider value {value} on release");
            emit_scalar(args, value);
        }
    }

    /// Range-mode change event. Forwarded unchanged and undebounced.
    ///
    /// Thumb order and collisions are the drag primitive's business, so the
    /// values are neither sorted nor checked here.
    pub fn forward_range(&mut self, args: &SliderArgs, values: RangeValue) {
        if self.disable_if_needed(args) {
            return;
        }
        if let SliderMode::Range { on_change, .. } = &args.mode {
            on_change.call(values);
        }
    }

    /// Schedules a scalar value on the debounced path. Scalar mode only.
    pub fn propagate_debounced(&mut self, args: &SliderArgs, value: f64, now: Instant) {
        if !matches!(args.mode, SliderMode::Scalar { .. }) {
            return;
        }
        self.debouncer.set_window(args.debounce);
        self.debouncer.push(value, now);
    }

    /// Emits a due debounced value. Call once per frame.
    pub fn tick(&mut self, args: &SliderArgs, now: Instant) {
        if self.disable_if_needed(args) {
            return;
        }
        if let Some(value) = self.debouncer.poll(now) {
            trace!("Debounce window elapsed, emitting {value}");
            emit_scalar(args, value);
        }
    }

    /// Commits a scalar value immediately, cancelling anything pending.
    ///
    /// Nothing is emitted if the value equals the committed one.
    pub fn commit(&mut self, args: &SliderArgs, value: f64) {
        self.debouncer.cancel();
        if let SliderMode::Scalar {
            value: current,
            on_change,
        } = &args.mode
        {
            let next = normalize(value, args.min, args.max, args.step);
            if (next - current).abs() > f64::EPSILON || current.is_nan() {
                on_change.call(next);
            }
        }
    }

    /// Flushes a pending value immediately, if there is one.
    pub fn flush(&mut self, args: &SliderArgs) {
        if let Some(value) = self.debouncer.flush() {
            emit_scalar(args, value);
        }
    }

    /// Keyboard stepping for scalar sliders.
    pub fn key(&mut self, args: &SliderArgs, key: &NamedKey, shift: bool) -> KeyOutcome {
        if self.disable_if_needed(args) {
            return KeyOutcome::Ignored;
        }
        let Some(current) = self.display_value(args) else {
            return KeyOutcome::Ignored;
        };
        let outcome = apply_keyboard_delta(current, key, shift, args.min, args.max, args.step);
        match outcome {
            KeyOutcome::Step(next) => self.commit(args, next),
            KeyOutcome::Release => self.flush(args),
            KeyOutcome::Ignored => {}
        }
        outcome
    }

    /// Re-propagates a clamped value once after the bounds change.
    ///
    /// Runs only when `(min, max)` differs from the last call, so a caller
    /// that ignores the correction is not notified again every render.
    pub fn reconcile_bounds(&mut self, args: &SliderArgs) {
        let bounds = (args.min, args.max);
        if self.bounds == Some(bounds) {
            return;
        }
        self.bounds = Some(bounds);

        match &args.mode {
            SliderMode::Scalar { value, on_change } => {
                let clamped = clamp(*value, args.min, args.max);
                if clamped != *value {
                    debug!(
                        "Slider value {value} outside [{}, {}], correcting to {clamped}",
                        args.min, args.max
                    );
                    self.debouncer.cancel();
                    on_change.call(clamped);
                }
            }
            SliderMode::Range { value, on_change } => {
                let clamped: RangeValue = value
                    .iter()
                    .map(|v| clamp(*v, args.min, args.max))
                    .collect();
                if clamped != *value {
                    debug!(
                        "Range {value:?} outside [{}, {}], correcting to {clamped:?}",
                        args.min, args.max
                    );
                    on_change.call(clamped);
                }
            }
        }
    }

    /// Drops anything in flight.
    pub fn reset(&mut self) {
        self.debouncer.cancel();
        self.dragging = false;
        self.bounds = None;
    }

    fn disable_if_needed(&mut self, args: &SliderArgs) -> bool {
        if args.disabled {
            self.dragging = false;
            self.debouncer.cancel();
        }
        args.disabled
    }
}

fn emit_scalar(args: &SliderArgs, value: f64) {
    if let SliderMode::Scalar { on_change, .. } = &args.mode {
        on_change.call(value);
    }
}
