//! A headless slider for picking a value, or a pair of values, in a range.
//!
//! ## Usage
//!
//! The host owns the value. Each render it builds a [`SliderArgs`] from its
//! current value, calls [`SliderState::sync`], and routes pointer, keyboard
//! and text-field events into the state. New values come back through the
//! `on_change` callback.
//!
//! ```
//! use std::time::Duration;
//!
//! use glissade_components::slider::{SliderArgs, SliderState};
//! use glissade_ui::Instant;
//!
//! let args = SliderArgs::scalar(20.0, |value| println!("slider moved to {value}"))
//!     .min(0.0)
//!     .max(100.0)
//!     .step(5.0)
//!     .unit("%");
//! let mut state = SliderState::new();
//! state.sync(&args).expect("valid slider configuration");
//!
//! let start = Instant::now();
//! state.pointer_down(&args);
//! state.drag(&args, 42.0, start);
//! state.tick(&args, start + Duration::from_millis(100)); // still debouncing
//! state.pointer_up(&args); // prints "slider moved to 42"
//! assert_eq!(args.display_text(42.0), "42%");
//! ```
use std::{sync::Arc, time::Duration};

use derive_setters::Setters;
use glissade_ui::{Callback, CallbackWith, Dp, Instant, KeyEvent, NamedKey, Px};
use smallvec::SmallVec;
use tracing::trace;

use marks::{GeometrySnapshot, MarkLayout, MarkLayoutCache, MarkSet, MeasureLabel, fraction_at};
use value::{clamp, format_value, normalize, percent, validate_bounds};

pub use controller::{Debouncer, KeyOutcome, ValueController, apply_keyboard_delta};
pub use error::SliderError;
pub use input::EditBuffer;
pub use transition::{ThumbTransition, transition_duration};

mod controller;
mod error;
mod input;
pub mod marks;
mod transition;
pub mod value;

/// Thumb values of a range slider, by thumb index.
pub type RangeValue = SmallVec<[f64; 2]>;

/// Defaults and tuning constants for [`slider`](self) components.
pub struct SliderDefaults;

impl SliderDefaults {
    /// Quiet window for debounced drag and text input.
    pub const DEBOUNCE: Duration = Duration::from_millis(250);
    /// Arrow keys move this many steps while shift is held.
    pub const SHIFT_MULTIPLIER: f64 = 10.0;
    /// Minimum gap between neighbouring mark labels.
    pub const MARK_SPACING: Px = Px(16);
    /// Transition time for a jump across the whole track.
    pub const TRANSITION_SCALE: Duration = Duration::from_millis(300);
    /// Shortest non-zero transition.
    pub const TRANSITION_FLOOR: Duration = Duration::from_millis(100);
    /// Character cell of the numeric field in compact layouts.
    pub const COMPACT_CHAR_WIDTH: Dp = Dp(8.0);
    /// Character cell of the numeric field in wide layouts.
    pub const WIDE_CHAR_WIDTH: Dp = Dp(10.0);
    /// Containers at least this wide use [`Self::WIDE_CHAR_WIDTH`].
    pub const WIDE_LAYOUT_BREAKPOINT: Dp = Dp(640.0);
}

/// Track direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SliderOrientation {
    /// Left to right. Marks are laid out.
    #[default]
    Horizontal,
    /// Bottom to top. Marks are not laid out.
    Vertical,
}

/// Single value or multi-thumb range, with the matching change handler.
#[derive(Debug, Clone, PartialEq)]
pub enum SliderMode {
    /// One thumb.
    Scalar {
        /// Committed value.
        value: f64,
        /// Receives new values.
        on_change: CallbackWith<f64>,
    },
    /// Two or more thumbs.
    Range {
        /// Committed values, by thumb index.
        value: RangeValue,
        /// Receives new values, by thumb index.
        on_change: CallbackWith<RangeValue>,
    },
}

/// Arguments for one render of a slider.
#[derive(Debug, Clone, PartialEq, Setters)]
pub struct SliderArgs {
    /// Lower bound.
    pub min: f64,
    /// Upper bound. Must be above `min`.
    pub max: f64,
    /// Granularity and display precision. Must be positive.
    pub step: f64,
    /// Value and change handler.
    #[setters(skip)]
    pub mode: SliderMode,
    /// Suffix shown after the value, scalar mode only.
    #[setters(strip_option, into)]
    pub unit: Option<String>,
    /// Prefix shown before the value, scalar mode only.
    #[setters(strip_option, into)]
    pub prefix_unit: Option<String>,
    /// Value the reset affordance restores.
    #[setters(strip_option)]
    pub reset_value: Option<f64>,
    /// Labelled ticks under the track.
    #[setters(skip)]
    pub marks: Option<Arc<MarkSet>>,
    /// Track direction.
    pub orientation: SliderOrientation,
    /// Disable interaction.
    pub disabled: bool,
    /// Minimum thumb separation in steps, range mode only. Passed through to
    /// the host's drag primitive.
    pub min_steps_between_thumbs: u32,
    /// Quiet window for the debounced change path.
    pub debounce: Duration,
    /// Called when the numeric field gains focus.
    #[setters(skip)]
    pub on_focus: Callback,
    /// Called when the numeric field loses focus.
    #[setters(skip)]
    pub on_blur: Callback,
}

impl Default for SliderArgs {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 100.0,
            step: 1.0,
            mode: SliderMode::Scalar {
                value: 0.0,
                on_change: CallbackWith::default(),
            },
            unit: None,
            prefix_unit: None,
            reset_value: None,
            marks: None,
            orientation: SliderOrientation::default(),
            disabled: false,
            min_steps_between_thumbs: 0,
            debounce: SliderDefaults::DEBOUNCE,
            on_focus: Callback::default(),
            on_blur: Callback::default(),
        }
    }
}

impl SliderArgs {
    /// Single-thumb slider args.
    pub fn scalar<F>(value: f64, on_change: F) -> Self
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        Self {
            mode: SliderMode::Scalar {
                value,
                on_change: CallbackWith::new(on_change),
            },
            ..Self::default()
        }
    }

    /// Multi-thumb slider args.
    pub fn range<F>(value: impl Into<RangeValue>, on_change: F) -> Self
    where
        F: Fn(RangeValue) + Send + Sync + 'static,
    {
        Self {
            mode: SliderMode::Range {
                value: value.into(),
                on_change: CallbackWith::new(on_change),
            },
            ..Self::default()
        }
    }

    /// Replaces the committed scalar value, keeping the handler. No effect
    /// in range mode.
    pub fn value(mut self, next: f64) -> Self {
        if let SliderMode::Scalar { value, .. } = &mut self.mode {
            *value = next;
        }
        self
    }

    /// Replaces the committed range, keeping the handler. No effect in
    /// scalar mode.
    pub fn range_value(mut self, next: impl Into<RangeValue>) -> Self {
        if let SliderMode::Range { value, .. } = &mut self.mode {
            *value = next.into();
        }
        self
    }

    /// Sets the marks.
    pub fn marks(mut self, marks: MarkSet) -> Self {
        self.marks = Some(Arc::new(marks));
        self
    }

    /// Sets marks shared with other renders. Layout is cached per `Arc`.
    pub fn marks_shared(mut self, marks: Arc<MarkSet>) -> Self {
        self.marks = Some(marks);
        self
    }

    /// Sets the focus handler.
    pub fn on_focus<F>(mut self, on_focus: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_focus = Callback::new(on_focus);
        self
    }

    /// Sets the blur handler.
    pub fn on_blur<F>(mut self, on_blur: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_blur = Callback::new(on_blur);
        self
    }

    /// Returns `true` in range mode.
    pub fn is_range(&self) -> bool {
        matches!(self.mode, SliderMode::Range { .. })
    }

    /// The committed scalar value, or `None` in range mode.
    pub fn scalar_value(&self) -> Option<f64> {
        match self.mode {
            SliderMode::Scalar { value, .. } => Some(value),
            SliderMode::Range { .. } => None,
        }
    }

    /// Position of `value` on the track, in `[0, 1]`.
    pub fn percent_of(&self, value: f64) -> f64 {
        percent(value, self.min, self.max)
    }

    /// `value` formatted to the step's precision with prefix and unit.
    pub fn display_text(&self, value: f64) -> String {
        format!(
            "{}{}{}",
            self.prefix_unit.as_deref().unwrap_or_default(),
            format_value(value, self.step),
            self.unit.as_deref().unwrap_or_default()
        )
    }

    /// Checks range, step and marks.
    ///
    /// # Errors
    ///
    /// Returns the first [`SliderError`] found.
    pub fn validate(&self) -> Result<(), SliderError> {
        validate_bounds(self.min, self.max, self.step)?;
        if let Some(marks) = &self.marks {
            marks.validate_range(self.min, self.max)?;
        }
        Ok(())
    }
}

/// Interaction state kept across renders of one slider.
///
/// Holds only presentation state: the in-flight drag value, the numeric
/// field's edit buffer, the cached mark layout and the last thumb position.
#[derive(Debug, Default)]
pub struct SliderState {
    controller: ValueController,
    edit: EditBuffer,
    marks: MarkLayoutCache,
    transition: ThumbTransition,
}

impl SliderState {
    /// Creates fresh state for a newly mounted slider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconciles with this render's args.
    ///
    /// Clamps and re-propagates the value once if the bounds moved past it,
    /// and refreshes the numeric field when it is not being edited.
    ///
    /// # Errors
    ///
    /// Returns a [`SliderError`] for an invalid range, step or mark set.
    pub fn sync(&mut self, args: &SliderArgs) -> Result<(), SliderError> {
        args.validate()?;
        self.controller.reconcile_bounds(args);
        if let Some(value) = args.scalar_value() {
            self.edit
                .sync_external(clamp(value, args.min, args.max), args.step);
        }
        Ok(())
    }

    /// Whether the pointer is down.
    pub fn is_dragging(&self) -> bool {
        self.controller.is_dragging()
    }

    /// Value waiting in the debounce window.
    pub fn pending(&self) -> Option<f64> {
        self.controller.pending()
    }

    /// When the pending value is due; hosts can schedule a frame for it.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.controller.deadline()
    }

    /// Where the scalar thumb should be drawn. `None` in range mode.
    pub fn display_value(&self, args: &SliderArgs) -> Option<f64> {
        self.controller.display_value(args)
    }

    /// Pointer pressed on the thumb or track.
    pub fn pointer_down(&mut self, args: &SliderArgs) {
        self.controller.pointer_down(args);
    }

    /// Scalar value reported by the drag primitive.
    pub fn drag(&mut self, args: &SliderArgs, value: f64, now: Instant) {
        self.controller.drag(args, value, now);
    }

    /// Scalar drag from a pointer `x` offset relative to the track.
    ///
    /// Ignored until the track has been laid out.
    pub fn drag_at(&mut self, args: &SliderArgs, x: Px, geometry: GeometrySnapshot, now: Instant) {
        let Some(fraction) = fraction_at(x, geometry) else {
            trace!("Track too narrow for pointer mapping, ignoring drag");
            return;
        };
        let value = args.min + f64::from(fraction) * (args.max - args.min);
        self.controller.drag(args, value, now);
    }

    /// Pointer released.
    pub fn pointer_up(&mut self, args: &SliderArgs) {
        self.controller.pointer_up(args);
    }

    /// Range values reported by the drag primitive.
    pub fn range_change(&mut self, args: &SliderArgs, values: impl Into<RangeValue>) {
        self.controller.forward_range(args, values.into());
    }

    /// Emits a due debounced value. Call once per frame.
    pub fn tick(&mut self, args: &SliderArgs, now: Instant) {
        self.controller.tick(args, now);
    }

    /// Keyboard input for a scalar slider or its numeric field.
    ///
    /// Range sliders leave keys to the drag primitive.
    pub fn key(&mut self, args: &SliderArgs, event: &KeyEvent) -> KeyOutcome {
        if args.is_range() || args.disabled {
            return KeyOutcome::Ignored;
        }
        if self.edit.is_focused() && matches!(event.key, NamedKey::Enter | NamedKey::Escape) {
            self.input_blur(args);
            return KeyOutcome::Release;
        }
        let outcome = self
            .controller
            .key(args, &event.key, event.modifiers.shift);
        if let KeyOutcome::Step(value) = outcome
            && self.edit.is_focused()
        {
            self.edit.show(value, args.step);
        }
        outcome
    }

    /// Current numeric field text.
    pub fn input_text(&self) -> &str {
        self.edit.text()
    }

    /// Whether the numeric field has focus.
    pub fn input_focused(&self) -> bool {
        self.edit.is_focused()
    }

    /// Width the numeric field should take in a container this wide.
    pub fn input_width(&self, container_width: Px) -> Px {
        self.edit.width(container_width)
    }

    /// Numeric field gained focus.
    pub fn input_focus(&mut self, args: &SliderArgs) {
        if args.disabled || args.is_range() {
            return;
        }
        self.edit.focus();
        args.on_focus.call();
    }

    /// Numeric field text changed.
    pub fn input_change(&mut self, args: &SliderArgs, raw: &str, now: Instant) {
        if args.disabled || args.is_range() {
            return;
        }
        let value = self.edit.input(raw, args.min, args.max, args.step);
        self.controller.propagate_debounced(args, value, now);
    }

    /// Numeric field lost focus: commit without debouncing.
    pub fn input_blur(&mut self, args: &SliderArgs) {
        if args.disabled || args.is_range() || !self.edit.is_focused() {
            return;
        }
        let value = self.edit.blur(args.min, args.max, args.step);
        self.controller.commit(args, value);
        args.on_blur.call();
    }

    /// Whether a reset affordance should be shown.
    pub fn shows_reset(&self, args: &SliderArgs) -> bool {
        match (args.reset_value, self.display_value(args)) {
            (Some(reset), Some(current)) => {
                normalize(reset, args.min, args.max, args.step)
                    != normalize(current, args.min, args.max, args.step)
            }
            _ => false,
        }
    }

    /// Restores the reset value immediately.
    pub fn reset(&mut self, args: &SliderArgs) {
        if args.disabled {
            return;
        }
        if let Some(reset) = args.reset_value {
            self.controller.commit(args, reset);
        }
    }

    /// Lays out mark labels for the current geometry.
    ///
    /// Pass `None` while the track or thumb has not been measured; the
    /// previous layout is kept. Vertical sliders always get an empty layout.
    pub fn layout_marks<M>(
        &mut self,
        args: &SliderArgs,
        geometry: Option<GeometrySnapshot>,
        measure: &M,
    ) -> &MarkLayout
    where
        M: MeasureLabel + ?Sized,
    {
        if args.orientation == SliderOrientation::Vertical {
            self.marks.clear();
            return self.marks.layout();
        }
        self.marks.update(
            args.marks.as_ref(),
            args.min,
            args.max,
            geometry,
            measure,
            SliderDefaults::MARK_SPACING,
        )
    }

    /// The most recent mark layout.
    pub fn mark_layout(&self) -> &MarkLayout {
        self.marks.layout()
    }

    /// Forces the next mark layout pass, e.g. after label fonts load.
    pub fn invalidate_marks(&mut self) {
        self.marks.invalidate();
    }

    /// How long the thumb should take to reach its current position.
    ///
    /// Call once per render.
    pub fn transition_duration(&mut self, args: &SliderArgs) -> Duration {
        let position = match &args.mode {
            SliderMode::Scalar { .. } => self.display_value(args).unwrap_or(args.min),
            SliderMode::Range { value, .. } => value.first().copied().unwrap_or(args.min),
        };
        self.transition.duration(
            args.percent_of(position),
            self.controller.is_dragging(),
            args.is_range(),
        )
    }

    /// Drops all in-flight state. Call when the slider is removed.
    pub fn unmount(&mut self) {
        self.controller.reset();
        self.edit.reset();
        self.marks.clear();
        self.transition.reset();
    }
}
