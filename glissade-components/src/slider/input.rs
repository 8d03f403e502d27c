//! Text field bound to a scalar slider.
//!
//! The field shows the committed value until it gains focus. While focused,
//! the text is whatever the user typed (minus non-numeric characters) so the
//! caret never jumps; the parsed number still flows to the slider through
//! the debounced path. Blur parses, snaps and reformats.
use glissade_ui::Px;

use super::{
    SliderDefaults,
    value::{clamp, format_value, normalize, parse_value, strip_numeric},
};

/// Edit buffer for the numeric field beside a scalar slider.
#[derive(Debug, Clone, Default)]
pub struct EditBuffer {
    text: String,
    focused: bool,
    last_external: Option<f64>,
}

impl EditBuffer {
    /// Creates an empty buffer. The first [`sync_external`] fills it.
    ///
    /// [`sync_external`]: EditBuffer::sync_external
    pub fn new() -> Self {
        Self::default()
    }

    /// Current field text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the field has focus.
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Reconciles with the committed value.
    ///
    /// When the value changed since the last call and the field is not
    /// focused, the text is replaced by the formatted value. A focused field
    /// keeps the user's text.
    pub fn sync_external(&mut self, value: f64, step: f64) {
        if self.last_external == Some(value) {
            return;
        }
        self.last_external = Some(value);
        if !self.focused {
            self.text = format_value(value, step);
        }
    }

    /// Replaces the text with `value`, e.g. after a key step while focused.
    pub fn show(&mut self, value: f64, step: f64) {
        self.text = format_value(value, step);
    }

    /// Field gained focus.
    pub fn focus(&mut self) {
        self.focused = true;
    }

    /// A keystroke changed the field to `raw`.
    ///
    /// Stores the stripped text verbatim and returns the value to send
    /// upward: parsed, clamped and, for integer steps, truncated.
    pub fn input(&mut self, raw: &str, min: f64, max: f64, step: f64) -> f64 {
        self.text = strip_numeric(raw);
        let value = clamp(parse_value(&self.text), min, max);
        if step >= 1.0 {
            // Truncating can drop below a fractional `min`.
            clamp(value.trunc(), min, max)
        } else {
            value
        }
    }

    /// Field lost focus. Returns the committed value and reformats the text.
    pub fn blur(&mut self, min: f64, max: f64, step: f64) -> f64 {
        let value = normalize(parse_value(&self.text), min, max, step);
        self.text = format_value(value, step);
        self.focused = false;
        value
    }

    /// Width that fits the current text.
    ///
    /// One character cell per character (at least one), using the compact
    /// cell below [`SliderDefaults::WIDE_LAYOUT_BREAKPOINT`] and the wide
    /// cell above it.
    pub fn width(&self, container_width: Px) -> Px {
        let char_width = if container_width >= SliderDefaults::WIDE_LAYOUT_BREAKPOINT.to_px() {
            SliderDefaults::WIDE_CHAR_WIDTH
        } else {
            SliderDefaults::COMPACT_CHAR_WIDTH
        };
        let chars = self.text.chars().count().max(1);
        Px::round_from_f32(chars as f32 * char_width.to_pixels_f32())
    }

    /// Forgets focus and text.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unfocused_field_follows_external_value() {
        let mut buffer = EditBuffer::new();
        buffer.sync_external(42.0, 1.0);
        assert_eq!(buffer.text(), "42");
        buffer.sync_external(0.5, 0.25);
        assert_eq!(buffer.text(), "0.50");
    }

    #[test]
    fn focused_field_keeps_user_text() {
        let mut buffer = EditBuffer::new();
        buffer.sync_external(10.0, 1.0);
        buffer.focus();

        let sent = buffer.input("7a5", 0.0, 100.0, 1.0);
        assert_eq!(sent, 75.0);
        buffer.sync_external(75.0, 1.0);
        assert_eq!(buffer.text(), "75");

        // Trailing dot survives mid-edit even though the value is whole.
        let sent = buffer.input("75.", 0.0, 100.0, 0.1);
        assert_eq!(sent, 75.0);
        buffer.sync_external(30.0, 0.1);
        assert_eq!(buffer.text(), "75.");
    }

    #[test]
    fn keystrokes_clamp_and_truncate() {
        let mut buffer = EditBuffer::new();
        buffer.focus();
        assert_eq!(buffer.input("250", 0.0, 100.0, 1.0), 100.0);
        assert_eq!(buffer.text(), "250");
        assert_eq!(buffer.input("12.9", 0.0, 100.0, 1.0), 12.0);
        assert_eq!(buffer.input("", 5.0, 100.0, 1.0), 5.0);
        assert_eq!(buffer.input("0.123", 0.0, 1.0, 0.01), 0.123);
    }

    #[test]
    fn truncated_keystroke_stays_above_fractional_min() {
        let mut buffer = EditBuffer::new();
        buffer.focus();
        assert_eq!(buffer.input("0.7", 0.5, 10.0, 1.0), 0.5);
        assert_eq!(buffer.input("", 0.5, 10.0, 1.0), 0.5);
        assert_eq!(buffer.input("3.9", 0.5, 10.0, 1.0), 3.0);
        assert_eq!(buffer.text(), "3.9");
    }

    #[test]
    fn blur_snaps_and_reformats() {
        let mut buffer = EditBuffer::new();
        buffer.focus();
        buffer.input("0.127", 0.0, 1.0, 0.01);
        assert_eq!(buffer.blur(0.0, 1.0, 0.01), 0.13);
        assert_eq!(buffer.text(), "0.13");
        assert!(!buffer.is_focused());

        buffer.focus();
        buffer.input("abc", 0.0, 100.0, 1.0);
        assert_eq!(buffer.blur(0.0, 100.0, 1.0), 0.0);
        assert_eq!(buffer.text(), "0");
    }

    #[test]
    fn width_hugs_the_text() {
        let mut buffer = EditBuffer::new();
        buffer.focus();
        buffer.input("", 0.0, 100.0, 1.0);
        let compact = SliderDefaults::COMPACT_CHAR_WIDTH.to_px();
        let wide = SliderDefaults::WIDE_CHAR_WIDTH.to_px();
        assert_eq!(buffer.width(Px(320)), compact);

        buffer.input("100", 0.0, 100.0, 1.0);
        assert_eq!(buffer.width(Px(320)), compact * 3);
        assert_eq!(buffer.width(Px(2000)), wide * 3);
    }
}
