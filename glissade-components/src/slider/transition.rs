//! Thumb movement timing.
use std::time::Duration;

use super::SliderDefaults;

/// Duration for a discrete jump of `delta_percent` (normalized).
///
/// Grows linearly with distance, never below the floor, so a one-step hop
/// snaps and an end-to-end jump glides.
pub fn transition_duration(delta_percent: f64) -> Duration {
    let scale_ms = SliderDefaults::TRANSITION_SCALE.as_millis() as f64;
    let millis = (scale_ms * delta_percent.abs()).round();
    let scaled = if millis.is_finite() {
        Duration::from_millis(millis as u64)
    } else {
        Duration::ZERO
    };
    scaled.max(SliderDefaults::TRANSITION_FLOOR)
}

/// Remembers the last thumb position to size the next transition.
#[derive(Debug, Clone, Default)]
pub struct ThumbTransition {
    previous: Option<f64>,
}

impl ThumbTransition {
    /// Creates a tracker with no previous position.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `percent` and returns how long the thumb should take to get
    /// there.
    ///
    /// Zero on the first call, while dragging, and in range mode.
    pub fn duration(&mut self, percent: f64, dragging: bool, range: bool) -> Duration {
        let previous = self.previous.replace(percent);
        if dragging || range {
            return Duration::ZERO;
        }
        match previous {
            Some(previous) => transition_duration(percent - previous),
            None => Duration::ZERO,
        }
    }

    /// Forgets the previous position; the next call will not animate.
    pub fn reset(&mut self) {
        self.previous = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_scales_with_distance() {
        assert_eq!(transition_duration(1.0), Duration::from_millis(300));
        assert_eq!(transition_duration(-1.0), Duration::from_millis(300));
        assert_eq!(transition_duration(0.5), Duration::from_millis(150));
        assert_eq!(transition_duration(0.01), Duration::from_millis(100));
    }

    #[test]
    fn first_render_and_drags_do_not_animate() {
        let mut transition = ThumbTransition::new();
        assert_eq!(transition.duration(0.2, false, false), Duration::ZERO);
        assert_eq!(transition.duration(0.9, true, false), Duration::ZERO);
        assert_eq!(
            transition.duration(0.0, false, false),
            Duration::from_millis(270)
        );
        assert_eq!(transition.duration(1.0, false, true), Duration::ZERO);

        transition.reset();
        assert_eq!(transition.duration(0.5, false, false), Duration::ZERO);
    }
}
