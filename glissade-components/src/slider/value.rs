//! Numeric helpers shared by every slider input path.
//!
//! All values are `f64` in the host's own units (not normalized to `0..1`).

use super::SliderError;

/// Step values at or above this threshold produce integer-only sliders.
const INTEGER_STEP: f64 = 1.0;

/// Fractional digits beyond this carry no information in an `f64`.
const MAX_PRECISION: usize = 15;

/// Checks that `min < max` and that `step` is a positive finite number.
pub fn validate_bounds(min: f64, max: f64, step: f64) -> Result<(), SliderError> {
    if !min.is_finite() || !max.is_finite() || min >= max {
        return Err(SliderError::InvalidRange { min, max });
    }
    if !step.is_finite() || step <= 0.0 {
        return Err(SliderError::InvalidStep(step));
    }
    Ok(())
}

/// Clamps `value` into `[min, max]`. `NaN` clamps to `min`.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Number of fractional digits in the decimal representation of `step`.
///
/// `0.25` has two, `0.1` has one and `5` has none.
pub fn step_precision(step: f64) -> usize {
    let text = step.to_string();
    text.split_once('.')
        .map_or(0, |(_, fraction)| fraction.len())
        .min(MAX_PRECISION)
}

/// Snaps a value to the granularity implied by `step`.
///
/// Steps of one or more truncate toward zero so integer sliders never carry
/// a fractional part. Smaller steps round to the step's own precision.
pub fn round_to_step(value: f64, step: f64) -> f64 {
    if step >= INTEGER_STEP {
        return value.trunc();
    }
    let factor = 10f64.powi(step_precision(step) as i32);
    (value * factor).round() / factor
}

/// Clamps then snaps, the canonical form of any committed scalar value.
///
/// Snapping can step past a fractional bound, so the result is clamped once
/// more.
pub fn normalize(value: f64, min: f64, max: f64, step: f64) -> f64 {
    let snapped = round_to_step(clamp(value, min, max), step);
    clamp(snapped, min, max)
}

/// Formats a value with the step's fractional precision.
pub fn format_value(value: f64, step: f64) -> String {
    // `-0` would otherwise render with its sign.
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{:.*}", step_precision(step), value)
}

/// Keeps only ASCII digits and `.` from user text.
pub fn strip_numeric(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect()
}

/// Parses user text leniently.
///
/// Non-numeric characters are stripped first, then the longest leading
/// `digits[.digits]` run is read. Anything that yields no number is `0`.
pub fn parse_value(text: &str) -> f64 {
    let stripped = strip_numeric(text);
    let mut seen_dot = false;
    let end = stripped
        .char_indices()
        .find(|&(_, c)| {
            if c == '.' {
                if seen_dot {
                    return true;
                }
                seen_dot = true;
            }
            false
        })
        .map_or(stripped.len(), |(idx, _)| idx);
    stripped[..end].parse::<f64>().unwrap_or(0.0)
}

/// Position of `value` within `[min, max]` as a fraction in `[0, 1]`.
pub fn percent(value: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if span <= 0.0 {
        return 0.0;
    }
    ((value - min) / span).clamp(0.0, 1.0)
}
