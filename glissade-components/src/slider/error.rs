use thiserror::Error;

/// Configuration errors reported by the slider.
///
/// These describe a mistake in the args a host passes in, not a condition a
/// user can trigger by interacting with the control. User input that cannot
/// be interpreted is coerced instead of reported.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SliderError {
    /// `min` is not strictly below `max`, or either bound is not finite.
    #[error("invalid slider range: min {min} must be finite and below max {max}")]
    InvalidRange {
        /// Lower bound supplied by the host.
        min: f64,
        /// Upper bound supplied by the host.
        max: f64,
    },
    /// The step is zero, negative or not finite.
    #[error("invalid slider step {0}: must be a positive finite number")]
    InvalidStep(f64),
    /// A mark sits outside the slider range.
    #[error("mark value {value} lies outside the slider range [{min}, {max}]")]
    MarkOutOfRange {
        /// Offending mark value.
        value: f64,
        /// Lower bound of the slider.
        min: f64,
        /// Upper bound of the slider.
        max: f64,
    },
    /// Two marks share the same value.
    #[error("duplicate mark value {0}")]
    DuplicateMark(f64),
    /// A mark value is `NaN` or infinite.
    #[error("mark values must be finite")]
    NonFiniteMark,
}
