//! # Density-Independent Pixels (Dp)
//!
//! Design constants (label spacing, per-character input width, layout
//! breakpoints) are written in dp so they keep the same physical size on
//! screens of different density. A host converts them to [`Px`] with the
//! global [`SCALE_FACTOR`], which it sets once from the window's DPI via
//! [`set_scale_factor`].
//!
//! ```
//! use glissade_ui::Dp;
//!
//! let spacing = Dp(16.0);
//! let pixels = spacing.to_px();
//! // Result depends on the current scale factor
//! # let _ = pixels;
//! ```

use std::sync::OnceLock;

use parking_lot::RwLock;
use tracing::debug;

use crate::Px;

/// Global scale factor for converting between dp and physical pixels.
///
/// Unset means a factor of `1.0`.
pub static SCALE_FACTOR: OnceLock<RwLock<f64>> = OnceLock::new();

/// Reads the current scale factor, defaulting to `1.0`.
pub fn scale_factor() -> f64 {
    SCALE_FACTOR.get().map(|lock| *lock.read()).unwrap_or(1.0)
}

/// Updates the global scale factor.
///
/// Non-finite or non-positive factors are ignored.
pub fn set_scale_factor(factor: f64) {
    if !factor.is_finite() || factor <= 0.0 {
        debug!("Ignoring invalid scale factor {factor}");
        return;
    }
    let lock = SCALE_FACTOR.get_or_init(|| RwLock::new(1.0));
    *lock.write() = factor;
}

/// Density-independent pixels.
///
/// ```
/// use glissade_ui::Dp;
///
/// let base = Dp(16.0);
/// let double = Dp(base.0 * 2.0);
/// assert_eq!(double, Dp(32.0));
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
pub struct Dp(pub f64);

impl Dp {
    /// Converts to physical pixels as `f32`.
    pub fn to_pixels_f32(&self) -> f32 {
        (self.0 * scale_factor()) as f32
    }

    /// Converts to [`Px`], truncating fractional pixels.
    pub fn to_px(&self) -> Px {
        Px::saturating_from_f32(self.to_pixels_f32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_factor_round_trip() {
        set_scale_factor(2.0);
        assert_eq!(Dp(8.0).to_px(), Px(16));
        assert_eq!(Dp(3.0).to_pixels_f32(), 6.0);

        // Rejected values leave the factor untouched.
        set_scale_factor(0.0);
        set_scale_factor(f64::NAN);
        assert_eq!(scale_factor(), 2.0);

        set_scale_factor(1.0);
        assert_eq!(Dp(8.0).to_px(), Px(8));
    }
}
