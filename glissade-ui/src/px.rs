//! Physical pixel units.
//!
//! Layout code in glissade measures geometry in physical pixels. The values
//! handed in by a host (track width, measured label boxes, thumb size) are
//! whole pixels, while intermediate positions are computed in `f32` and
//! rounded back with [`Px::round_from_f32`].
//!
//! # Example
//!
//! ```
//! use glissade_ui::{Px, PxSize};
//!
//! let label = PxSize::from([40, 18]);
//! let centre = 150.0_f32;
//! let left = Px::round_from_f32(centre - label.width.to_f32() / 2.0);
//! assert_eq!(left, Px(130));
//! ```

use std::ops::Mul;

/// A physical pixel length or coordinate.
///
/// Negative values are allowed so that offsets computed before clamping can
/// be represented without wrapping.
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct Px(pub i32);

impl Px {
    /// Zero pixels.
    pub const ZERO: Self = Self(0);

    /// Converts the pixel value to `f32`.
    pub fn to_f32(self) -> f32 {
        self.0 as f32
    }

    /// Creates a `Px` from an `f32`, saturating at the `i32` bounds.
    ///
    /// The fractional part is truncated. `NaN` maps to zero.
    ///
    /// ```
    /// use glissade_ui::Px;
    ///
    /// assert_eq!(Px::saturating_from_f32(42.7), Px(42));
    /// assert_eq!(Px::saturating_from_f32(f32::MAX), Px(i32::MAX));
    /// ```
    pub fn saturating_from_f32(value: f32) -> Self {
        let clamped = value.clamp(i32::MIN as f32, i32::MAX as f32);
        Px(clamped as i32)
    }

    /// Rounds an `f32` to the nearest pixel, saturating at the `i32` bounds.
    pub fn round_from_f32(value: f32) -> Self {
        Self::saturating_from_f32(value.round())
    }
}

impl Mul<i32> for Px {
    type Output = Px;

    fn mul(self, rhs: i32) -> Self::Output {
        Px(self.0 * rhs)
    }
}

/// A width/height pair in physical pixels.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PxSize {
    /// Horizontal extent.
    pub width: Px,
    /// Vertical extent.
    pub height: Px,
}

impl PxSize {
    /// Creates a new size.
    pub const fn new(width: Px, height: Px) -> Self {
        Self { width, height }
    }
}

impl From<[i32; 2]> for PxSize {
    fn from(size: [i32; 2]) -> Self {
        PxSize::new(Px(size[0]), Px(size[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_conversions_saturate_and_round() {
        assert_eq!(Px::saturating_from_f32(f32::MAX), Px(i32::MAX));
        assert_eq!(Px::saturating_from_f32(f32::MIN), Px(i32::MIN));
        assert_eq!(Px::saturating_from_f32(-100.5), Px(-100));
        assert_eq!(Px::saturating_from_f32(f32::NAN), Px::ZERO);

        assert_eq!(Px::round_from_f32(27.27), Px(27));
        assert_eq!(Px::round_from_f32(27.5), Px(28));
        assert_eq!(Px::round_from_f32(-0.4), Px(0));
    }

    #[test]
    fn char_cells_multiply() {
        assert_eq!(Px(8) * 3, Px(24));
        assert_eq!(PxSize::from([40, 18]), PxSize::new(Px(40), Px(18)));
    }
}
