//! Per-precision numeric configuration.
//!
//! The exponential and logarithmic maps switch to series expansions when an angle
//! gets close to zero. The threshold for that switch depends on the floating point
//! precision, so it lives in a small table implemented once per scalar type rather
//! than in a global.

use num_traits::{Float, FloatConst};

/// Floating point scalar usable by the Lie group implementations.
///
/// Implemented for `f32` and `f64`.
pub trait LieScalar: Float + FloatConst + Default + std::fmt::Debug + Send + Sync + 'static {
    /// Threshold below which closed-form expressions are replaced by their Taylor series.
    const SMALL_EPSILON: Self;

    /// Converts an `f64` literal into this precision.
    fn lit(value: f64) -> Self;

    /// The constant π in this precision.
    #[inline]
    fn pi() -> Self {
        Self::PI()
    }
}

impl LieScalar for f32 {
    const SMALL_EPSILON: f32 = 1.0e-5;

    #[inline]
    fn lit(value: f64) -> Self {
        value as f32
    }
}

impl LieScalar for f64 {
    const SMALL_EPSILON: f64 = 1.0e-10;

    #[inline]
    fn lit(value: f64) -> Self {
        value
    }
}

/// Unnormalized sinc, `sin(x) / x`.
///
/// Below [`LieScalar::SMALL_EPSILON`] the Taylor series `1 - x²/6 + x⁴/120` is used instead
/// of the quotient.
#[inline]
pub fn sinc<T: LieScalar>(x: T) -> T {
    if x.abs() < T::SMALL_EPSILON {
        let x_sq = x * x;
        T::one() - x_sq / T::lit(6.0) + x_sq * x_sq / T::lit(120.0)
    } else {
        x.sin() / x
    }
}

/// Ratio `θ / n` for a unit quaternion `(w, v)` with `n = |v|`.
///
/// The rotation angle is recovered as `θ = 2·atan2(n, w)`, which stays well conditioned
/// both for `n → 0` and for `w → 0` (angles close to π). When `n` is below
/// [`LieScalar::SMALL_EPSILON`] the expansion `2/w - 2n²/(3w³)` avoids the division by `n`.
#[inline]
pub fn angle_over_norm<T: LieScalar>(n: T, w: T) -> T {
    if n < T::SMALL_EPSILON {
        let w_sq = w * w;
        T::lit(2.0) / w - T::lit(2.0 / 3.0) * (n * n) / (w_sq * w)
    } else {
        T::lit(2.0) * n.atan2(w) / n
    }
}
