//! Non-owning RxSO(3) views over caller-managed parameter buffers.
//!
//! Nonlinear least squares solvers usually keep all parameter blocks in one flat
//! array and update them in place on every iteration. A map view borrows exactly
//! four scalars of such an array and exposes the same group operations as the
//! owning types, writing results straight back into the buffer.
//!
//! The view only ever reads and writes its four scalars in `[x, y, z, w]` order; it
//! never changes the length of the buffer nor reinterprets its layout. Writes are
//! visible to any later reader of the buffer once the view is dropped.
//!
//! A freshly mapped buffer may still hold zeros (for example before the first
//! [`assign`](RxSO3MapF64::assign)), so the non-zero invariant is only checked by
//! the operations that need it.
//!
//! # Example
//!
//! ```rust
//! use kornia_rxso3::{RxSO3F64, RxSO3MapF64};
//!
//! let mut params = [0.0f64; 8];
//! let a = RxSO3F64::exp(glam::DVec4::new(0.1, 0.2, 0.3, 0.5));
//! let b = RxSO3F64::exp(glam::DVec4::new(-0.4, 0.0, 0.2, -0.1));
//!
//! let mut view = RxSO3MapF64::new(&mut params[4..]).unwrap();
//! view.assign(&a);
//! view.compose_assign(&b);
//!
//! let ab = RxSO3F64::from_params([params[4], params[5], params[6], params[7]]).unwrap();
//! assert!((ab.scale() - a.compose(&b).scale()).abs() < 1e-12);
//! ```

use crate::{
    error::LieError,
    rxso3::{RxSO3F32, RxSO3F64},
};

/// Defines a mutable RxSO(3) view for one floating point precision.
///
/// # Arguments
///
/// * `name`   - The name of the view type.
/// * `group`  - The owning group type of the same precision.
/// * `scalar` - The scalar type.
/// * `quat`   - The glam quaternion type.
/// * `vec3`   - The glam 3-vector type.
/// * `vec4`   - The glam 4-vector type.
/// * `mat3`   - The glam 3x3 matrix type.
/// * `mat4`   - The glam 4x4 matrix type.
macro_rules! define_rxso3_map_type {
    (
        $(#[$meta:meta])*
        $name:ident,
        $group:ident,
        $scalar:ty,
        $quat:ty,
        $vec3:ty,
        $vec4:ty,
        $mat3:ty,
        $mat4:ty
    ) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name<'a> {
            params: &'a mut [$scalar; 4],
        }

        impl<'a> $name<'a> {
            /// Map a buffer holding exactly one element.
            ///
            /// # Errors
            ///
            /// [`LieError::WrongParamSize`] if `buffer` does not hold exactly
            /// four scalars.
            pub fn new(buffer: &'a mut [$scalar]) -> Result<Self, LieError> {
                let got = buffer.len();
                let params: &'a mut [$scalar; 4] =
                    buffer
                        .try_into()
                        .map_err(|_| LieError::WrongParamSize {
                            expected: <$group>::NUM_PARAMETERS,
                            got,
                        })?;
                Ok(Self { params })
            }

            /// Map a fixed-size parameter block.
            #[inline]
            pub fn from_array(params: &'a mut [$scalar; 4]) -> Self {
                Self { params }
            }

            /// The mapped parameters in `[x, y, z, w]` order.
            #[inline]
            pub fn params(&self) -> &[$scalar; 4] {
                &*self.params
            }

            #[inline]
            fn load(&self) -> $group {
                <$group>::from_quaternion_unchecked(<$quat>::from_array(*self.params))
            }

            #[inline]
            fn store(&mut self, element: &$group) {
                *self.params = element.to_params();
            }

            /// Copy the mapped element into an owning value.
            ///
            /// # Errors
            ///
            /// [`LieError::DegenerateElement`] if the buffer holds the zero quaternion.
            pub fn group(&self) -> Result<$group, LieError> {
                <$group>::from_params(*self.params)
            }

            /// Overwrite the buffer with `element`.
            #[inline]
            pub fn assign(&mut self, element: &$group) {
                self.store(element);
            }

            /// In-place composition `self ← self ∘ rhs`.
            pub fn compose_assign(&mut self, rhs: &$group) {
                let result = self.load().compose(rhs);
                self.store(&result);
            }

            /// Write `exp(tangent)` into the buffer.
            pub fn exp_assign(&mut self, tangent: $vec4) {
                self.store(&<$group>::exp(tangent));
            }

            /// In-place right retraction `self ← self ∘ exp(tau)`.
            pub fn rplus_assign(&mut self, tau: $vec4) {
                let result = self.load().rplus(tau);
                self.store(&result);
            }

            /// In-place inverse.
            ///
            /// # Errors
            ///
            /// [`LieError::DegenerateElement`] if the buffer holds the zero quaternion.
            /// The buffer is left untouched in that case.
            pub fn invert(&mut self) -> Result<(), LieError> {
                let inverse = self.load().inverse()?;
                self.store(&inverse);
                Ok(())
            }

            /// The scale-bearing quaternion.
            #[inline]
            pub fn quaternion(&self) -> $quat {
                <$quat>::from_array(*self.params)
            }

            /// Scale factor.
            #[inline]
            pub fn scale(&self) -> $scalar {
                self.load().scale()
            }

            /// Logarithmic map of the mapped element.
            ///
            /// # Errors
            ///
            /// [`LieError::DegenerateElement`] if the buffer holds the zero quaternion.
            pub fn log(&self) -> Result<$vec4, LieError> {
                self.load().log()
            }

            /// The 3x3 transformation matrix `s·R`.
            pub fn matrix(&self) -> $mat3 {
                self.load().matrix()
            }

            /// Adjoint representation of the mapped element.
            pub fn adjoint(&self) -> $mat4 {
                self.load().adjoint()
            }

            /// Scale and rotate a point.
            pub fn act(&self, point: $vec3) -> $vec3 {
                self.load().act(point)
            }

            /// Composition `self ∘ rhs` into a new owning value.
            pub fn compose(&self, rhs: &$group) -> $group {
                self.load().compose(rhs)
            }
        }
    };
}

define_rxso3_map_type!(
    /// Mutable view of an [`RxSO3F32`] stored in a caller-owned `f32` buffer.
    RxSO3MapF32,
    RxSO3F32,
    f32,
    glam::Quat,
    glam::Vec3,
    glam::Vec4,
    glam::Mat3,
    glam::Mat4
);

define_rxso3_map_type!(
    /// Mutable view of an [`RxSO3F64`] stored in a caller-owned `f64` buffer.
    RxSO3MapF64,
    RxSO3F64,
    f64,
    glam::DQuat,
    glam::DVec3,
    glam::DVec4,
    glam::DMat3,
    glam::DMat4
);
