//! # RxSO(3): rotation and uniform scale in 3D
//!
//! RxSO(3) is the direct product R⁺ × SO(3) of positive scale factors and 3D rotations.
//! It is the rotation-and-scale block of a similarity transform, used for monocular
//! SLAM and for aligning reconstructions with an unknown scale.
//!
//! ## Internal representation: a scale-bearing quaternion
//!
//! An element is stored as a single non-zero quaternion `q`:
//! - scale: `s = |q|`
//! - rotation: the unit quaternion `q / |q|`
//!
//! For scalars `s₁, s₂` and unit quaternions `u₁, u₂`, `(s₁u₁)(s₂u₂) = (s₁s₂)(u₁u₂)`,
//! so the plain quaternion product is the group composition. No renormalization
//! happens on composition, only when scale or rotation is extracted.
//!
//! The zero quaternion is not an element of the group. It is rejected at
//! construction and reported as [`LieError::DegenerateElement`] by the operations
//! that need the scale or the rotation individually ([`RxSO3F64::inverse`],
//! [`RxSO3F64::log`], [`RxSO3F64::rotation`]). The infallible operations
//! (`matrix`, `act`, `adjoint`) yield non-finite values for it.
//!
//! ## Tangent space
//!
//! The Lie algebra is so(3) ⊕ R, a direct sum: the scale generator commutes with
//! everything. Tangent vectors are 4-vectors `(ω.x, ω.y, ω.z, σ)` where `ω` is the
//! axis-angle rotation generator and `σ = ln(s)`. The algebra matrix is
//! `hat(ω, σ) = σ·I₃ + [ω]×`.
//!
//! ## Parameter layout
//!
//! The four stored scalars follow the quaternion order of the backend: `[x, y, z, w]`,
//! imaginary part first and real part last. The identity is `[0, 0, 0, 1]`.
//!
//! Reference: Sophus library (https://github.com/strasdat/Sophus)

use rand::Rng;

use crate::{
    error::LieError,
    group::LieGroup,
    scalar::{angle_over_norm, sinc},
};

fn degenerate(op: &'static str) -> LieError {
    log::debug!("RxSO3::{op}: zero quaternion, scale and rotation are undefined");
    LieError::DegenerateElement
}

/// Defines an RxSO(3) group type for one floating point precision.
///
/// # Arguments
///
/// * `name`   - The name of the group type.
/// * `scalar` - The scalar type (`f32` or `f64`).
/// * `quat`   - The glam quaternion type.
/// * `vec3`   - The glam 3-vector type (points).
/// * `vec4`   - The glam 4-vector type (tangent vectors).
/// * `mat3`   - The glam 3x3 matrix type (algebra and transformation matrices).
/// * `mat4`   - The glam 4x4 matrix type (adjoint).
macro_rules! define_rxso3_type {
    (
        $(#[$meta:meta])*
        $name:ident,
        $scalar:ty,
        $quat:ty,
        $vec3:ty,
        $vec4:ty,
        $mat3:ty,
        $mat4:ty
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub struct $name {
            q: $quat,
        }

        impl $name {
            /// Identity: no rotation, unit scale.
            pub const IDENTITY: Self = Self {
                q: <$quat>::IDENTITY,
            };

            /// Degrees of freedom: three for the rotation, one for the scale.
            pub const DOF: usize = 4;

            /// Number of stored scalars.
            pub const NUM_PARAMETERS: usize = 4;

            /// Create from a scale-bearing quaternion.
            ///
            /// The norm of `q` is the scale and its direction the rotation.
            ///
            /// # Errors
            ///
            /// [`LieError::DegenerateElement`] if `q` is the zero quaternion.
            pub fn from_quaternion(q: $quat) -> Result<Self, LieError> {
                if Self::is_zero(q) {
                    return Err(degenerate("from_quaternion"));
                }
                Ok(Self { q })
            }

            #[inline]
            pub(crate) fn from_quaternion_unchecked(q: $quat) -> Self {
                Self { q }
            }

            #[inline]
            fn is_zero(q: $quat) -> bool {
                q == <$quat>::from_xyzw(0.0, 0.0, 0.0, 0.0)
            }

            // |q| rescaled by the largest component so that the squares neither
            // overflow nor underflow for extreme scales
            #[inline]
            fn norm_of(q: $quat) -> $scalar {
                let v = <$vec4>::from(q);
                let largest = v.abs().max_element();
                if largest == 0.0 || !largest.is_finite() {
                    return largest;
                }
                (v / largest).length() * largest
            }

            /// Create from raw parameters in `[x, y, z, w]` order.
            ///
            /// # Errors
            ///
            /// [`LieError::DegenerateElement`] if all parameters are zero.
            pub fn from_params(params: [$scalar; 4]) -> Result<Self, LieError> {
                Self::from_quaternion(<$quat>::from_array(params))
            }

            /// Raw parameters in `[x, y, z, w]` order.
            #[inline]
            pub fn to_params(&self) -> [$scalar; 4] {
                self.q.to_array()
            }

            /// The scale-bearing quaternion.
            #[inline]
            pub fn quaternion(&self) -> $quat {
                self.q
            }

            /// Create from a scale factor and a rotation quaternion.
            ///
            /// The rotation does not need to be normalized.
            ///
            /// # Errors
            ///
            /// [`LieError::InvalidScale`] if `scale` is not strictly positive and finite,
            /// [`LieError::DegenerateElement`] if `rotation` is zero.
            pub fn from_scale_quaternion(scale: $scalar, rotation: $quat) -> Result<Self, LieError> {
                if !(scale > 0.0 && scale.is_finite()) {
                    return Err(LieError::InvalidScale(f64::from(scale)));
                }
                if Self::is_zero(rotation) {
                    return Err(degenerate("from_scale_quaternion"));
                }
                Self::from_quaternion(rotation / Self::norm_of(rotation) * scale)
            }

            /// Create from a scale factor and a 3x3 rotation matrix.
            ///
            /// `rotation` must be orthonormal with determinant `+1`. This is not
            /// checked: any other matrix yields the quaternion glam extracts from its
            /// diagonal and off-diagonal terms, which does not represent it.
            ///
            /// # Errors
            ///
            /// [`LieError::InvalidScale`] if `scale` is not strictly positive and finite.
            pub fn from_scale_rotation_matrix(
                scale: $scalar,
                rotation: $mat3,
            ) -> Result<Self, LieError> {
                Self::from_scale_quaternion(scale, <$quat>::from_mat3(&rotation))
            }

            /// Sample a uniformly distributed rotation with a log-scale in `[-1, 1)`.
            pub fn from_random() -> Self {
                let mut rng = rand::rng();

                let r1: $scalar = rng.random();
                let r2: $scalar = rng.random();
                let r3: $scalar = rng.random();
                let sigma: $scalar = rng.random_range(-1.0..1.0);

                // Shoemake method
                let one_minus_r1_sqrt = (1.0 - r1).sqrt();
                let r1_sqrt = r1.sqrt();
                let two_pi = 2.0 * <$scalar as crate::scalar::LieScalar>::pi();

                let w = one_minus_r1_sqrt * (two_pi * r2).cos();
                let x = one_minus_r1_sqrt * (two_pi * r2).sin();
                let y = r1_sqrt * (two_pi * r3).cos();
                let z = r1_sqrt * (two_pi * r3).sin();

                let unit = <$quat>::from_xyzw(x, y, z, w).normalize();
                Self {
                    q: unit * sigma.exp(),
                }
            }

            /// Scale factor `|q|`.
            #[inline]
            pub fn scale(&self) -> $scalar {
                Self::norm_of(self.q)
            }

            /// Replace the scale factor, keeping the rotation.
            ///
            /// # Errors
            ///
            /// [`LieError::InvalidScale`] for a non-positive or non-finite scale,
            /// [`LieError::DegenerateElement`] if the element is degenerate.
            pub fn set_scale(&mut self, scale: $scalar) -> Result<(), LieError> {
                if !(scale > 0.0 && scale.is_finite()) {
                    return Err(LieError::InvalidScale(f64::from(scale)));
                }
                self.q = self.rotation()? * scale;
                Ok(())
            }

            /// Rotation part as a unit quaternion.
            ///
            /// # Errors
            ///
            /// [`LieError::DegenerateElement`] if the element is the zero quaternion.
            pub fn rotation(&self) -> Result<$quat, LieError> {
                if Self::is_zero(self.q) {
                    return Err(degenerate("rotation"));
                }
                Ok(self.unit())
            }

            /// Rotation part as a 3x3 rotation matrix.
            ///
            /// # Errors
            ///
            /// [`LieError::DegenerateElement`] if the element is the zero quaternion.
            pub fn rotation_matrix(&self) -> Result<$mat3, LieError> {
                Ok(<$mat3>::from_quat(self.rotation()?))
            }

            // unit quaternion, non-finite for the zero quaternion
            #[inline]
            fn unit(&self) -> $quat {
                self.q / Self::norm_of(self.q)
            }

            /// The 3x3 transformation matrix `s·R`.
            pub fn matrix(&self) -> $mat3 {
                <$mat3>::from_quat(self.unit()) * self.scale()
            }

            /// Scale and rotate a point, `s·R·p`.
            pub fn act(&self, point: $vec3) -> $vec3 {
                self.unit().mul_vec3(point) * self.scale()
            }

            /// Group composition `self ∘ other`, the product of the two quaternions.
            #[inline]
            pub fn compose(&self, other: &Self) -> Self {
                Self {
                    q: self.q * other.q,
                }
            }

            /// Inverse element: conjugate quaternion divided by its squared norm.
            ///
            /// The norm is divided out twice instead of squared, so elements with
            /// very large or very small scale still invert to a non-zero quaternion.
            ///
            /// The inverse has scale `1/s` and the inverse rotation.
            ///
            /// # Errors
            ///
            /// [`LieError::DegenerateElement`] if the element is the zero quaternion.
            pub fn inverse(&self) -> Result<Self, LieError> {
                if Self::is_zero(self.q) {
                    return Err(degenerate("inverse"));
                }
                let norm = Self::norm_of(self.q);
                Ok(Self {
                    q: self.q.conjugate() / norm / norm,
                })
            }

            /// Exponential map: tangent `(ω, σ)` to group element.
            ///
            /// The rotation of angle `θ = |ω|` becomes the unit quaternion
            /// `(cos(θ/2), sin(θ/2)/θ · ω)`, which is then scaled by `exp(σ)`.
            pub fn exp(tangent: $vec4) -> Self {
                let omega = tangent.truncate();
                let half_theta = 0.5 * omega.length();

                // sin(θ/2)/θ = sinc(θ/2)/2
                let imag = omega * (0.5 * sinc(half_theta));
                let unit = <$quat>::from_xyzw(imag.x, imag.y, imag.z, half_theta.cos());

                Self {
                    q: unit * tangent.w.exp(),
                }
            }

            /// Logarithmic map: group element to tangent `(ω, σ)`.
            ///
            /// The returned rotation angle `|ω|` lies in `[0, 2π)`. Only the zero
            /// quaternion is rejected; any other element, however large or small its
            /// scale, has a finite logarithm.
            ///
            /// For a real part `w < 0` with a vanishing imaginary part the small-angle
            /// series yields `ω ≈ 2v/w`, so `exp(log(g))` returns `-q`: the same element
            /// and the same matrix, with sign-flipped parameters.
            ///
            /// # Errors
            ///
            /// [`LieError::DegenerateElement`] if the element is the zero quaternion.
            pub fn log(&self) -> Result<$vec4, LieError> {
                if Self::is_zero(self.q) {
                    return Err(degenerate("log"));
                }
                let scale = Self::norm_of(self.q);
                let unit = self.q / scale;

                let v = unit.xyz();
                let omega = v * angle_over_norm(v.length(), unit.w);

                Ok(omega.extend(scale.ln()))
            }

            /// Vector space to Lie algebra: `σ·I₃ + [ω]×`.
            pub fn hat(tangent: $vec4) -> $mat3 {
                let (a, b, c, s) = (tangent.x, tangent.y, tangent.z, tangent.w);
                <$mat3>::from_cols(
                    <$vec3>::new(s, c, -b),
                    <$vec3>::new(-c, s, a),
                    <$vec3>::new(b, -a, s),
                )
            }

            /// Lie algebra to vector space.
            ///
            /// Orthogonal projection onto `{σ·I₃ + [ω]×}` followed by coordinate
            /// extraction: `σ` is a third of the trace and `ω` comes from the
            /// antisymmetric part. Any component of `omega` outside that subspace
            /// (the traceless symmetric part) is discarded without error, so
            /// `vee(hat(x)) == x` for every `x`.
            pub fn vee(omega: $mat3) -> $vec4 {
                let (c0, c1, c2) = (omega.x_axis, omega.y_axis, omega.z_axis);
                <$vec4>::new(
                    0.5 * (c1.z - c2.y),
                    0.5 * (c2.x - c0.z),
                    0.5 * (c0.y - c1.x),
                    (c0.x + c1.y + c2.z) / 3.0,
                )
            }

            /// Adjoint representation: block diagonal `[[R, 0], [0, 1]]`.
            ///
            /// Conjugating `hat(x)` by `s·R` cancels the scale, rotates `ω` by `R`
            /// and leaves `σ·I₃` unchanged.
            pub fn adjoint(&self) -> $mat4 {
                let r = <$mat3>::from_quat(self.unit());
                <$mat4>::from_cols(
                    r.x_axis.extend(0.0),
                    r.y_axis.extend(0.0),
                    r.z_axis.extend(0.0),
                    <$vec4>::W,
                )
            }

            /// Lie bracket `[a, b] = (ω_a × ω_b, 0)`.
            ///
            /// The scale component is always zero since scale is an abelian
            /// direct summand.
            pub fn lie_bracket(a: $vec4, b: $vec4) -> $vec4 {
                a.truncate().cross(b.truncate()).extend(0.0)
            }

            /// Right retraction `self ∘ exp(tau)`.
            #[inline]
            pub fn rplus(&self, tau: $vec4) -> Self {
                self.compose(&Self::exp(tau))
            }

            /// Right difference `log(self⁻¹ ∘ other)`.
            ///
            /// # Errors
            ///
            /// [`LieError::DegenerateElement`] if either element is degenerate.
            #[inline]
            pub fn rminus(&self, other: &Self) -> Result<$vec4, LieError> {
                self.inverse()?.compose(other).log()
            }

            /// Left retraction `exp(tau) ∘ x`.
            #[inline]
            pub fn lplus(tau: $vec4, x: &Self) -> Self {
                Self::exp(tau).compose(x)
            }

            /// Left difference `log(y ∘ x⁻¹)`.
            ///
            /// # Errors
            ///
            /// [`LieError::DegenerateElement`] if either element is degenerate.
            #[inline]
            pub fn lminus(y: &Self, x: &Self) -> Result<$vec4, LieError> {
                y.compose(&x.inverse()?).log()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::IDENTITY
            }
        }

        impl LieGroup for $name {
            type Scalar = $scalar;
            type Tangent = $vec4;
            type Point = $vec3;
            type Algebra = $mat3;
            type Transformation = $mat3;
            type Adjoint = $mat4;

            const DOF: usize = <$name>::DOF;
            const NUM_PARAMETERS: usize = <$name>::NUM_PARAMETERS;

            #[inline]
            fn identity() -> Self {
                Self::IDENTITY
            }

            #[inline]
            fn exp(tangent: $vec4) -> Self {
                <$name>::exp(tangent)
            }

            #[inline]
            fn log(&self) -> Result<$vec4, LieError> {
                <$name>::log(self)
            }

            #[inline]
            fn compose(&self, other: &Self) -> Self {
                <$name>::compose(self, other)
            }

            #[inline]
            fn inverse(&self) -> Result<Self, LieError> {
                <$name>::inverse(self)
            }

            #[inline]
            fn act(&self, point: $vec3) -> $vec3 {
                <$name>::act(self, point)
            }

            #[inline]
            fn matrix(&self) -> $mat3 {
                <$name>::matrix(self)
            }

            #[inline]
            fn adjoint(&self) -> $mat4 {
                <$name>::adjoint(self)
            }

            #[inline]
            fn hat(tangent: $vec4) -> $mat3 {
                <$name>::hat(tangent)
            }

            #[inline]
            fn vee(omega: $mat3) -> $vec4 {
                <$name>::vee(omega)
            }

            #[inline]
            fn lie_bracket(a: $vec4, b: $vec4) -> $vec4 {
                <$name>::lie_bracket(a, b)
            }
        }

        #[cfg(feature = "approx")]
        impl approx::AbsDiffEq for $name {
            type Epsilon = $scalar;

            #[inline]
            fn default_epsilon() -> Self::Epsilon {
                <$scalar as approx::AbsDiffEq>::default_epsilon()
            }

            #[inline]
            fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
                self.to_params()
                    .iter()
                    .zip(other.to_params().iter())
                    .all(|(a, b)| <$scalar as approx::AbsDiffEq>::abs_diff_eq(a, b, epsilon))
            }
        }

        #[cfg(feature = "approx")]
        impl approx::RelativeEq for $name {
            #[inline]
            fn default_max_relative() -> Self::Epsilon {
                <$scalar as approx::RelativeEq>::default_max_relative()
            }

            #[inline]
            fn relative_eq(
                &self,
                other: &Self,
                epsilon: Self::Epsilon,
                max_relative: Self::Epsilon,
            ) -> bool {
                self.to_params()
                    .iter()
                    .zip(other.to_params().iter())
                    .all(|(a, b)| {
                        <$scalar as approx::RelativeEq>::relative_eq(a, b, epsilon, max_relative)
                    })
            }
        }
    };
}

define_rxso3_type!(
    /// Rotation and uniform scale R₊ × SO(3) in single precision.
    ///
    /// Stored as a scale-bearing quaternion; see the [module-level documentation](self).
    RxSO3F32,
    f32,
    glam::Quat,
    glam::Vec3,
    glam::Vec4,
    glam::Mat3,
    glam::Mat4
);

define_rxso3_type!(
    /// Rotation and uniform scale R₊ × SO(3) in double precision.
    ///
    /// Stored as a scale-bearing quaternion; see the [module-level documentation](self).
    RxSO3F64,
    f64,
    glam::DQuat,
    glam::DVec3,
    glam::DVec4,
    glam::DMat3,
    glam::DMat4
);
