//! Capability interface shared by the Lie group types.
//!
//! Group composition and the action on points are exposed as named methods
//! (`compose`, `act`) instead of operator overloads, so that code can be written
//! generically over any group providing exp/log/adjoint.

use crate::{error::LieError, scalar::LieScalar};

/// A matrix Lie group together with its tangent space at the identity.
pub trait LieGroup: Sized + Copy {
    /// Floating point precision of the group.
    type Scalar: LieScalar;

    /// Coordinates of the Lie algebra (tangent space at the identity).
    type Tangent: Copy;

    /// Point the group acts on.
    type Point: Copy;

    /// Matrix representation of a Lie algebra element, image of [`LieGroup::hat`].
    type Algebra: Copy;

    /// Matrix representation of a group element, image of [`LieGroup::matrix`].
    type Transformation: Copy;

    /// Matrix of the adjoint representation.
    type Adjoint: Copy;

    /// Degrees of freedom, i.e. the dimension of the tangent space.
    const DOF: usize;

    /// Number of scalars used to store one element.
    const NUM_PARAMETERS: usize;

    /// The identity element.
    fn identity() -> Self;

    /// Exponential map: tangent vector to group element.
    fn exp(tangent: Self::Tangent) -> Self;

    /// Logarithmic map: group element to tangent vector.
    fn log(&self) -> Result<Self::Tangent, LieError>;

    /// Group composition `self ∘ other`.
    fn compose(&self, other: &Self) -> Self;

    /// Group inverse.
    fn inverse(&self) -> Result<Self, LieError>;

    /// Action of the element on a point.
    fn act(&self, point: Self::Point) -> Self::Point;

    /// Matrix representation of the element.
    fn matrix(&self) -> Self::Transformation;

    /// Adjoint representation, `Ad(g)·x = vee(g·hat(x)·g⁻¹)`.
    fn adjoint(&self) -> Self::Adjoint;

    /// Tangent coordinates to algebra matrix.
    fn hat(tangent: Self::Tangent) -> Self::Algebra;

    /// Algebra matrix to tangent coordinates.
    fn vee(omega: Self::Algebra) -> Self::Tangent;

    /// Lie bracket `[a, b] = vee(hat(a)·hat(b) - hat(b)·hat(a))`.
    fn lie_bracket(a: Self::Tangent, b: Self::Tangent) -> Self::Tangent;

    /// Right retraction `self ∘ exp(tau)`.
    #[inline]
    fn rplus(&self, tau: Self::Tangent) -> Self {
        self.compose(&Self::exp(tau))
    }

    /// Right difference `log(self⁻¹ ∘ other)`.
    #[inline]
    fn rminus(&self, other: &Self) -> Result<Self::Tangent, LieError> {
        self.inverse()?.compose(other).log()
    }
}

/// Composes a sequence of elements left to right, `g₀ ∘ g₁ ∘ … ∘ gₙ`.
///
/// Returns the identity for an empty sequence.
pub fn product<G: LieGroup>(elements: impl IntoIterator<Item = G>) -> G {
    elements
        .into_iter()
        .fold(G::identity(), |acc, g| acc.compose(&g))
}
