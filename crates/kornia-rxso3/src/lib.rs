#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Kornia RxSO(3)
//!
//! This crate implements RxSO(3) = R⁺ × SO(3), the group of 3D rotations combined with
//! a uniform positive scale. It is the rotation-and-scale block of a similarity
//! transform Sim(3), used in monocular SLAM, bundle adjustment and pose-graph
//! optimization.
//!
//! ## Provided operations
//!
//! - `exp(x)` / `log()`: exponential and logarithmic maps with small-angle series
//! - `compose(&other)` / `inverse()`: group composition and inverse
//! - `act(p)` / `matrix()`: action on 3D points and the `s·R` matrix
//! - `adjoint()` / `lie_bracket(a, b)`: adjoint representation and Lie bracket
//! - `hat(x)` / `vee(M)`: isomorphism between tangent 4-vectors and algebra matrices
//! - map views ([`RxSO3MapF32`], [`RxSO3MapF64`]) operating in place on caller-owned
//!   parameter buffers
//!
//! Tangent vectors are `(ω.x, ω.y, ω.z, σ)` with `ω` the axis-angle rotation generator
//! and `σ` the logarithm of the scale.
//!
//! ## Features
//!
//! - `approx`: implements `approx::AbsDiffEq` and `approx::RelativeEq` for the group
//!   types, comparing the raw `[x, y, z, w]` parameters. Tests depending on it are
//!   gated the same way and run with `cargo test --features approx`.
//!
//! ## Example
//!
//! ```rust
//! use kornia_rxso3::{glam::{DVec3, DVec4}, RxSO3F64};
//!
//! // rotate by 90 degrees about z and double the size
//! let x = DVec4::new(0.0, 0.0, std::f64::consts::FRAC_PI_2, 2.0f64.ln());
//! let g = RxSO3F64::exp(x);
//!
//! let p = g.act(DVec3::new(1.0, 0.0, 0.0));
//! assert!((p - DVec3::new(0.0, 2.0, 0.0)).length() < 1e-12);
//!
//! let back = g.log().unwrap();
//! assert!((back - x).length() < 1e-12);
//! ```

/// Error types for the Lie group operations.
pub mod error;

/// Capability trait shared by the Lie group types.
pub mod group;

/// Non-owning views over caller-managed parameter buffers.
pub mod map;

/// RxSO(3) group types in single and double precision.
pub mod rxso3;

/// Per-precision numeric configuration and scalar helpers.
pub mod scalar;

pub use error::LieError;
pub use group::{product, LieGroup};
pub use map::{RxSO3MapF32, RxSO3MapF64};
pub use rxso3::{RxSO3F32, RxSO3F64};
pub use scalar::LieScalar;

// Re-export the linear algebra backend used in the public API
pub use glam;
