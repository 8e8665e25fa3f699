//! Math and geometry primitives for `planefusion-rs`.
//!
//! This crate contains:
//! - linear algebra type aliases (`Real`, `Vec3`, `Pt3`, ...),
//! - quaternion manifold maps (`log_map`/`exp_map`) and plane-equation
//!   canonicalisation used for orientation-aware averaging,
//! - 2D convex polygon primitives (hull, area, clipping),
//! - a convex hull builder for point sets lying on a 3D plane.
//!
//! Plane equations are 4-vectors `(nx, ny, nz, d)` with unit `(nx, ny, nz)`
//! describing `{p : n·p + d = 0}`.

/// Linear algebra type aliases and rigid transform helpers.
pub mod math;

/// Quaternion log/exp maps and plane-equation sign conventions.
pub mod manifold;

/// 2D convex polygon primitives.
pub mod polygon;

/// Convex hull of a planar 3D point set.
pub mod hull;

pub use hull::*;
pub use manifold::*;
pub use math::*;
pub use polygon::*;
