//! Quaternion logarithmic/exponential maps and plane-equation conventions.
//!
//! Averaging orientations (or normalized plane equations) linearly is not
//! well defined: the arithmetic mean of unit 4-vectors is in general not a
//! unit 4-vector, and antipodal representatives of the same element cancel.
//! Instead, elements are mapped into the tangent space at identity via
//! [`log_map`], averaged there, and mapped back via [`exp_map`].
//!
//! Plane equations `(nx, ny, nz, d)` are carried into quaternion space as
//! `q = (x: nx, y: ny, z: nz, w: d)` normalized to unit length, so the same
//! machinery serves both rotation averaging and plane-equation averaging.

use nalgebra::Quaternion;

use crate::math::{Real, Vec3, Vec4};

/// Angle below which the log/exp maps switch to their small-angle forms.
const SMALL_ANGLE: Real = 1e-12;

/// Logarithmic map of a unit quaternion into `R^3`.
///
/// Returns the rotation vector `theta * axis`. The map is sign-insensitive:
/// `q` and `-q` produce the same result (the shorter geodesic is taken).
pub fn log_map(q: &Quaternion<Real>) -> Vec3 {
    let (w, v) = if q.w < 0.0 {
        (-q.w, -q.imag())
    } else {
        (q.w, q.imag())
    };
    let vn = v.norm();
    if vn < SMALL_ANGLE {
        // first-order expansion around identity
        return v * 2.0;
    }
    let theta = 2.0 * vn.atan2(w);
    v * (theta / vn)
}

/// Exponential map of an `R^3` rotation vector back onto the unit quaternion
/// manifold. Inverse of [`log_map`] for angles in `[0, pi]`.
pub fn exp_map(v: &Vec3) -> Quaternion<Real> {
    let theta = v.norm();
    if theta < SMALL_ANGLE {
        let q = Quaternion::from_parts(1.0, v * 0.5);
        return q.normalize();
    }
    let half = theta * 0.5;
    Quaternion::from_parts(half.cos(), v * (half.sin() / theta))
}

/// Flip the sign of a 4-vector so that its largest-magnitude component is
/// positive. Deterministic, independent of eigen-decomposition or quaternion
/// double-cover sign ambiguity.
pub fn unify_sign(v: &mut Vec4) {
    let mut lead = 0;
    for i in 1..4 {
        if v[i].abs() > v[lead].abs() {
            lead = i;
        }
    }
    if v[lead] < 0.0 {
        *v = -*v;
    }
}

/// Normalize a plane equation so its normal part has unit length, then
/// enforce the canonical sign convention of [`unify_sign`].
///
/// The caller must ensure the normal part is nonzero.
pub fn normalize_and_unify(eq: &mut Vec4) {
    let n = eq.fixed_rows::<3>(0).norm();
    *eq /= n;
    unify_sign(eq);
}

/// Map a plane equation to a sign-unified unit quaternion
/// `(x: nx, y: ny, z: nz, w: d)`.
pub fn plane_eq_to_quat(eq: &Vec4) -> Quaternion<Real> {
    let mut v = *eq / eq.norm();
    unify_sign(&mut v);
    Quaternion::new(v.w, v.x, v.y, v.z)
}

/// Map a quaternion back to a plane equation with unit normal part.
///
/// Returns `None` when the imaginary part is numerically zero (no plane
/// direction can be recovered).
pub fn quat_to_plane_eq(q: &Quaternion<Real>) -> Option<Vec4> {
    let mut eq = Vec4::new(q.i, q.j, q.k, q.w);
    let n = eq.fixed_rows::<3>(0).norm();
    if n < SMALL_ANGLE {
        return None;
    }
    eq /= n;
    unify_sign(&mut eq);
    Some(eq)
}
