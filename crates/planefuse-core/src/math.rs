//! Mathematical utilities and type definitions.
//!
//! This module provides the fundamental types used throughout the library
//! and helpers for building rigid transforms from raw parameter vectors.

use nalgebra::{Isometry3, Matrix3, Matrix4, Point3, Quaternion, UnitQuaternion, Vector2, Vector3, Vector4};
use thiserror::Error;

/// Scalar type used throughout the library (currently `f64`).
pub type Real = f64;

/// 2D vector with [`Real`] components.
pub type Vec2 = Vector2<Real>;
/// 3D vector with [`Real`] components.
pub type Vec3 = Vector3<Real>;
/// 4D vector with [`Real`] components (plane equations, homogeneous points).
pub type Vec4 = Vector4<Real>;
/// 3D point with [`Real`] coordinates.
pub type Pt3 = Point3<Real>;
/// 3×3 matrix with [`Real`] entries.
pub type Mat3 = Matrix3<Real>;
/// 4×4 matrix with [`Real`] entries.
pub type Mat4 = Matrix4<Real>;
/// 3D rigid transform (SE(3)) using [`Real`].
pub type Iso3 = Isometry3<Real>;
/// Unit quaternion rotation using [`Real`].
pub type Quat = UnitQuaternion<Real>;

/// Maximum tolerated deviation of a quaternion norm from 1 in
/// [`pose_from_vec7`] before the input is rejected.
pub const QUAT_NORM_TOL: Real = 1e-6;

/// Failure modes of rigid transform construction.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("transform contains non-finite components")]
    NonFinite,
    #[error("quaternion norm {0} deviates from 1 by more than {QUAT_NORM_TOL}")]
    NonUnitQuaternion(Real),
}

/// Build an SE(3) transform from a 7-parameter vector
/// `(tx, ty, tz, qx, qy, qz, qw)`.
///
/// The quaternion part must be finite and unit up to [`QUAT_NORM_TOL`];
/// within tolerance it is renormalised exactly, beyond it the input is
/// rejected. Validation happens before anything is constructed, so a
/// malformed vector never produces a partially valid transform.
pub fn pose_from_vec7(params: &[Real; 7]) -> Result<Iso3, TransformError> {
    if params.iter().any(|v| !v.is_finite()) {
        return Err(TransformError::NonFinite);
    }
    let quat = Quaternion::new(params[6], params[3], params[4], params[5]);
    let norm = quat.norm();
    if (norm - 1.0).abs() > QUAT_NORM_TOL {
        return Err(TransformError::NonUnitQuaternion(norm));
    }
    let rotation = UnitQuaternion::from_quaternion(quat);
    let translation = Vector3::new(params[0], params[1], params[2]);
    Ok(Iso3::from_parts(translation.into(), rotation))
}

/// Inverse-transpose of the homogeneous matrix of `iso`.
///
/// Plane equations transform contravariantly: for points `p' = T p`, the
/// equation 4-vector transforms as `e' = (T^-1)^T e`. Applying the direct
/// rotation to the normal alone is wrong whenever the transform translates.
pub fn plane_transform_matrix(iso: &Iso3) -> Mat4 {
    iso.inverse().to_homogeneous().transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn vec7_identity() {
        let iso = pose_from_vec7(&[0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]).unwrap();
        assert_relative_eq!(iso.to_homogeneous(), Mat4::identity(), epsilon = 1e-15);
    }

    #[test]
    fn vec7_rejects_non_unit_quaternion() {
        let err = pose_from_vec7(&[0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.1]).unwrap_err();
        assert!(matches!(err, TransformError::NonUnitQuaternion(_)));
    }

    #[test]
    fn vec7_rejects_nan() {
        let err = pose_from_vec7(&[0.0, Real::NAN, 0.0, 0.0, 0.0, 0.0, 1.0]).unwrap_err();
        assert!(matches!(err, TransformError::NonFinite));
    }

    #[test]
    fn vec7_renormalises_within_tolerance() {
        let eps = 1e-8;
        let iso = pose_from_vec7(&[1.0, 2.0, 3.0, 0.0, 0.0, 0.0, 1.0 + eps]).unwrap();
        assert_relative_eq!(iso.rotation.norm(), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn plane_transform_is_inverse_transpose() {
        let iso = Iso3::from_parts(
            Vector3::new(0.5, -1.0, 2.0).into(),
            UnitQuaternion::from_scaled_axis(Vector3::new(0.1, 0.2, -0.3)),
        );
        let m = plane_transform_matrix(&iso);
        let expected = iso.to_homogeneous().try_inverse().unwrap().transpose();
        assert_relative_eq!(m, expected, epsilon = 1e-12);
    }
}
