//! Rigid transform application to planar objects.
//!
//! Points transform by rotation + translation; plane equations transform
//! contravariantly via the inverse-transpose of the homogeneous matrix;
//! principal directions rotate with the rotation component only. Curvature
//! and the shorter-extent scalar are rigid invariants. The hull is never
//! transformed, it is rebuilt from the new points and normal.

use planefuse_core::{
    normalize_and_unify, plane_transform_matrix, pose_from_vec7, Iso3, Real, TransformError, Vec3,
};
use thiserror::Error;

use crate::estimator::FitError;
use crate::hull::HullBuilder;
use crate::object::PlanarObject;

/// Failure modes of [`PlanarObject::apply_transform_vec7`].
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error(transparent)]
    Fit(#[from] FitError),
}

impl PlanarObject {
    /// Re-express this object under a rigid transform.
    ///
    /// All-or-nothing: the transformed state (including the rebuilt hull) is
    /// computed first and only then committed, so a failure leaves the
    /// object untouched.
    pub fn apply_transform(
        &mut self,
        iso: &Iso3,
        hull_builder: &dyn HullBuilder,
    ) -> Result<(), FitError> {
        let plane_mat = plane_transform_matrix(iso);

        let mut points = self.points.clone();
        for p in &mut points {
            p.position = iso.transform_point(&p.position);
        }

        let mut equation = plane_mat * self.equation;
        normalize_and_unify(&mut equation);

        // renormalise but keep the voted orientation
        let mut normal = plane_mat * self.normal;
        let scale = normal.fixed_rows::<3>(0).norm();
        normal /= scale;

        let principal_dirs: [Vec3; 3] = [
            iso.rotation * self.principal_dirs[0],
            iso.rotation * self.principal_dirs[1],
            iso.rotation * self.principal_dirs[2],
        ];

        let hull = hull_builder.build_hull(&points, &normal)?;

        self.points = points;
        self.equation = equation;
        self.normal = normal;
        self.principal_dirs = principal_dirs;
        self.hull = hull;
        for seg in &mut self.segments {
            seg.apply_iso(iso);
        }
        Ok(())
    }

    /// [`apply_transform`](Self::apply_transform) from a 7-parameter vector
    /// `(tx, ty, tz, qx, qy, qz, qw)`.
    ///
    /// A non-finite or non-unit quaternion is rejected before any state is
    /// touched; see [`pose_from_vec7`] for the exact policy.
    pub fn apply_transform_vec7(
        &mut self,
        params: &[Real; 7],
        hull_builder: &dyn HullBuilder,
    ) -> Result<(), ApplyError> {
        let iso = pose_from_vec7(params)?;
        self.apply_transform(&iso, hull_builder)?;
        Ok(())
    }
}
