//! Merging one equivalence class of plane detections into a single object.
//!
//! The merged plane equation is a point-count-weighted mean computed in the
//! log-map domain of the equations' quaternion representations; a naive
//! linear average of `(normal, distance)` tuples is not a valid normalized
//! plane equation and is not well defined on the orientation manifold.
//! Member point sets are projected onto the mean plane, concatenated, and a
//! brand-new object is derived from scratch through the estimator path.

use planefuse_core::{exp_map, log_map, plane_eq_to_quat, project_point_to_plane, quat_to_plane_eq, Real, Vec3, Vec4};
use thiserror::Error;

use crate::estimator::FitError;
use crate::hull::HullBuilder;
use crate::object::{ColoredPoint, PlanarObject, PlaneSegment};

/// Failure modes of [`merge_group`].
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("cannot merge an empty group")]
    EmptyGroup,
    #[error("weighted mean of plane equations collapsed to no direction")]
    DegenerateMean,
    #[error(transparent)]
    Fit(#[from] FitError),
}

/// Point-count-weighted manifold mean of the members' plane equations.
///
/// The members are log-mapped relative to the first member's quaternion
/// representative, not in the global chart: a plane through the origin has
/// `d` near zero and lands at the antipode of the global chart, where the
/// double-cover sign flip sends near-identical equations to opposite tangent
/// vectors. Relative to a member, the whole group sits near identity.
///
/// Returns the mean as a plane equation with unit normal part.
pub fn weighted_mean_equation(objects: &[&PlanarObject]) -> Result<Vec4, MergeError> {
    if objects.is_empty() {
        return Err(MergeError::EmptyGroup);
    }
    let reference = plane_eq_to_quat(objects[0].equation());
    let mut mean_log = Vec3::zeros();
    let mut total_weight = 0.0;
    for obj in objects {
        let weight = obj.point_count() as Real;
        let rel = reference.conjugate() * plane_eq_to_quat(obj.equation());
        mean_log += log_map(&rel) * weight;
        total_weight += weight;
    }
    mean_log /= total_weight;

    quat_to_plane_eq(&(reference * exp_map(&mean_log))).ok_or(MergeError::DegenerateMean)
}

/// Collapse a group of detections of the same physical plane into one
/// brand-new object.
///
/// Every member's points are projected orthogonally onto the weighted mean
/// plane and concatenated in member order; constituent segments are
/// concatenated without deduplication to preserve provenance. The result is
/// re-derived from the merged geometry (normal, principal directions,
/// curvature and hull are all recomputed, not inherited) and carries the
/// placeholder id 0.
pub fn merge_group(
    objects: &[&PlanarObject],
    hull_builder: &dyn HullBuilder,
) -> Result<PlanarObject, MergeError> {
    let mean_eq = weighted_mean_equation(objects)?;

    let total_points: usize = objects.iter().map(|o| o.point_count()).sum();
    let mut points = Vec::with_capacity(total_points);
    let mut segments = Vec::new();
    for obj in objects {
        for p in obj.points() {
            points.push(ColoredPoint::with_color(
                project_point_to_plane(&p.position, &mean_eq),
                p.color,
            ));
        }
        segments.extend(obj.segments().iter().cloned());
    }

    let merged = PlanarObject::from_segments(0, points, segments, hull_builder)?;
    Ok(merged)
}
