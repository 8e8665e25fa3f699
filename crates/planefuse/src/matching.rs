//! Pairwise plane similarity scoring.
//!
//! Two planar objects are considered the same physical surface when
//!
//! 1. their plane equations are close in the log-map metric (strictly below
//!    the configured threshold),
//! 2. their oriented normals point the same way (same observed face, not the
//!    two sides of a thin slab),
//! 3. their convex hulls overlap: the intersection area relative to either
//!    hull's own area strictly exceeds the configured ratio.
//!
//! The equation and normal gates are cheap; the hull intersection dominates
//! the cost and is only evaluated once the cheap gates pass.

use planefuse_core::{
    convex_hull_2d, intersection_area, log_map, normalize_and_unify, plane_eq_to_quat,
    plane_transform_matrix, points_in_plane, polygon_area, Iso3, Pt3, Real, Vec4,
};
use serde::{Deserialize, Serialize};

use crate::object::PlanarObject;

/// Similarity thresholds for [`LogMapMatcher`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Plane-equation log-map distance must be strictly below this.
    pub eq_diff_threshold: Real,
    /// Bidirectional hull intersection ratio must strictly exceed this.
    pub min_hull_overlap: Real,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            eq_diff_threshold: 0.01,
            min_hull_overlap: 0.3,
        }
    }
}

/// Scores produced for one compared pair.
#[derive(Debug, Clone, Copy)]
pub struct MatchOutcome {
    /// Log-map distance between the two plane equations.
    pub equation_diff: Real,
    /// Dot product of the oriented unit normals.
    pub normal_dot: Real,
    /// Bidirectional hull intersection ratio; `None` when a cheaper gate
    /// already failed and the intersection was not computed.
    pub hull_overlap: Option<Real>,
    /// Final decision.
    pub matched: bool,
}

/// Pairwise plane comparison seam.
///
/// The grouping engine is generic over this trait; [`LogMapMatcher`] is the
/// reference implementation.
pub trait PlaneMatcher {
    /// Compare two objects; `second_to_first` re-expresses `second` in
    /// `first`'s frame (identity when the objects are already
    /// co-registered).
    fn compare(
        &self,
        first: &PlanarObject,
        second: &PlanarObject,
        second_to_first: &Iso3,
    ) -> MatchOutcome;
}

/// Distance between two plane equations in the log-map representation.
///
/// Both equations are carried to sign-unified unit quaternions; the norm of
/// the log-mapped difference quaternion is the score. Equations differing
/// only by sign or numerical noise score near zero.
pub fn plane_eq_diff_log_map(a: &Vec4, b: &Vec4) -> Real {
    let qa = plane_eq_to_quat(a);
    let qb = plane_eq_to_quat(b);
    log_map(&(qa * qb.conjugate())).norm()
}

/// Reference matcher implementing the three-gate comparison.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMapMatcher {
    config: MatchConfig,
}

impl LogMapMatcher {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Bidirectional convex-hull intersection ratio in `first`'s plane.
    ///
    /// Both hulls are projected into the 2D basis of `first`'s plane and
    /// intersected there; the ratio is taken against whichever projected
    /// hull makes it largest, so a detection fully contained in a bigger
    /// one still scores high.
    fn hull_overlap(
        &self,
        first: &PlanarObject,
        second: &PlanarObject,
        second_to_first: &Iso3,
    ) -> Option<Real> {
        let first_pts = first.hull().polygons.iter().flatten().copied();
        let second_pts: Vec<Pt3> = second
            .hull()
            .polygons
            .iter()
            .flatten()
            .map(|p| second_to_first.transform_point(p))
            .collect();

        let a2 = points_in_plane(first_pts, first.equation());
        let b2 = points_in_plane(second_pts, first.equation());
        let hull_a = convex_hull_2d(&a2)?;
        let hull_b = convex_hull_2d(&b2)?;

        let area_a = polygon_area(&hull_a);
        let area_b = polygon_area(&hull_b);
        if area_a <= 0.0 || area_b <= 0.0 {
            return None;
        }
        let inter = intersection_area(&hull_a, &hull_b);
        Some((inter / area_a).max(inter / area_b))
    }
}

impl PlaneMatcher for LogMapMatcher {
    fn compare(
        &self,
        first: &PlanarObject,
        second: &PlanarObject,
        second_to_first: &Iso3,
    ) -> MatchOutcome {
        let plane_mat = plane_transform_matrix(second_to_first);

        let mut second_eq = plane_mat * *second.equation();
        normalize_and_unify(&mut second_eq);
        let second_normal = plane_mat * *second.normal();
        let second_dir = second_normal.fixed_rows::<3>(0).normalize();

        let equation_diff = plane_eq_diff_log_map(first.equation(), &second_eq);
        let normal_dot = first.normal_dir().dot(&second_dir);

        let mut hull_overlap = None;
        let mut matched = false;
        if equation_diff < self.config.eq_diff_threshold && normal_dot > 0.0 {
            hull_overlap = self.hull_overlap(first, second, second_to_first);
            matched = hull_overlap.is_some_and(|r| r > self.config.min_hull_overlap);
        }

        MatchOutcome {
            equation_diff,
            normal_dot,
            hull_overlap,
            matched,
        }
    }
}
