//! Hull builder collaborator interface.
//!
//! The fusion core does not own boundary extraction; it consumes a
//! [`HullBuilder`] and re-invokes it whenever an object's points or normal
//! change. [`ConvexHullBuilder`] is the default, backed by the convex
//! builder in `planefuse-core`; a concave (alpha-shape) builder can be
//! plugged in through the same trait.

use planefuse_core::{convex_plane_hull, PlaneHull, Pt3, Vec4};

use crate::estimator::FitError;
use crate::object::ColoredPoint;

/// Boundary extraction collaborator.
pub trait HullBuilder {
    /// Build a hull bounding `points`, which lie on the plane described by
    /// the oriented equation `normal`.
    fn build_hull(&self, points: &[ColoredPoint], normal: &Vec4) -> Result<PlaneHull, FitError>;
}

/// Convex hull builder (Andrew's monotone chain in the plane's 2D basis).
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvexHullBuilder;

impl HullBuilder for ConvexHullBuilder {
    fn build_hull(&self, points: &[ColoredPoint], normal: &Vec4) -> Result<PlaneHull, FitError> {
        let positions: Vec<Pt3> = points.iter().map(|p| p.position).collect();
        convex_plane_hull(&positions, normal).ok_or(FitError::DegenerateGeometry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use planefuse_core::Real;

    #[test]
    fn builds_square_hull() {
        let mut points = Vec::new();
        for i in 0..4 {
            for j in 0..4 {
                points.push(ColoredPoint::new(Pt3::new(i as Real, j as Real, 0.0)));
            }
        }
        let normal = Vec4::new(0.0, 0.0, 1.0, 0.0);
        let hull = ConvexHullBuilder.build_hull(&points, &normal).unwrap();
        assert_eq!(hull.polygons.len(), 1);
        assert_relative_eq!(hull.area, 9.0, epsilon = 1e-9);
    }

    #[test]
    fn degenerate_input_is_an_error() {
        let points: Vec<ColoredPoint> = (0..5)
            .map(|i| ColoredPoint::new(Pt3::new(i as Real, 0.0, 0.0)))
            .collect();
        let normal = Vec4::new(0.0, 0.0, 1.0, 0.0);
        assert!(matches!(
            ConvexHullBuilder.build_hull(&points, &normal),
            Err(FitError::DegenerateGeometry)
        ));
    }
}
