//! Plane fitting via principal component analysis.
//!
//! The eigenvector of the smallest eigenvalue of the point covariance is the
//! plane normal; the other two eigenvectors are the in-plane principal
//! directions, ordered by decreasing eigenvalue. Degenerate point sets
//! (too few points, coincident or collinear) are rejected with a typed
//! error instead of producing NaN normals.

use planefuse_core::{Mat3, Real, Vec3, Vec4};
use thiserror::Error;

use crate::object::ColoredPoint;

/// Minimal number of points accepted by [`fit_plane`].
pub const MIN_FIT_POINTS: usize = 3;

/// Eigenvalue-ratio threshold below which the point set is considered
/// rank-deficient (collinear or coincident).
const RANK_THRESHOLD: Real = 1e-8;

/// Failure modes of plane estimation.
#[derive(Debug, Error)]
pub enum FitError {
    #[error("need at least {MIN_FIT_POINTS} points to fit a plane, got {0}")]
    NotEnoughPoints(usize),
    #[error("degenerate geometry: points do not span a plane")]
    DegenerateGeometry,
}

/// Result of a covariance-PCA plane fit.
///
/// The equation sign is as computed from the eigen-decomposition; normal
/// orientation against constituent segments and canonicalisation are the
/// caller's concern (see [`PlanarObject::from_segments`]).
///
/// [`PlanarObject::from_segments`]: crate::object::PlanarObject::from_segments
#[derive(Debug, Clone)]
pub struct PlaneFit {
    /// Plane equation `(nx, ny, nz, d)` with unit normal part.
    pub equation: Vec4,
    /// Centroid of the input points.
    pub centroid: Vec3,
    /// Principal directions ordered by decreasing eigenvalue; the third is
    /// the plane normal.
    pub principal_dirs: [Vec3; 3],
    /// Eigenvalues of the (unnormalised) point covariance, decreasing.
    pub principal_lens: [Real; 3],
    /// Smallest eigenvalue over the eigenvalue sum.
    pub curvature: Real,
    /// `sqrt(second eigenvalue / point count)` — RMS extent along the
    /// shorter side of the bounding rectangle approximation.
    pub shorter_extent: Real,
}

/// Fit a plane to a point set via covariance eigen-decomposition.
///
/// # Algorithm
///
/// 1. Compute the centroid
/// 2. Build the 3x3 covariance matrix of centered points
/// 3. Eigen-decompose; smallest eigenvector is the plane normal
/// 4. Signed distance is `-normal · centroid`
///
/// Collinear or coincident point sets are detected by an eigenvalue rank
/// check and rejected with [`FitError::DegenerateGeometry`].
pub fn fit_plane(points: &[ColoredPoint]) -> Result<PlaneFit, FitError> {
    if points.len() < MIN_FIT_POINTS {
        return Err(FitError::NotEnoughPoints(points.len()));
    }

    let n = points.len() as Real;
    let mut centroid = Vec3::zeros();
    for p in points {
        centroid += p.position.coords;
    }
    centroid /= n;

    let mut cov = Mat3::zeros();
    for p in points {
        let centered = p.position.coords - centroid;
        cov += centered * centered.transpose();
    }

    let eigen = cov.symmetric_eigen();
    let mut order: [usize; 3] = [0, 1, 2];
    order.sort_by(|&a, &b| {
        eigen.eigenvalues[b]
            .partial_cmp(&eigen.eigenvalues[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let lens = [
        eigen.eigenvalues[order[0]],
        eigen.eigenvalues[order[1]],
        eigen.eigenvalues[order[2]],
    ];

    // rank check: a plane needs two significant spatial extents
    if lens[0] > RANK_THRESHOLD {
        if lens[1] / lens[0] < RANK_THRESHOLD {
            return Err(FitError::DegenerateGeometry);
        }
    } else {
        // all eigenvalues near zero: every point at the same location
        return Err(FitError::DegenerateGeometry);
    }

    let dirs = [
        eigen.eigenvectors.column(order[0]).into_owned(),
        eigen.eigenvectors.column(order[1]).into_owned(),
        eigen.eigenvectors.column(order[2]).into_owned(),
    ];

    let normal = dirs[2].normalize();
    let distance = -normal.dot(&centroid);
    let equation = Vec4::new(normal.x, normal.y, normal.z, distance);

    Ok(PlaneFit {
        equation,
        centroid,
        principal_dirs: [dirs[0].normalize(), dirs[1].normalize(), normal],
        principal_lens: lens,
        curvature: lens[2] / (lens[0] + lens[1] + lens[2]),
        shorter_extent: (lens[1] / n).sqrt(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use planefuse_core::Pt3;

    fn colored(points: impl IntoIterator<Item = Pt3>) -> Vec<ColoredPoint> {
        points.into_iter().map(ColoredPoint::new).collect()
    }

    #[test]
    fn fits_axis_aligned_plane() {
        // z = 0.5
        let points = colored([
            Pt3::new(0.0, 0.0, 0.5),
            Pt3::new(1.0, 0.0, 0.5),
            Pt3::new(0.0, 1.0, 0.5),
            Pt3::new(1.0, 1.0, 0.5),
            Pt3::new(0.5, 0.5, 0.5),
        ]);

        let fit = fit_plane(&points).unwrap();
        assert_relative_eq!(fit.equation.fixed_rows::<3>(0).norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(fit.equation.z.abs(), 1.0, epsilon = 1e-9);
        // n·p + d = 0 for any input point, whichever sign the normal took
        let res = fit.equation.z * 0.5 + fit.equation.w;
        assert_relative_eq!(res, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn fits_tilted_plane() {
        // z = 0.5x + 0.3
        let points = colored([
            Pt3::new(0.0, 0.0, 0.3),
            Pt3::new(1.0, 0.0, 0.8),
            Pt3::new(0.0, 1.0, 0.3),
            Pt3::new(1.0, 1.0, 0.8),
            Pt3::new(0.5, 0.5, 0.55),
        ]);

        let fit = fit_plane(&points).unwrap();
        let expected = Vec3::new(-0.5, 0.0, 1.0).normalize();
        let n = fit.equation.fixed_rows::<3>(0).into_owned();
        assert!(n.dot(&expected).abs() > 0.999_999, "normal off: {n}");
    }

    #[test]
    fn principal_dirs_are_orthonormal_and_ordered() {
        let points = colored([
            Pt3::new(0.0, 0.0, 0.0),
            Pt3::new(4.0, 0.0, 0.0),
            Pt3::new(0.0, 1.0, 0.0),
            Pt3::new(4.0, 1.0, 0.0),
            Pt3::new(2.0, 0.5, 0.0),
        ]);

        let fit = fit_plane(&points).unwrap();
        for d in &fit.principal_dirs {
            assert_relative_eq!(d.norm(), 1.0, epsilon = 1e-12);
        }
        assert_relative_eq!(fit.principal_dirs[0].dot(&fit.principal_dirs[1]), 0.0, epsilon = 1e-9);
        assert_relative_eq!(fit.principal_dirs[0].dot(&fit.principal_dirs[2]), 0.0, epsilon = 1e-9);
        assert!(fit.principal_lens[0] >= fit.principal_lens[1]);
        assert!(fit.principal_lens[1] >= fit.principal_lens[2]);
        // the long axis is x
        assert!(fit.principal_dirs[0].x.abs() > 0.999);
    }

    #[test]
    fn curvature_of_flat_points_is_zero() {
        let points = colored([
            Pt3::new(0.0, 0.0, 0.0),
            Pt3::new(1.0, 0.0, 0.0),
            Pt3::new(0.0, 1.0, 0.0),
            Pt3::new(1.0, 1.0, 0.0),
        ]);
        let fit = fit_plane(&points).unwrap();
        assert!(fit.curvature.abs() < 1e-12);
    }

    #[test]
    fn survives_measurement_noise() {
        use rand::{Rng, SeedableRng};
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let mut points = Vec::new();
        for i in 0..30 {
            for j in 0..30 {
                let noise: Real = rng.random_range(-1e-3..1e-3);
                points.push(ColoredPoint::new(Pt3::new(
                    i as Real * 0.1,
                    j as Real * 0.1,
                    2.0 + noise,
                )));
            }
        }
        let fit = fit_plane(&points).unwrap();
        let n = fit.equation.fixed_rows::<3>(0).into_owned();
        assert!(n.z.abs() > 0.999_99);
        assert!((n.z * 2.0 + fit.equation.w).abs() < 1e-3);
        assert!(fit.curvature < 1e-4);
    }

    #[test]
    fn rejects_too_few_points() {
        let points = colored([Pt3::new(0.0, 0.0, 0.0), Pt3::new(1.0, 0.0, 0.0)]);
        assert!(matches!(
            fit_plane(&points),
            Err(FitError::NotEnoughPoints(2))
        ));
    }

    #[test]
    fn rejects_collinear_points() {
        let points = colored((0..8).map(|i| Pt3::new(i as Real, 2.0 * i as Real, 0.0)));
        assert!(matches!(
            fit_plane(&points),
            Err(FitError::DegenerateGeometry)
        ));
    }

    #[test]
    fn rejects_coincident_points() {
        let points = colored(std::iter::repeat(Pt3::new(1.0, 2.0, 3.0)).take(6));
        assert!(matches!(
            fit_plane(&points),
            Err(FitError::DegenerateGeometry)
        ));
    }
}
