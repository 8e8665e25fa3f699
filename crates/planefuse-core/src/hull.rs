//! Convex hull of a 3D point set lying on (or near) a plane.
//!
//! Points are projected orthogonally onto the plane, expressed in a
//! deterministic in-plane basis, hulled in 2D and lifted back to 3D. The
//! resulting boundary is the "hull" the matcher intersects and the data
//! model caches; it must be rebuilt whenever points or normal change.

use crate::math::{Pt3, Real, Vec2, Vec3, Vec4};
use crate::polygon::{convex_hull_2d, polygon_area};

/// Polygonal boundary of a planar point set.
///
/// One or more simple 3D polygons plus their total area. The convex builder
/// always produces a single polygon; the multi-polygon representation keeps
/// the door open for concave builders producing disconnected outlines.
#[derive(Debug, Clone, Default)]
pub struct PlaneHull {
    /// Boundary polygons, vertices in CCW order as seen from the normal side.
    pub polygons: Vec<Vec<Pt3>>,
    /// Total polygon area.
    pub area: Real,
}

impl PlaneHull {
    /// Total number of boundary vertices across all polygons.
    pub fn vertex_count(&self) -> usize {
        self.polygons.iter().map(Vec::len).sum()
    }
}

/// Deterministic orthonormal in-plane basis `(u, v)` for a unit normal.
///
/// Seeds from the world axis least aligned with the normal, so nearby
/// normals yield nearby bases.
pub fn plane_basis(normal: &Vec3) -> (Vec3, Vec3) {
    let ax = normal.x.abs();
    let ay = normal.y.abs();
    let az = normal.z.abs();
    let seed = if ax <= ay && ax <= az {
        Vec3::x()
    } else if ay <= az {
        Vec3::y()
    } else {
        Vec3::z()
    };
    let u = normal.cross(&seed).normalize();
    let v = normal.cross(&u);
    (u, v)
}

/// Orthogonal projection of a point onto the plane `{p : n·p + d = 0}`.
///
/// The equation's normal part must be unit length.
#[inline]
pub fn project_point_to_plane(p: &Pt3, equation: &Vec4) -> Pt3 {
    let n = equation.fixed_rows::<3>(0).into_owned();
    let dist = n.dot(&p.coords) + equation.w;
    Pt3::from(p.coords - n * dist)
}

/// Express points in 2D in-plane coordinates of the given plane equation.
///
/// Points are first projected orthogonally onto the plane, then decomposed
/// in the [`plane_basis`] of the equation's normal.
pub fn points_in_plane(points: impl IntoIterator<Item = Pt3>, equation: &Vec4) -> Vec<Vec2> {
    let n = equation.fixed_rows::<3>(0).into_owned();
    let (u, v) = plane_basis(&n);
    points
        .into_iter()
        .map(|p| {
            let q = project_point_to_plane(&p, equation);
            Vec2::new(u.dot(&q.coords), v.dot(&q.coords))
        })
        .collect()
}

/// Build the convex hull of a planar point set.
///
/// `equation` is the plane the points lie on, `(nx, ny, nz, d)` with unit
/// normal part. Returns `None` when the projected points do not span a 2D
/// region (fewer than 3 distinct points, or all collinear).
pub fn convex_plane_hull(points: &[Pt3], equation: &Vec4) -> Option<PlaneHull> {
    let pts_2d = points_in_plane(points.iter().copied(), equation);
    let hull_2d = convex_hull_2d(&pts_2d)?;
    let area = polygon_area(&hull_2d);

    let n = equation.fixed_rows::<3>(0).into_owned();
    let (u, v) = plane_basis(&n);
    // any in-plane point serves as the lift origin
    let origin = n * (-equation.w);
    let polygon = hull_2d
        .iter()
        .map(|p| Pt3::from(origin + u * p.x + v * p.y))
        .collect();

    Some(PlaneHull {
        polygons: vec![polygon],
        area,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn basis_is_orthonormal() {
        let normals = [
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.6, -0.48, 0.64),
        ];
        for n in normals {
            let n = n.normalize();
            let (u, v) = plane_basis(&n);
            assert_relative_eq!(u.norm(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(v.norm(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(u.dot(&v), 0.0, epsilon = 1e-12);
            assert_relative_eq!(u.dot(&n), 0.0, epsilon = 1e-12);
            assert_relative_eq!(v.dot(&n), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn projection_lands_on_plane() {
        let eq = Vec4::new(0.0, 0.0, 1.0, -2.0); // z = 2
        let p = project_point_to_plane(&Pt3::new(1.0, -3.0, 7.5), &eq);
        assert_relative_eq!(p.z, 2.0, epsilon = 1e-12);
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, -3.0, epsilon = 1e-12);
    }

    #[test]
    fn square_hull_area() {
        let eq = Vec4::new(0.0, 0.0, 1.0, 0.0);
        let mut points = Vec::new();
        for i in 0..5 {
            for j in 0..5 {
                points.push(Pt3::new(i as Real, j as Real, 0.0));
            }
        }
        let hull = convex_plane_hull(&points, &eq).unwrap();
        assert_eq!(hull.polygons.len(), 1);
        assert_relative_eq!(hull.area, 16.0, epsilon = 1e-9);
        for v in &hull.polygons[0] {
            assert_relative_eq!(v.z, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn hull_of_collinear_points_is_none() {
        let eq = Vec4::new(0.0, 0.0, 1.0, 0.0);
        let points: Vec<Pt3> = (0..10).map(|i| Pt3::new(i as Real, 0.0, 0.0)).collect();
        assert!(convex_plane_hull(&points, &eq).is_none());
    }

    #[test]
    fn tilted_plane_hull_vertices_satisfy_equation() {
        let mut eq = Vec4::new(1.0, 1.0, 1.0, -1.0);
        crate::manifold::normalize_and_unify(&mut eq);
        let n = eq.fixed_rows::<3>(0).into_owned();
        let (u, v) = plane_basis(&n);
        let origin = n * (-eq.w);
        let mut points = Vec::new();
        for i in -3i32..=3 {
            for j in -3i32..=3 {
                points.push(Pt3::from(origin + u * (i as Real) + v * (j as Real)));
            }
        }
        let hull = convex_plane_hull(&points, &eq).unwrap();
        for p in &hull.polygons[0] {
            let res = n.dot(&p.coords) + eq.w;
            assert_relative_eq!(res, 0.0, epsilon = 1e-9);
        }
        assert_relative_eq!(hull.area, 36.0, epsilon = 1e-9);
    }
}
