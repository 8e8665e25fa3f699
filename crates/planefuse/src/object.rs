//! Planar object data model.
//!
//! [`PlanarObject`] is the central entity: a planar surface detection (or a
//! fusion of several) with its point set, plane equation, principal
//! directions, constituent segments and cached hull. Construction goes
//! through the PCA estimator; the orientation of the normal is resolved by a
//! majority vote over the constituent segments' own normals.

use log::{debug, warn};
use planefuse_core::{normalize_and_unify, Iso3, PlaneHull, Pt3, Real, Vec3, Vec4};

use crate::estimator::{fit_plane, FitError};
use crate::hull::HullBuilder;

/// 3D point with an RGB color riding along.
///
/// Color takes no part in any geometric computation; it is carried through
/// transforms, projections and concatenations untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColoredPoint {
    pub position: Pt3,
    pub color: [u8; 3],
}

impl ColoredPoint {
    /// Point with a default (black) color.
    pub fn new(position: Pt3) -> Self {
        Self {
            position,
            color: [0, 0, 0],
        }
    }

    pub fn with_color(position: Pt3, color: [u8; 3]) -> Self {
        Self { position, color }
    }
}

/// One original small planar detection grouped into a larger object.
///
/// Keeps its own provisional normal and point subset; both are transformed
/// whenever the owning object is transformed.
#[derive(Debug, Clone)]
pub struct PlaneSegment {
    pub id: u64,
    /// Unit normal of this segment in the current frame.
    pub normal: Vec3,
    pub points: Vec<ColoredPoint>,
}

impl PlaneSegment {
    pub fn new(id: u64, normal: Vec3, points: Vec<ColoredPoint>) -> Self {
        Self {
            id,
            normal: normal.normalize(),
            points,
        }
    }

    pub(crate) fn apply_iso(&mut self, iso: &Iso3) {
        self.normal = iso.rotation * self.normal;
        for p in &mut self.points {
            p.position = iso.transform_point(&p.position);
        }
    }
}

/// Object-type tag. Currently planes only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Plane,
}

/// A fused (or about-to-be-fused) planar surface detection.
///
/// Invariants maintained across construction and transform application:
/// - the equation's normal part has unit length and canonical sign,
/// - the separately stored oriented normal agrees with the majority of the
///   constituent segments,
/// - the principal directions are mutually orthonormal,
/// - the hull is built from the current points and oriented normal.
#[derive(Debug, Clone)]
pub struct PlanarObject {
    pub(crate) id: u64,
    pub(crate) object_type: ObjectType,
    pub(crate) points: Vec<ColoredPoint>,
    /// Plane equation `(nx, ny, nz, d)`, unit normal part, canonical sign.
    pub(crate) equation: Vec4,
    /// Oriented equation: same plane, sign chosen by the segment vote.
    pub(crate) normal: Vec4,
    pub(crate) principal_dirs: [Vec3; 3],
    pub(crate) principal_lens: [Real; 3],
    pub(crate) shorter_extent: Real,
    pub(crate) curvature: Real,
    pub(crate) segments: Vec<PlaneSegment>,
    pub(crate) hull: PlaneHull,
}

impl PlanarObject {
    /// Build a planar object from a point set and its constituent segments.
    ///
    /// Fits the plane via [`fit_plane`], resolves the normal orientation by
    /// majority vote over the segments' normals (a mixed vote is logged as a
    /// data-quality anomaly and resolved deterministically; a tie keeps the
    /// sign as computed), canonicalises the stored equation and builds the
    /// hull from the points and the oriented normal.
    pub fn from_segments(
        id: u64,
        points: Vec<ColoredPoint>,
        segments: Vec<PlaneSegment>,
        hull_builder: &dyn HullBuilder,
    ) -> Result<Self, FitError> {
        let fit = fit_plane(&points)?;

        let fitted_normal = fit.equation.fixed_rows::<3>(0).into_owned();
        let mut correct = 0usize;
        let mut incorrect = 0usize;
        for seg in &segments {
            if seg.normal.dot(&fitted_normal) < 0.0 {
                incorrect += 1;
            } else {
                correct += 1;
            }
        }
        if incorrect != 0 && correct != 0 {
            warn!(
                "object {id}: constituent segments disagree on normal orientation \
                 ({correct} aligned, {incorrect} flipped); keeping the majority"
            );
            for seg in &segments {
                debug!("segment {} normal: {:?}", seg.id, seg.normal);
            }
        }
        let mut oriented = fit.equation;
        if incorrect > correct {
            oriented = -oriented;
        }

        let mut equation = oriented;
        normalize_and_unify(&mut equation);

        let hull = hull_builder.build_hull(&points, &oriented)?;

        Ok(Self {
            id,
            object_type: ObjectType::Plane,
            points,
            equation,
            normal: oriented,
            principal_dirs: fit.principal_dirs,
            principal_lens: fit.principal_lens,
            shorter_extent: fit.shorter_extent,
            curvature: fit.curvature,
            segments,
            hull,
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Merged objects are created with a placeholder id; downstream map
    /// assembly renumbers them.
    pub fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    pub fn object_type(&self) -> ObjectType {
        self.object_type
    }

    pub fn points(&self) -> &[ColoredPoint] {
        &self.points
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Canonically signed plane equation `(nx, ny, nz, d)`.
    pub fn equation(&self) -> &Vec4 {
        &self.equation
    }

    /// Oriented plane equation, sign from the segment majority vote.
    pub fn normal(&self) -> &Vec4 {
        &self.normal
    }

    /// Oriented unit normal direction.
    pub fn normal_dir(&self) -> Vec3 {
        self.normal.fixed_rows::<3>(0).into_owned()
    }

    pub fn principal_dirs(&self) -> &[Vec3; 3] {
        &self.principal_dirs
    }

    pub fn principal_lens(&self) -> &[Real; 3] {
        &self.principal_lens
    }

    pub fn shorter_extent(&self) -> Real {
        self.shorter_extent
    }

    pub fn curvature(&self) -> Real {
        self.curvature
    }

    pub fn segments(&self) -> &[PlaneSegment] {
        &self.segments
    }

    pub fn hull(&self) -> &PlaneHull {
        &self.hull
    }
}
