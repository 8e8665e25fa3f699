//! Fusion of repeated planar-surface detections into consistent planar
//! objects.
//!
//! A 3D reconstruction pipeline observes the same physical plane many times,
//! across viewpoints and batches. This crate fuses those detections:
//!
//! 1. [`estimator`] fits a plane to each detection's point set via covariance
//!    eigen-decomposition and resolves the normal orientation from the
//!    constituent segments' votes;
//! 2. [`transform`] re-expresses objects under rigid SE(3) transforms,
//!    transforming plane equations contravariantly;
//! 3. [`matching`] scores pairs of planar objects for equivalence (equation
//!    log-map distance, same-face gate, convex hull overlap);
//! 4. [`grouping`] runs the matcher over all pairs and partitions detections
//!    into equivalence classes with a union-find structure;
//! 5. [`merge`] collapses each class into one fresh object using a
//!    point-count-weighted manifold mean of the plane equations.
//!
//! Everything is single-threaded, synchronous and deterministic. Optional
//! instrumentation goes through the [`observer`] interface; the fusion
//! control flow is identical with or without an observer attached.
//!
//! The all-pairs comparison is quadratic in the total detection count. That
//! is fine for the expected scale (tens to low hundreds of planar detections
//! per reconstruction) and is the known scaling limit of this stage.

/// Planar object data model.
pub mod object;

/// Plane fitting via principal component analysis.
pub mod estimator;

/// Hull builder collaborator interface and the default convex builder.
pub mod hull;

/// Rigid transform application to planar objects.
pub mod transform;

/// Pairwise plane similarity scoring.
pub mod matching;

/// All-pairs grouping and fusion driver.
pub mod grouping;

/// Merging one equivalence class into a single object.
pub mod merge;

/// Optional inspection-event observer.
pub mod observer;

pub use estimator::{fit_plane, FitError, PlaneFit};
pub use grouping::{fuse_batches, DetectionRef, UnionFind};
pub use hull::{ConvexHullBuilder, HullBuilder};
pub use matching::{LogMapMatcher, MatchConfig, MatchOutcome, PlaneMatcher};
pub use merge::{merge_group, MergeError};
pub use object::{ColoredPoint, ObjectType, PlanarObject, PlaneSegment};
pub use observer::{FusionObserver, InspectionEvent, NullObserver};
pub use planefuse_core::{pose_from_vec7, Iso3, Pt3, Real, TransformError, Vec3, Vec4};
