//! All-pairs grouping and fusion driver.
//!
//! Every detection across all batches gets a flat integer id (prefix sums
//! over batch sizes); a disjoint-set structure over those ids records which
//! detections the matcher considers the same physical plane. Groups of size
//! one pass through unchanged, larger groups are collapsed by the merger.
//!
//! The pair loop is quadratic in the total detection count; at the expected
//! scale (tens to low hundreds of detections) the hull intersections inside
//! the matcher dominate the runtime.

use std::collections::BTreeMap;

use log::{debug, info, warn};
use planefuse_core::Iso3;

use crate::hull::HullBuilder;
use crate::matching::PlaneMatcher;
use crate::merge::merge_group;
use crate::object::PlanarObject;
use crate::observer::{FusionObserver, InspectionEvent};

/// Position of a detection in the input batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionRef {
    pub batch: usize,
    pub index: usize,
}

/// Disjoint-set over a flat index space, with path compression and union by
/// rank.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Representative of `x`'s set. Compresses the visited path.
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    /// Union the sets of `a` and `b`; returns `false` when they were
    /// already joined.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        true
    }
}

/// Fuse planar detections across batches.
///
/// All batches must already be pose-aligned into one global frame; the
/// matcher is invoked with the identity reference transform. Consumes the
/// batches: singleton groups are moved through unchanged, merged groups are
/// replaced by brand-new objects with placeholder id 0.
///
/// A merge failure is confined to its own group: the failure is logged and
/// the group's members pass through unfused, the remaining groups are
/// unaffected.
///
/// The output is deterministic: groups are emitted in ascending order of
/// their disjoint-set root (which follows the flat detection order).
pub fn fuse_batches<M: PlaneMatcher>(
    batches: Vec<Vec<PlanarObject>>,
    matcher: &M,
    hull_builder: &dyn HullBuilder,
    observer: &mut dyn FusionObserver,
) -> Vec<PlanarObject> {
    let mut refs = Vec::new();
    let mut offsets = Vec::with_capacity(batches.len());
    for (batch, objs) in batches.iter().enumerate() {
        offsets.push(refs.len());
        for index in 0..objs.len() {
            refs.push(DetectionRef { batch, index });
        }
    }
    let total = refs.len();
    let mut sets = UnionFind::new(total);
    let identity = Iso3::identity();

    for ba in 0..batches.len() {
        for pl in 0..batches[ba].len() {
            for cba in ba..batches.len() {
                let start = if cba == ba { pl + 1 } else { 0 };
                for cpl in start..batches[cba].len() {
                    let outcome = matcher.compare(&batches[ba][pl], &batches[cba][cpl], &identity);
                    observer.on_event(InspectionEvent::PairCompared {
                        first: refs[offsets[ba] + pl],
                        second: refs[offsets[cba] + cpl],
                        outcome,
                    });
                    if outcome.matched {
                        debug!(
                            "detections ({ba},{pl}) and ({cba},{cpl}) match: \
                             eq_diff {:.2e}, overlap {:?}",
                            outcome.equation_diff, outcome.hull_overlap
                        );
                        sets.union(offsets[ba] + pl, offsets[cba] + cpl);
                    }
                }
            }
        }
    }

    // ascending root order keeps the output deterministic
    let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for flat in 0..total {
        groups.entry(sets.find(flat)).or_default().push(flat);
    }

    let mut slots: Vec<Option<PlanarObject>> = batches.into_iter().flatten().map(Some).collect();

    let mut fused = Vec::with_capacity(groups.len());
    for members in groups.into_values() {
        let member_refs: Vec<DetectionRef> = members.iter().map(|&f| refs[f]).collect();
        observer.on_event(InspectionEvent::GroupFormed {
            members: &member_refs,
        });

        // the disjoint-set partition visits every slot exactly once
        let mut group_objs: Vec<PlanarObject> = members
            .iter()
            .filter_map(|&f| slots[f].take())
            .collect();

        if group_objs.len() == 1 {
            fused.append(&mut group_objs);
        } else {
            let obj_refs: Vec<&PlanarObject> = group_objs.iter().collect();
            match merge_group(&obj_refs, hull_builder) {
                Ok(merged) => {
                    observer.on_event(InspectionEvent::MergePerformed {
                        members: &member_refs,
                        merged: &merged,
                    });
                    fused.push(merged);
                }
                Err(err) => {
                    // a failing group must not take the rest of the batch down
                    warn!("merge of group {member_refs:?} failed: {err}; keeping members unfused");
                    fused.append(&mut group_objs);
                }
            }
        }
    }

    info!("fused {total} detections into {} objects", fused.len());
    fused
}
