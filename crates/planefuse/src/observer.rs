//! Optional inspection-event observer.
//!
//! The fusion driver emits discrete events at fixed inspection points (pair
//! compared, group formed, merge performed). An observer may subscribe to
//! drive visualisation or logging; the core never blocks on observer
//! readiness and behaves identically when none is attached.

use crate::grouping::DetectionRef;
use crate::matching::MatchOutcome;
use crate::object::PlanarObject;

/// One inspection point in the fusion flow.
#[derive(Debug)]
pub enum InspectionEvent<'a> {
    /// The matcher scored a pair of detections.
    PairCompared {
        first: DetectionRef,
        second: DetectionRef,
        outcome: MatchOutcome,
    },
    /// A disjoint-set equivalence class was finalised.
    GroupFormed { members: &'a [DetectionRef] },
    /// A multi-member group was collapsed into a fresh object.
    MergePerformed {
        members: &'a [DetectionRef],
        merged: &'a PlanarObject,
    },
}

/// Observer seam for the fusion driver.
///
/// All methods are provided as no-ops; implement only what you need.
pub trait FusionObserver {
    fn on_event(&mut self, _event: InspectionEvent<'_>) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl FusionObserver for NullObserver {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingObserver {
        pairs: usize,
        groups: usize,
        merges: usize,
    }

    impl FusionObserver for CountingObserver {
        fn on_event(&mut self, event: InspectionEvent<'_>) {
            match event {
                InspectionEvent::PairCompared { .. } => self.pairs += 1,
                InspectionEvent::GroupFormed { .. } => self.groups += 1,
                InspectionEvent::MergePerformed { .. } => self.merges += 1,
            }
        }
    }

    #[test]
    fn null_observer_accepts_any_event() {
        let mut obs = NullObserver;
        obs.on_event(InspectionEvent::GroupFormed { members: &[] });
    }

    #[test]
    fn counting_observer_counts() {
        let mut obs = CountingObserver::default();
        obs.on_event(InspectionEvent::GroupFormed { members: &[] });
        obs.on_event(InspectionEvent::GroupFormed { members: &[] });
        assert_eq!(obs.groups, 2);
        assert_eq!(obs.pairs, 0);
        assert_eq!(obs.merges, 0);
    }
}
