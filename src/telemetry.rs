//! Explicit per-stage timing and recovery accounting
//!
//! A `Telemetry` value is threaded through every stage of a reconstruction
//! call instead of wrapping stages in process-wide instrumentation. It records
//! wall-clock time per stage plus a counter for every recovered data-quality
//! issue, so callers can surface degradation without parsing logs. A fresh
//! context per call keeps concurrent relation-level fan-out free of shared
//! mutable state.

use std::time::{Duration, Instant};

/// The reconstruction stages a timing sample can belong to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Relation-member classification, including nested descent
    ResolveMembers,
    /// Greedy segment stitching (linear features)
    Stitch,
    /// Bounded ring-closure retry loop (area features)
    CloseRings,
    /// Polygon and hole assembly
    AssemblePolygons,
}

const STAGE_COUNT: usize = 4;

/// Telemetry context for one reconstruction call
#[derive(Clone, Debug, Default)]
pub struct Telemetry {
    durations: [Duration; STAGE_COUNT],
    /// Chains that failed to close within the retry budget
    pub open_chains: usize,
    /// Outer rings skipped for having fewer than four points
    pub skipped_outer_rings: usize,
    /// Inner rings that matched no outer polygon
    pub unmatched_inner_rings: usize,
    /// Nested-relation branches dropped at the recursion depth cap
    pub depth_truncations: usize,
    /// Fragments absorbed into larger chains across all stitching passes
    pub segments_merged: usize,
}

impl Telemetry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` and attribute its wall-clock time to `stage`
    pub(crate) fn time<T>(&mut self, stage: Stage, f: impl FnOnce(&mut Self) -> T) -> T {
        let started = Instant::now();
        let out = f(self);
        self.durations[stage as usize] += started.elapsed();
        out
    }

    /// Accumulated wall-clock time for one stage
    #[inline]
    pub fn stage_duration(&self, stage: Stage) -> Duration {
        self.durations[stage as usize]
    }

    /// Accumulated wall-clock time across all stages
    pub fn total_duration(&self) -> Duration {
        self.durations.iter().sum()
    }

    /// Whether any recovered data-quality issue was recorded
    pub fn degraded(&self) -> bool {
        self.open_chains > 0
            || self.skipped_outer_rings > 0
            || self.unmatched_inner_rings > 0
            || self.depth_truncations > 0
    }
}
