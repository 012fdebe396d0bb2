//! Greedy stitching of geometrically adjacent fragments into maximal chains
//!
//! Fragments live in an arena indexed by position; a separate availability
//! table marks which of them are still up for grabs. Each pass claims a seed
//! fragment and keeps extending the working chain at both open ends through
//! the endpoint index until no candidate within tolerance remains.

use crate::index::{EndpointIndex, EndpointKind};
use crate::telemetry::Telemetry;
use crate::utils::points_are_close;
use geo::{Coord, LineString};

/// A fragment participating in a stitching pass
///
/// `start`/`end` always mirror the current orientation of `geometry`;
/// reversing the geometry swaps them as well. Merged chains reuse this type,
/// owning the concatenated geometry of every fragment they absorbed.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Segment {
    pub geometry: Vec<Coord<f64>>,
    pub start: Coord<f64>,
    pub end: Coord<f64>,
}

impl Segment {
    /// Build a segment from resolved coordinates; fragments with fewer than
    /// two points carry no line geometry and are dropped.
    pub fn new(geometry: Vec<Coord<f64>>) -> Option<Self> {
        if geometry.len() < 2 {
            return None;
        }
        let start = geometry[0];
        let end = geometry[geometry.len() - 1];
        Some(Self {
            geometry,
            start,
            end,
        })
    }

    /// Flip the orientation, keeping `start`/`end` consistent
    pub fn reverse(&mut self) {
        self.geometry.reverse();
        std::mem::swap(&mut self.start, &mut self.end);
    }

    /// Whether start and end coincide within `eps`
    #[inline]
    pub fn is_closed(&self, eps: f64) -> bool {
        points_are_close(self.start, self.end, eps)
    }

    pub fn into_line_string(self) -> LineString<f64> {
        LineString::from(self.geometry)
    }
}

/// Merge geometrically adjacent segments into maximal chains
///
/// Each chain owns the concatenated geometry of all segments it absorbed;
/// a segment that matches nothing becomes a single-element chain. Output
/// count is input count minus the number of merges performed.
pub(crate) fn stitch_segments(
    mut arena: Vec<Segment>,
    eps: f64,
    telemetry: &mut Telemetry,
) -> Vec<Segment> {
    #[cfg(feature = "profiling")]
    profiling::scope!("stitch_segments");

    let input_count = arena.len();
    let mut index = EndpointIndex::build(arena.iter().map(|s| (s.start, s.end)), eps);
    let mut available = vec![true; arena.len()];
    let mut chains = Vec::with_capacity(arena.len());

    for seed in 0..arena.len() {
        if !available[seed] {
            continue;
        }
        available[seed] = false;
        index.remove(seed, arena[seed].start);
        index.remove(seed, arena[seed].end);

        let mut chain = Segment {
            geometry: std::mem::take(&mut arena[seed].geometry),
            start: arena[seed].start,
            end: arena[seed].end,
        };

        // Alternate between the two open ends until neither extends.
        let mut extended = true;
        while extended {
            extended = try_extend(&mut chain, seed, true, &mut index, &mut arena, &mut available, eps)
                || try_extend(&mut chain, seed, false, &mut index, &mut arena, &mut available, eps);
        }

        chains.push(chain);
    }

    let merged = input_count - chains.len();
    if merged > 0 {
        telemetry.segments_merged += merged;
        tracing::debug!("{} segments merged into {} chains", merged, chains.len());
    }
    chains
}

/// Try one extension of `chain` at its end (`at_end`) or start
///
/// Takes the lowest-id available candidate whose matching endpoint lies
/// within `eps` of the open point, orients it head-to-tail, splices its
/// geometry onto the chain and keeps the index entries for the chain's open
/// endpoint current under the seed id.
fn try_extend(
    chain: &mut Segment,
    seed: usize,
    at_end: bool,
    index: &mut EndpointIndex,
    arena: &mut [Segment],
    available: &mut [bool],
    eps: f64,
) -> bool {
    let open_point = if at_end { chain.end } else { chain.start };

    for (candidate, kind) in index.neighbors(open_point) {
        if !available[candidate] {
            continue;
        }
        let matching_point = match kind {
            EndpointKind::Start => arena[candidate].start,
            EndpointKind::End => arena[candidate].end,
        };
        if !points_are_close(open_point, matching_point, eps) {
            continue;
        }

        available[candidate] = false;
        index.remove(candidate, arena[candidate].start);
        index.remove(candidate, arena[candidate].end);
        // Drop the chain's stale open-endpoint entry, if one was re-inserted
        // by a previous extension on this side.
        index.remove(seed, open_point);

        let joint_at_candidate_start = kind == EndpointKind::Start;
        if at_end {
            // The candidate's joint endpoint must be its start so geometries
            // connect head-to-tail.
            if !joint_at_candidate_start {
                arena[candidate].reverse();
            }
            let absorbed = std::mem::take(&mut arena[candidate].geometry);
            chain.geometry.extend_from_slice(&absorbed[1..]);
            chain.end = arena[candidate].end;
            index.insert(seed, chain.end, EndpointKind::End);
        } else {
            // Mirror case: the candidate's joint endpoint must be its end.
            if joint_at_candidate_start {
                arena[candidate].reverse();
            }
            let mut absorbed = std::mem::take(&mut arena[candidate].geometry);
            absorbed.truncate(absorbed.len() - 1);
            absorbed.extend_from_slice(&chain.geometry);
            chain.geometry = absorbed;
            chain.start = arena[candidate].start;
            index.insert(seed, chain.start, EndpointKind::Start);
        }
        return true;
    }

    false
}
