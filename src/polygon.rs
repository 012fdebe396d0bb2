//! Final polygon assembly: exterior shells, hole containment, simplification
//!
//! Consumes the resolved outer and inner rings of one relation and emits one
//! polygon per valid outer ring - never a single multi-outer polygon. Holes
//! are assigned by containment, probing two sample points per inner ring so
//! that a hole whose first vertex sits exactly on the outer boundary is still
//! matched.

use crate::telemetry::Telemetry;
use geo::{Contains, Coord, LineString, Point, Polygon, Simplify};

/// Minimum vertex count for a ring to form a polygon
const MIN_RING_POINTS: usize = 4;

/// An inner ring candidate with its two containment sample points
struct InnerCandidate {
    ring: LineString<f64>,
    first: Point<f64>,
    midpoint: Point<f64>,
}

/// Build polygons from resolved outer and inner ring geometries
///
/// Rings are Douglas-Peucker simplified with `simplify_eps` (degrees) first to
/// bound vertex counts for downstream rendering. Outer rings with fewer than
/// four points are skipped and counted; inner rings matched to no outer are
/// warned about and omitted - both recovered, never fatal.
pub(crate) fn assemble_polygons(
    outer_rings: Vec<Vec<Coord<f64>>>,
    inner_rings: Vec<Vec<Coord<f64>>>,
    simplify_eps: f64,
    relation_id: i64,
    telemetry: &mut Telemetry,
) -> Vec<Polygon<f64>> {
    #[cfg(feature = "profiling")]
    profiling::scope!("assemble_polygons");

    let mut skipped_inners = 0;
    let mut candidates: Vec<Option<InnerCandidate>> = Vec::with_capacity(inner_rings.len());
    for ring in inner_rings {
        let ring = simplify_ring(ring, simplify_eps);
        if ring.0.len() < MIN_RING_POINTS {
            skipped_inners += 1;
            continue;
        }
        let first = Point::from(ring.0[0]);
        let midpoint = Point::from(ring.0[ring.0.len() / 2]);
        candidates.push(Some(InnerCandidate {
            ring,
            first,
            midpoint,
        }));
    }

    let mut polygons = Vec::new();
    for ring in outer_rings {
        let shell = simplify_ring(ring, simplify_eps);
        if shell.0.len() < MIN_RING_POINTS {
            telemetry.skipped_outer_rings += 1;
            continue;
        }

        let probe = Polygon::new(shell.clone(), Vec::new());
        let mut holes = Vec::new();
        for slot in &mut candidates {
            // Either sample point inside is enough; the first vertex may sit
            // exactly on the shell and fail a strict interior test.
            let contained = slot
                .as_ref()
                .is_some_and(|c| probe.contains(&c.first) || probe.contains(&c.midpoint));
            if contained {
                if let Some(candidate) = slot.take() {
                    holes.push(candidate.ring);
                }
            }
        }

        polygons.push(Polygon::new(shell, holes));
    }

    let unmatched = candidates.iter().flatten().count();
    if unmatched > 0 {
        telemetry.unmatched_inner_rings += unmatched;
        tracing::warn!(
            "Relation {}: {} inner rings matched no outer polygon, holes omitted",
            relation_id,
            unmatched
        );
    }
    if skipped_inners > 0 {
        tracing::warn!(
            "Relation {}: skipped {} inner rings with fewer than {} points",
            relation_id,
            skipped_inners,
            MIN_RING_POINTS
        );
    }

    polygons
}

/// Tolerance-based point reduction preserving shape within `eps`
fn simplify_ring(ring: Vec<Coord<f64>>, eps: f64) -> LineString<f64> {
    let line = LineString::from(ring);
    if eps > 0.0 { line.simplify(eps) } else { line }
}
