//! Top-level reconstruction entry points for linear and area features
//!
//! All entry points are pure functions of their inputs: no state is retained
//! between calls, and recoverable data-quality issues produce best-effort
//! partial results plus telemetry counters rather than errors. Only genuine
//! schema violations (unexpected member roles) surface as `Err`.

use crate::polygon::assemble_polygons;
use crate::raw::{RawWay, Relation};
use crate::relation::resolve_members;
use crate::ring::{resolve_closed_rings, retry_depth};
use crate::stitch::{Segment, stitch_segments};
use crate::telemetry::{Stage, Telemetry};
use crate::utils::{DEFAULT_SIMPLIFY_M, degrees_from_meters, points_are_close};
use crate::Result;
use geo::{LineString, Polygon, Simplify};
use rayon::prelude::*;

/// Merge fragmented ways into maximal polylines
///
/// Roads, rivers and other linear features arrive split across many ways;
/// this stitches them back together wherever endpoints coincide within `eps`
/// (degrees). Ways whose nodes lack coordinates contribute only their
/// resolved points; ways with fewer than two resolved points are dropped.
pub fn reconstruct_lines(ways: &[RawWay], eps: f64) -> Vec<LineString<f64>> {
    let mut telemetry = Telemetry::new();
    reconstruct_lines_with_telemetry(ways, eps, &mut telemetry)
}

/// [`reconstruct_lines`] with an explicit telemetry context
pub fn reconstruct_lines_with_telemetry(
    ways: &[RawWay],
    eps: f64,
    telemetry: &mut Telemetry,
) -> Vec<LineString<f64>> {
    #[cfg(feature = "profiling")]
    profiling::scope!("reconstruct_lines");

    let segments: Vec<Segment> = ways
        .iter()
        .filter_map(|way| Segment::new(way.coordinates()))
        .collect();
    let chains = telemetry.time(Stage::Stitch, |t| stitch_segments(segments, eps, t));
    chains.into_iter().map(Segment::into_line_string).collect()
}

/// Merge fragmented ways, then simplify each polyline with Douglas-Peucker
///
/// `tolerance` (degrees) is used both as the stitching tolerance and as the
/// simplification distance budget, bounding vertex counts for rendering.
pub fn simplify_ways(ways: &[RawWay], tolerance: f64) -> Vec<LineString<f64>> {
    reconstruct_lines(ways, tolerance)
        .into_iter()
        .map(|line| line.simplify(tolerance))
        .collect()
}

/// Reconstruct closed polygons-with-holes from a collection of relations
///
/// Each relation is flattened into outer/inner fragment lists, the fragments
/// are stitched and forced closed within a bounded retry budget, and holes
/// are assigned to exteriors by containment. A relation may legitimately
/// produce multiple disjoint polygons (e.g. a park split across a river).
pub fn reconstruct_areas(relations: &[Relation], eps: f64) -> Result<Vec<Polygon<f64>>> {
    let mut telemetry = Telemetry::new();
    reconstruct_areas_with_telemetry(relations, eps, &mut telemetry)
}

/// [`reconstruct_areas`] with an explicit telemetry context
pub fn reconstruct_areas_with_telemetry(
    relations: &[Relation],
    eps: f64,
    telemetry: &mut Telemetry,
) -> Result<Vec<Polygon<f64>>> {
    #[cfg(feature = "profiling")]
    profiling::scope!("reconstruct_areas");

    let mut polygons = Vec::new();
    for relation in relations {
        polygons.extend(reconstruct_relation(relation, eps, telemetry)?);
    }
    Ok(polygons)
}

/// [`reconstruct_areas`] fanned out across relations with rayon
///
/// Safe because each relation gets its own segment arena, endpoint index and
/// telemetry context; there is no cross-relation shared mutable state.
pub fn reconstruct_areas_parallel(relations: &[Relation], eps: f64) -> Result<Vec<Polygon<f64>>> {
    #[cfg(feature = "profiling")]
    profiling::scope!("reconstruct_areas_parallel");

    let per_relation: Result<Vec<Vec<Polygon<f64>>>> = relations
        .par_iter()
        .map(|relation| {
            let mut telemetry = Telemetry::new();
            reconstruct_relation(relation, eps, &mut telemetry)
        })
        .collect();
    Ok(per_relation?.into_iter().flatten().collect())
}

/// Areas occasionally arrive as standalone closed ways rather than relations
/// (mainly rivers); turn the closed ones into hole-free polygons
///
/// Non-closed ways are warned about and skipped, never fatal.
pub fn polygons_from_closed_ways(ways: &[RawWay], eps: f64) -> Vec<Polygon<f64>> {
    let mut polygons = Vec::new();
    for way in ways {
        let coords = way.coordinates();
        let Some((&first, &last)) = coords.first().zip(coords.last()) else {
            continue;
        };
        if coords.len() >= 4 && points_are_close(first, last, eps) {
            polygons.push(Polygon::new(LineString::from(coords), Vec::new()));
        } else {
            tracing::warn!("Found a way-shape that is not closed, skipped");
        }
    }
    polygons
}

/// Process one relation through the full member → ring → polygon pipeline
fn reconstruct_relation(
    relation: &Relation,
    eps: f64,
    telemetry: &mut Telemetry,
) -> Result<Vec<Polygon<f64>>> {
    #[cfg(feature = "profiling")]
    profiling::scope!("reconstruct_relation");

    let (outer_fragments, inner_fragments) =
        telemetry.time(Stage::ResolveMembers, |t| resolve_members(relation, 0, t))?;

    let outer_rings = close_fragment_group(outer_fragments, eps, relation.id, telemetry);
    let inner_rings = close_fragment_group(inner_fragments, eps, relation.id, telemetry);

    let simplify_eps = degrees_from_meters(DEFAULT_SIMPLIFY_M);
    Ok(telemetry.time(Stage::AssemblePolygons, |t| {
        assemble_polygons(outer_rings, inner_rings, simplify_eps, relation.id, t)
    }))
}

/// Stitch one outer or inner fragment group into (best-effort) closed rings
fn close_fragment_group(
    fragments: Vec<Vec<geo::Coord<f64>>>,
    eps: f64,
    relation_id: i64,
    telemetry: &mut Telemetry,
) -> Vec<Vec<geo::Coord<f64>>> {
    let max_depth = retry_depth(fragments.len());
    let segments: Vec<Segment> = fragments.into_iter().filter_map(Segment::new).collect();
    let rings = telemetry.time(Stage::CloseRings, |t| {
        resolve_closed_rings(segments, eps, max_depth, relation_id, t)
    });
    rings.into_iter().map(|ring| ring.geometry).collect()
}
