//! Overpass Stitch - Geometry Reconstruction for Fragmented Map Features
//!
//! This library turns fragmented line data returned by a geographic-feature
//! query service (roads, rivers, parks, administrative areas) into renderable
//! geometry: merged polylines for linear features and closed
//! polygons-with-holes for area features. Input fragments are split
//! arbitrarily, carry floating-point noise between points meant to coincide,
//! may nest relations inside relations, and frequently fail to form closed
//! rings on the first stitching pass - the engine recovers coherent shapes
//! from all of that on a best-effort basis.
//!
//! # Architecture
//!
//! - **[`RawWay`] / [`Relation`]**: input model handed over by the query layer
//! - **`EndpointIndex`**: tolerance-bucketed spatial hash over fragment endpoints
//! - **Segment stitcher**: greedy chain-building over the endpoint index
//! - **Ring resolver**: bounded retry loop forcing chains to close into rings
//! - **Polygon assembler**: exterior rings plus holes assigned by containment
//! - **[`Telemetry`]**: explicit per-stage timing and recovery accounting
//!
//! # Performance Characteristics
//!
//! - **Stitching**: O(n log n) over fragment endpoints via spatial hashing
//! - **Ring closure**: bounded re-stitch passes (hard cap, never unbounded)
//! - **Parallelism**: safe at whole-relation granularity only, see
//!   [`reconstruct_areas_parallel`]

mod index;
mod polygon;
mod raw;
mod reconstruct;
mod relation;
mod ring;
mod stitch;
mod telemetry;
pub mod utils;

// Public API exports
pub use raw::{RawNode, RawWay, Relation, RelationMember};
pub use reconstruct::{
    polygons_from_closed_ways, reconstruct_areas, reconstruct_areas_parallel,
    reconstruct_areas_with_telemetry, reconstruct_lines, reconstruct_lines_with_telemetry,
    simplify_ways,
};
pub use telemetry::{Stage, Telemetry};

/// Error types for the reconstruction engine
///
/// Only genuine schema violations are fatal; geometric imperfections inherent
/// to crowd-sourced data are absorbed with best-effort output plus counters on
/// [`Telemetry`].
#[derive(Debug, thiserror::Error)]
pub enum ReconstructError {
    #[error("relation {relation_id}: unexpected member role {role:?}, expected \"outer\" or \"inner\"")]
    UnexpectedRole { relation_id: i64, role: String },
}

pub type Result<T> = std::result::Result<T, ReconstructError>;
