//! Recursive classification of relation members into outer and inner fragments
//!
//! Relations may nest other relations, occasionally cyclically. A sub-relation's
//! outer rings are treated as outer boundaries of the parent, and likewise for
//! inner. Recursion is bounded by a hard depth cap - a safety valve, not a
//! cycle detector: pathological input terminates by hitting the cap with a
//! warning, never by hanging.

use crate::raw::{RawNode, Relation, RelationMember};
use crate::telemetry::Telemetry;
use crate::{ReconstructError, Result};
use geo::Coord;

/// Hard cap on relation nesting depth
pub(crate) const MAX_RELATION_DEPTH: usize = 6;

/// Flatten a possibly nested relation into outer and inner fragment lists
///
/// Way members are classified by role; any role other than "outer"/"inner" is
/// a fatal schema violation. Node members are ignored. A branch past the depth
/// cap contributes no geometry and is only warned about.
pub(crate) fn resolve_members(
    relation: &Relation,
    depth: usize,
    telemetry: &mut Telemetry,
) -> Result<(Vec<Vec<Coord<f64>>>, Vec<Vec<Coord<f64>>>)> {
    let mut outer_fragments = Vec::new();
    let mut inner_fragments = Vec::new();

    if depth >= MAX_RELATION_DEPTH {
        telemetry.depth_truncations += 1;
        tracing::warn!(
            "Relation {}: nesting exceeds depth {}, dropping branch",
            relation.id,
            MAX_RELATION_DEPTH
        );
        return Ok((outer_fragments, inner_fragments));
    }

    for member in &relation.members {
        match member {
            RelationMember::Way { role, geometry } => {
                let coords: Vec<Coord<f64>> =
                    geometry.iter().filter_map(RawNode::coord).collect();
                if coords.is_empty() {
                    continue;
                }
                match role.as_str() {
                    "outer" => outer_fragments.push(coords),
                    "inner" => inner_fragments.push(coords),
                    other => {
                        return Err(ReconstructError::UnexpectedRole {
                            relation_id: relation.id,
                            role: other.to_string(),
                        });
                    }
                }
            }
            RelationMember::Relation(sub) => {
                tracing::debug!(
                    "Relation {}: descending into nested relation {}",
                    relation.id,
                    sub.id
                );
                let (sub_outer, sub_inner) = resolve_members(sub, depth + 1, telemetry)?;
                outer_fragments.extend(sub_outer);
                inner_fragments.extend(sub_inner);
            }
            RelationMember::Node => {}
        }
    }

    Ok((outer_fragments, inner_fragments))
}
