//! Input model for geometry handed over by the query layer
//!
//! The query layer resolves node references to coordinates before this engine
//! runs; what arrives here are plain coordinate fragments. Nodes the service
//! could not resolve keep `None` coordinates and are skipped when a fragment
//! is turned into a segment - missing coordinates are a data-quality issue,
//! never an error.

use geo::Coord;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single node of a way as returned by the query service
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RawNode {
    pub lon: Option<f64>,
    pub lat: Option<f64>,
}

impl RawNode {
    /// Create a node with both coordinates resolved
    #[inline]
    pub fn new(lon: f64, lat: f64) -> Self {
        Self {
            lon: Some(lon),
            lat: Some(lat),
        }
    }

    /// The resolved coordinate, or `None` if either axis is missing
    #[inline]
    pub fn coord(&self) -> Option<Coord<f64>> {
        Some(Coord {
            x: self.lon?,
            y: self.lat?,
        })
    }
}

/// One linear feature or fragment: an ordered list of nodes
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RawWay {
    pub nodes: Vec<RawNode>,
}

impl RawWay {
    pub fn new(nodes: Vec<RawNode>) -> Self {
        Self { nodes }
    }

    /// Build a way from fully resolved (lon, lat) pairs
    pub fn from_coords(coords: impl IntoIterator<Item = (f64, f64)>) -> Self {
        Self {
            nodes: coords
                .into_iter()
                .map(|(lon, lat)| RawNode::new(lon, lat))
                .collect(),
        }
    }

    /// Resolved coordinates in order, skipping nodes that lack them
    pub fn coordinates(&self) -> Vec<Coord<f64>> {
        self.nodes.iter().filter_map(RawNode::coord).collect()
    }
}

/// A member of a relation
///
/// The member-kind universe is closed by this enum; the role string on way
/// members stays open and is validated when the relation is resolved.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RelationMember {
    /// A way whose geometry has already been resolved to coordinates, tagged
    /// with its role ("outer" or "inner")
    Way { role: String, geometry: Vec<RawNode> },
    /// A nested sub-relation, carried by value
    Relation(Relation),
    /// A standalone node member; contributes no line geometry
    Node,
}

impl RelationMember {
    /// Build a way member from fully resolved (lon, lat) pairs
    pub fn way(role: impl Into<String>, coords: impl IntoIterator<Item = (f64, f64)>) -> Self {
        Self::Way {
            role: role.into(),
            geometry: coords
                .into_iter()
                .map(|(lon, lat)| RawNode::new(lon, lat))
                .collect(),
        }
    }
}

/// A collection of members that together describe one complex feature,
/// e.g. a multi-part park boundary
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Relation {
    /// Stable identifier, used for diagnostics only
    pub id: i64,
    /// Members in service order
    pub members: Vec<RelationMember>,
}

impl Relation {
    pub fn new(id: i64, members: Vec<RelationMember>) -> Self {
        Self { id, members }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_coordinates_are_skipped() {
        let way = RawWay::new(vec![
            RawNode::new(0.0, 0.0),
            RawNode {
                lon: Some(1.0),
                lat: None,
            },
            RawNode::default(),
            RawNode::new(2.0, 0.0),
        ]);

        let coords = way.coordinates();
        assert_eq!(coords.len(), 2);
        assert_eq!(coords[0], Coord { x: 0.0, y: 0.0 });
        assert_eq!(coords[1], Coord { x: 2.0, y: 0.0 });
    }

    #[test]
    fn test_from_coords() {
        let way = RawWay::from_coords([(0.0, 0.0), (1.0, 1.0)]);
        assert_eq!(way.nodes.len(), 2);
        assert_eq!(way.coordinates().len(), 2);
    }

    #[test]
    fn test_way_member_constructor() {
        let member = RelationMember::way("outer", [(0.0, 0.0), (1.0, 0.0)]);
        match member {
            RelationMember::Way { role, geometry } => {
                assert_eq!(role, "outer");
                assert_eq!(geometry.len(), 2);
            }
            _ => panic!("expected a way member"),
        }
    }
}
