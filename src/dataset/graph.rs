use std::collections::HashMap;
use std::fmt;

use glam::Vec2;

use crate::error::SelectionError;

/// The five categorical attributes every node carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Attribute {
    State,
    City,
    Region,
    Vendor,
    Kind,
}

impl Attribute {
    pub const ALL: [Attribute; 5] = [
        Attribute::State,
        Attribute::City,
        Attribute::Region,
        Attribute::Vendor,
        Attribute::Kind,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::State => "state",
            Self::City => "city",
            Self::Region => "region",
            Self::Vendor => "vendor",
            Self::Kind => "type",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A node in the layout. Attributes are fixed after load; position, velocity
/// and the pin override are the only fields the engine mutates.
#[derive(Clone, Debug)]
pub struct NodeRecord {
    pub id: String,
    pub state: String,
    pub city: String,
    pub region: String,
    pub vendor: String,
    pub kind: String,
    pub position: Vec2,
    pub velocity: Vec2,
    pub pinned: Option<Vec2>,
}

impl NodeRecord {
    pub fn attribute(&self, attribute: Attribute) -> &str {
        match attribute {
            Attribute::State => &self.state,
            Attribute::City => &self.city,
            Attribute::Region => &self.region,
            Attribute::Vendor => &self.vendor,
            Attribute::Kind => &self.kind,
        }
    }
}

/// An edge as a pair of indices into the node vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeRecord {
    pub source: usize,
    pub target: usize,
}

#[derive(Clone, Debug, Default)]
struct StateEntry {
    cities: Vec<String>,
    regions: HashMap<String, Vec<String>>,
}

/// Lookup structure for cascading filter options, derived once from the
/// nodes at load time. Value lists keep first-seen order.
#[derive(Clone, Debug, Default)]
pub struct AttributeIndex {
    states: Vec<String>,
    geo: HashMap<String, StateEntry>,
    vendors: Vec<String>,
    kinds: Vec<String>,
}

impl AttributeIndex {
    pub(super) fn from_nodes(nodes: &[NodeRecord]) -> Self {
        let mut index = Self::default();
        for node in nodes {
            if !index.states.contains(&node.state) {
                index.states.push(node.state.clone());
            }
            let entry = index.geo.entry(node.state.clone()).or_default();
            if !entry.cities.contains(&node.city) {
                entry.cities.push(node.city.clone());
            }
            let regions = entry.regions.entry(node.city.clone()).or_default();
            if !regions.contains(&node.region) {
                regions.push(node.region.clone());
            }
            if !index.vendors.contains(&node.vendor) {
                index.vendors.push(node.vendor.clone());
            }
            if !index.kinds.contains(&node.kind) {
                index.kinds.push(node.kind.clone());
            }
        }
        index
    }

    pub fn states(&self) -> &[String] {
        &self.states
    }

    pub fn vendors(&self) -> &[String] {
        &self.vendors
    }

    pub fn kinds(&self) -> &[String] {
        &self.kinds
    }

    pub fn cities(&self, state: &str) -> Result<&[String], SelectionError> {
        self.geo
            .get(state)
            .map(|entry| entry.cities.as_slice())
            .ok_or_else(|| SelectionError::UnknownState(state.to_owned()))
    }

    pub fn regions(&self, state: &str, city: &str) -> Result<&[String], SelectionError> {
        let entry = self
            .geo
            .get(state)
            .ok_or_else(|| SelectionError::UnknownState(state.to_owned()))?;
        entry
            .regions
            .get(city)
            .map(Vec::as_slice)
            .ok_or_else(|| SelectionError::UnknownCity {
                state: state.to_owned(),
                city: city.to_owned(),
            })
    }
}

/// The loaded dataset: nodes, resolved edges and the attribute index.
/// Read-only after load apart from the nodes' motion fields.
#[derive(Clone, Debug)]
pub struct GraphStore {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
    pub(super) index_by_id: HashMap<String, usize>,
    pub(super) degrees: Vec<usize>,
    pub(super) attribute_index: AttributeIndex,
}

impl GraphStore {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn degree(&self, index: usize) -> usize {
        self.degrees.get(index).copied().unwrap_or(0)
    }

    pub fn attribute_index(&self) -> &AttributeIndex {
        &self.attribute_index
    }
}
