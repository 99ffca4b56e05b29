//! Attribute filtering over the node table. Selections narrow one axis
//! at a time; geography cascades, so changing the state clears the city
//! and region below it.

use tracing::debug;

use crate::dataset::{Attribute, AttributeIndex, GraphStore, NodeRecord};

/// Sentinel option meaning "no constraint on this axis".
pub const ALL: &str = "All";

fn constrain(value: String) -> Option<String> {
    if value == ALL { None } else { Some(value) }
}

/// Active constraints, one optional value per attribute axis.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub state: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub vendor: Option<String>,
    pub kind: Option<String>,
}

impl Selection {
    fn constraint(&self, attribute: Attribute) -> Option<&str> {
        match attribute {
            Attribute::State => self.state.as_deref(),
            Attribute::City => self.city.as_deref(),
            Attribute::Region => self.region.as_deref(),
            Attribute::Vendor => self.vendor.as_deref(),
            Attribute::Kind => self.kind.as_deref(),
        }
    }

    /// A node passes when every constrained axis matches exactly.
    pub fn matches(&self, node: &NodeRecord) -> bool {
        Attribute::ALL.iter().all(|&attribute| {
            self.constraint(attribute)
                .is_none_or(|required| node.attribute(attribute) == required)
        })
    }
}

/// One dropdown change, carrying the raw option string (possibly the
/// `ALL` sentinel).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterChange {
    State(String),
    City(String),
    Region(String),
    Vendor(String),
    Kind(String),
}

/// Per-record visibility, index-aligned with the store's tables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisibilityMap {
    pub nodes: Vec<bool>,
    pub edges: Vec<bool>,
}

/// Everything a caller needs to redraw after a filter change.
#[derive(Clone, Debug)]
pub struct FilterUpdate {
    pub visibility: VisibilityMap,
    pub city_options: Vec<String>,
    pub region_options: Vec<String>,
}

/// Option lists for every dropdown, reflecting the current selection.
#[derive(Clone, Debug)]
pub struct FilterOptions {
    pub states: Vec<String>,
    pub cities: Vec<String>,
    pub regions: Vec<String>,
    pub vendors: Vec<String>,
    pub kinds: Vec<String>,
}

#[derive(Default)]
pub struct FilterEngine {
    selection: Selection,
}

impl FilterEngine {
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Applies one change, cascading resets down the geography axes, and
    /// returns the refreshed city and region option lists.
    pub(super) fn apply(
        &mut self,
        change: FilterChange,
        index: &AttributeIndex,
    ) -> (Vec<String>, Vec<String>) {
        match change {
            FilterChange::State(value) => {
                self.selection.state = constrain(value);
                self.selection.city = None;
                self.selection.region = None;
            }
            FilterChange::City(value) => {
                self.selection.city = constrain(value);
                self.selection.region = None;
            }
            FilterChange::Region(value) => self.selection.region = constrain(value),
            FilterChange::Vendor(value) => self.selection.vendor = constrain(value),
            FilterChange::Kind(value) => self.selection.kind = constrain(value),
        }
        (self.city_options(index), self.region_options(index))
    }

    pub(super) fn city_options(&self, index: &AttributeIndex) -> Vec<String> {
        let Some(state) = self.selection.state.as_deref() else {
            return Vec::new();
        };
        match index.cities(state) {
            Ok(cities) => cities.to_vec(),
            Err(error) => {
                debug!("city options unavailable: {error}");
                Vec::new()
            }
        }
    }

    pub(super) fn region_options(&self, index: &AttributeIndex) -> Vec<String> {
        let Some(state) = self.selection.state.as_deref() else {
            return Vec::new();
        };
        let Some(city) = self.selection.city.as_deref() else {
            return Vec::new();
        };
        match index.regions(state, city) {
            Ok(regions) => regions.to_vec(),
            Err(error) => {
                debug!("region options unavailable: {error}");
                Vec::new()
            }
        }
    }

    /// An edge stays visible only while both endpoints do.
    pub(super) fn visibility(&self, store: &GraphStore) -> VisibilityMap {
        let nodes: Vec<bool> = store
            .nodes
            .iter()
            .map(|node| self.selection.matches(node))
            .collect();
        let edges = store
            .edges
            .iter()
            .map(|edge| nodes[edge.source] && nodes[edge.target])
            .collect();
        VisibilityMap { nodes, edges }
    }
}
