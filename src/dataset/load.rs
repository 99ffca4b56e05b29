use std::collections::HashMap;

use glam::{Vec2, vec2};
use tracing::debug;

use crate::error::DatasetError;
use crate::util::phyllotaxis_position;

use super::graph::{Attribute, AttributeIndex, EdgeRecord, GraphStore, NodeRecord};
use super::raw::{RawDataset, RawNode};

/// Turns a raw payload into a validated graph store.
///
/// Fails on duplicate node ids, missing attributes and links whose
/// endpoints are not in the node set. Nodes that arrive without
/// coordinates are placed on a deterministic spiral.
pub fn load(raw: RawDataset) -> Result<GraphStore, DatasetError> {
    let mut nodes = Vec::with_capacity(raw.nodes.len());
    let mut index_by_id = HashMap::with_capacity(raw.nodes.len());

    for (index, raw_node) in raw.nodes.into_iter().enumerate() {
        let node = materialize(raw_node, index)?;
        if index_by_id.insert(node.id.clone(), index).is_some() {
            return Err(DatasetError::DuplicateNode { id: node.id });
        }
        nodes.push(node);
    }

    let mut edges = Vec::with_capacity(raw.links.len());
    let mut degrees = vec![0usize; nodes.len()];
    for (index, link) in raw.links.into_iter().enumerate() {
        let source = resolve_endpoint(&index_by_id, index, link.source)?;
        let target = resolve_endpoint(&index_by_id, index, link.target)?;
        degrees[source] += 1;
        degrees[target] += 1;
        edges.push(EdgeRecord { source, target });
    }

    let attribute_index = AttributeIndex::from_nodes(&nodes);
    debug!(
        "loaded dataset: {} nodes, {} links, {} states",
        nodes.len(),
        edges.len(),
        attribute_index.states().len()
    );

    Ok(GraphStore {
        nodes,
        edges,
        index_by_id,
        degrees,
        attribute_index,
    })
}

fn resolve_endpoint(
    index_by_id: &HashMap<String, usize>,
    link_index: usize,
    id: String,
) -> Result<usize, DatasetError> {
    index_by_id
        .get(&id)
        .copied()
        .ok_or(DatasetError::UnknownEndpoint {
            index: link_index,
            id,
        })
}

fn materialize(raw: RawNode, index: usize) -> Result<NodeRecord, DatasetError> {
    let RawNode {
        id,
        state,
        city,
        region,
        vendor,
        kind,
        x,
        y,
    } = raw;

    let state = require(state, &id, Attribute::State)?;
    let city = require(city, &id, Attribute::City)?;
    let region = require(region, &id, Attribute::Region)?;
    let vendor = require(vendor, &id, Attribute::Vendor)?;
    let kind = require(kind, &id, Attribute::Kind)?;

    let position = match (x, y) {
        (Some(x), Some(y)) => vec2(x, y),
        _ => phyllotaxis_position(index),
    };

    Ok(NodeRecord {
        id,
        state,
        city,
        region,
        vendor,
        kind,
        position,
        velocity: Vec2::ZERO,
        pinned: None,
    })
}

fn require(value: Option<String>, id: &str, attribute: Attribute) -> Result<String, DatasetError> {
    value.ok_or_else(|| DatasetError::MissingAttribute {
        id: id.to_owned(),
        attribute,
    })
}
