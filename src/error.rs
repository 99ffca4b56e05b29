use thiserror::Error;

use crate::dataset::Attribute;

/// Failures raised while turning a raw payload into a graph store.
///
/// All of these are fatal at load time; nothing partial is handed out.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("invalid dataset JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate node id {id}")]
    DuplicateNode { id: String },
    #[error("node {id} is missing its {attribute} attribute")]
    MissingAttribute { id: String, attribute: Attribute },
    #[error("link {index} references unknown node {id}")]
    UnknownEndpoint { index: usize, id: String },
}

/// A selection referenced a value the attribute index does not know about.
///
/// Expected during cascading resets; callers recover with an empty option
/// list instead of propagating.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("state {0} is not in the attribute index")]
    UnknownState(String),
    #[error("city {city} is not indexed under state {state}")]
    UnknownCity { state: String, city: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaletteError {
    #[error("malformed hex color {0}")]
    InvalidHex(String),
    #[error("duplicate palette entry {0}")]
    DuplicateEntry(String),
}
