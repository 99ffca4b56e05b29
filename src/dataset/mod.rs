mod graph;
mod load;
mod raw;

pub use graph::{Attribute, AttributeIndex, EdgeRecord, GraphStore, NodeRecord};
pub use load::load;
pub use raw::{RawDataset, RawLink, RawNode};
