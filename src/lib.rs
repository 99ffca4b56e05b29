//! Force-directed layout and attribute filtering for vendor relationship
//! graphs. The engine keeps physics and filtering separate from any
//! rendering: callers feed it a dataset, tick it to advance the layout,
//! and read back node positions, visibility and styling.

pub mod dataset;
pub mod engine;
pub mod error;
pub mod palette;
pub mod style;
mod util;

pub use dataset::{GraphStore, RawDataset, load};
pub use engine::{Engine, FilterChange, ForceParameters, Phase, Selection, Tick, Viewport};
