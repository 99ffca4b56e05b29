use std::io::Read;

use serde::Deserialize;

use crate::error::DatasetError;

/// Serde mirror of the JSON payload. Payloads may also carry pre-shaped
/// lookup tables (a `data` index plus flat enumeration arrays); those are
/// ignored here because the store derives its own index from the nodes.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawDataset {
    #[serde(default)]
    pub nodes: Vec<RawNode>,
    #[serde(default)]
    pub links: Vec<RawLink>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawNode {
    pub id: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub x: Option<f32>,
    #[serde(default)]
    pub y: Option<f32>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawLink {
    pub source: String,
    pub target: String,
}

impl RawDataset {
    pub fn from_json_str(raw: &str) -> Result<Self, DatasetError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        Ok(serde_json::from_reader(reader)?)
    }
}
