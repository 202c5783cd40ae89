//! Chassis configuration: the logical decomposition of a physical switch
//! into forwarding nodes and singleton ports.

use hal_types::{HalError, HalResult, NodeId, PortId};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Identity of the physical chassis.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChassisDescriptor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub platform: String,
}

/// Configuration of one forwarding node (ASIC instance).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    pub id: NodeId,
    pub name: String,
    /// Slot the node's line card sits in.
    #[serde(default)]
    pub slot: i32,
    /// Index of the node within its slot.
    #[serde(default)]
    pub index: i32,
}

/// Configuration of one singleton port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortConfig {
    pub id: PortId,
    pub name: String,
    /// Node the port belongs to.
    pub node: NodeId,
    #[serde(default)]
    pub slot: i32,
    /// Physical port number within the slot.
    #[serde(default)]
    pub port: i32,
    #[serde(default)]
    pub speed_bps: u64,
}

/// Full chassis configuration as pushed by the management layer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChassisConfig {
    #[serde(default)]
    pub chassis: ChassisDescriptor,
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,
    #[serde(default)]
    pub singleton_ports: Vec<PortConfig>,
}

impl ChassisConfig {
    /// Parses a configuration from its JSON form.
    pub fn from_json_str(json: &str) -> HalResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| HalError::invalid_configuration(format!("bad chassis config: {}", e)))
    }

    /// Reads and parses a configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> HalResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        ChassisConfig::from_json_str(&contents)
    }

    /// Returns the node entry with the given id, if present.
    pub fn node(&self, id: NodeId) -> Option<&NodeConfig> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Iterates the port entries belonging to one node.
    pub fn ports_for_node(&self, id: NodeId) -> impl Iterator<Item = &PortConfig> {
        self.singleton_ports.iter().filter(move |p| p.node == id)
    }
}
