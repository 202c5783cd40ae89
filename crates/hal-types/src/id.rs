//! Identifiers for forwarding nodes and switch ports.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one forwarding node (ASIC instance) within a chassis.
///
/// Node ids are assigned by the chassis configuration and are unique
/// chassis-wide.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Creates a node id from a raw value.
    pub const fn new(id: u64) -> Self {
        NodeId(id)
    }

    /// Returns the raw id value.
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        NodeId(id)
    }
}

/// Identifier of a singleton port, scoped to its owning node.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct PortId(pub u32);

impl PortId {
    /// Creates a port id from a raw value.
    pub const fn new(id: u32) -> Self {
        PortId(id)
    }

    /// Returns the raw id value.
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for PortId {
    fn from(id: u32) -> Self {
        PortId(id)
    }
}

/// Physical location of a front panel port: chassis slot plus port number
/// within the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct PortLocation {
    pub slot: i32,
    pub port: i32,
}

impl PortLocation {
    /// Creates a location from slot and port numbers.
    pub const fn new(slot: i32, port: i32) -> Self {
        PortLocation { slot, port }
    }
}

impl fmt::Display for PortLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.slot, self.port)
    }
}
