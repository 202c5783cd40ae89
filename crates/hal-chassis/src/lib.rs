//! Chassis/node state registry for the switch-hal device abstraction core.
//!
//! A physical switch decomposes into forwarding nodes (ASIC instances) and
//! singleton ports. This crate tracks that decomposition, enforces one
//! coherent configuration view under concurrent access, and fans out
//! lifecycle and data-retrieval operations to per-node handlers.
//!
//! # Architecture
//!
//! - [`ChassisRegistry`] owns the node map, the port-location map, and the
//!   single chassis-wide event subscription, all behind one reader/writer
//!   lock.
//! - [`NodeRecord`] wraps one per-node backend with the node's identity.
//! - Backends are capability traits ([`PhalBackend`], [`ChassisDataBackend`],
//!   [`NodeBackend`], [`NodeBackendFactory`]) injected at registry
//!   construction; a test double and a real vendor backend are
//!   interchangeable.
//! - Streamed results and events flow through [`ValueWriter`] sinks.
//!
//! # Example
//!
//! ```ignore
//! use hal_chassis::{ChassisConfig, ChassisRegistry, DataRequest, VecWriter};
//! use std::sync::Arc;
//!
//! let registry = ChassisRegistry::new(phal, chassis_backend, node_factory);
//! registry.push_config(&ChassisConfig::from_json_file("chassis.json")?)?;
//!
//! let writer = VecWriter::new();
//! let details = registry.retrieve_data(
//!     Some(node_id),
//!     &[DataRequest::OperStatus { port_id }],
//!     &writer,
//! )?;
//! ```

mod backend;
mod config;
mod data;
mod event;
mod node;
mod registry;
mod writer;

pub use backend::{ChassisDataBackend, NodeBackend, NodeBackendFactory, PhalBackend};
pub use config::{ChassisConfig, ChassisDescriptor, NodeConfig, PortConfig};
pub use data::{
    Alarm, AlarmSeverity, DataRequest, DataResponse, FrontPanelPortInfo, MediaType, NodeInfo,
    OpticalTransceiverInfo, PortCounters, PortQosCounters,
};
pub use event::{ChassisEvent, EventWriter};
pub use node::NodeRecord;
pub use registry::{ChassisRegistry, ChassisState, RegistryOptions};
pub use writer::{ValueWriter, VecWriter};
