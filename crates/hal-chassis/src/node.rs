//! Node records: one forwarding unit's configuration and operation surface.

use crate::backend::NodeBackend;
use crate::config::{ChassisConfig, NodeConfig};
use crate::data::{DataRequest, DataResponse};
use crate::event::EventWriter;
use hal_types::{HalResult, NodeId};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// One forwarding ASIC instance within the chassis.
///
/// Records are created during a configuration push and replaced wholesale on
/// the next push; identity fields are never mutated in place. Cloning a
/// record is cheap and yields a handle to the same backend.
#[derive(Clone)]
pub struct NodeRecord {
    id: NodeId,
    name: String,
    slot: i32,
    index: i32,
    backend: Arc<dyn NodeBackend>,
    event_writer: Option<EventWriter>,
}

impl NodeRecord {
    /// Creates a record for a configured node over its backend.
    pub fn new(config: &NodeConfig, backend: Arc<dyn NodeBackend>) -> Self {
        NodeRecord {
            id: config.id,
            name: config.name.clone(),
            slot: config.slot,
            index: config.index,
            backend,
            event_writer: None,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slot(&self) -> i32 {
        self.slot
    }

    pub fn index(&self) -> i32 {
        self.index
    }

    /// True while a chassis-wide event subscription is propagated to this
    /// node.
    pub fn has_event_writer(&self) -> bool {
        self.event_writer.is_some()
    }

    /// Pushes node-scoped configuration into the backend.
    pub fn push_config(&self, config: &ChassisConfig) -> HalResult<()> {
        debug!(node = %self.id, "pushing node config");
        self.backend.push_config(config)
    }

    pub fn shutdown(&self) -> HalResult<()> {
        self.backend.shutdown()
    }

    pub fn freeze(&self) -> HalResult<()> {
        self.backend.freeze()
    }

    pub fn unfreeze(&self) -> HalResult<()> {
        self.backend.unfreeze()
    }

    /// Serves a port-scoped retrieval request.
    pub fn retrieve_port_data(&self, request: &DataRequest) -> HalResult<DataResponse> {
        self.backend.retrieve_port_data(request)
    }

    /// Serves a per-queue counter request.
    pub fn retrieve_port_qos_data(&self, request: &DataRequest) -> HalResult<DataResponse> {
        self.backend.retrieve_port_qos_data(request)
    }

    /// Adopts the chassis-wide event subscription.
    pub fn register_event_writer(&mut self, writer: EventWriter) -> HalResult<()> {
        self.backend.register_event_writer(writer.clone())?;
        self.event_writer = Some(writer);
        Ok(())
    }

    /// Drops the event subscription reference.
    pub fn unregister_event_writer(&mut self) -> HalResult<()> {
        self.backend.unregister_event_writer()?;
        self.event_writer = None;
        Ok(())
    }
}

impl fmt::Debug for NodeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRecord")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("slot", &self.slot)
            .field("index", &self.index)
            .field("has_event_writer", &self.event_writer.is_some())
            .finish()
    }
}
