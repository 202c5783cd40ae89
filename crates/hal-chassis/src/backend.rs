//! Collaborator contracts consumed by the chassis registry.
//!
//! The registry defines these capability interfaces and is handed working
//! implementations at construction time (test double or real backend); it
//! never inspects what is behind them.

use crate::config::{ChassisConfig, NodeConfig};
use crate::data::{DataRequest, DataResponse, FrontPanelPortInfo, OpticalTransceiverInfo};
use crate::event::EventWriter;
use hal_types::HalResult;
use std::sync::Arc;

/// Physical-layer backend: transceiver and front panel state.
pub trait PhalBackend: Send + Sync {
    fn push_config(&self, config: &ChassisConfig) -> HalResult<()>;

    fn shutdown(&self) -> HalResult<()>;

    /// Physical description of the port at `(slot, port)`.
    fn front_panel_port_info(&self, slot: i32, port: i32) -> HalResult<FrontPanelPortInfo>;

    /// Tuning state of one optical transceiver network interface.
    fn optical_transceiver_info(
        &self,
        module: i32,
        network_interface: i32,
    ) -> HalResult<OpticalTransceiverInfo>;
}

/// Chassis-level data backend: alarms, inventory, chassis-wide lifecycle.
pub trait ChassisDataBackend: Send + Sync {
    fn push_config(&self, config: &ChassisConfig) -> HalResult<()>;

    fn shutdown(&self) -> HalResult<()>;

    fn freeze(&self) -> HalResult<()>;

    fn unfreeze(&self) -> HalResult<()>;

    /// Serves chassis-scoped retrieval requests (alarms, node inventory).
    fn retrieve_chassis_data(&self, request: &DataRequest) -> HalResult<DataResponse>;

    fn register_event_writer(&self, writer: EventWriter) -> HalResult<()>;

    fn unregister_event_writer(&self) -> HalResult<()>;
}

/// Per-node backend wrapped by a `NodeRecord`.
///
/// Forwarding-pipeline and packet-I/O operations live on the same vendor
/// object but are outside this core.
pub trait NodeBackend: Send + Sync {
    /// Pushes the chassis configuration; the backend picks out the entries
    /// scoped to its own node.
    fn push_config(&self, config: &ChassisConfig) -> HalResult<()>;

    fn shutdown(&self) -> HalResult<()>;

    fn freeze(&self) -> HalResult<()>;

    fn unfreeze(&self) -> HalResult<()>;

    /// Serves port-scoped retrieval requests.
    fn retrieve_port_data(&self, request: &DataRequest) -> HalResult<DataResponse>;

    /// Serves per-queue counter requests.
    fn retrieve_port_qos_data(&self, request: &DataRequest) -> HalResult<DataResponse>;

    fn register_event_writer(&self, writer: EventWriter) -> HalResult<()>;

    fn unregister_event_writer(&self) -> HalResult<()>;
}

/// Creates per-node backends while a configuration push rebuilds the node
/// map. Selected at registry construction.
pub trait NodeBackendFactory: Send + Sync {
    fn create_node(&self, config: &NodeConfig) -> HalResult<Arc<dyn NodeBackend>>;
}
