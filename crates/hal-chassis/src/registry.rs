//! The chassis registry: a single coherent view of the node and port maps
//! under concurrent access.

use crate::backend::{ChassisDataBackend, NodeBackendFactory, PhalBackend};
use crate::config::ChassisConfig;
use crate::data::{DataRequest, DataResponse};
use crate::event::EventWriter;
use crate::node::NodeRecord;
use crate::writer::ValueWriter;
use hal_types::{HalError, HalResult, NodeId, PortId, PortLocation};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{error, info, warn};

/// Lifecycle state of the chassis as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChassisState {
    /// No configuration has been pushed yet.
    Uninitialized,
    /// A configuration is installed and the node map is live.
    Configured,
    /// Frozen for maintenance; thawed by `unfreeze`.
    Frozen,
    /// Terminal state after a successful `shutdown`.
    ShutDown,
}

/// Opt-in behavior switches for cases the underlying hardware stack leaves
/// open. Defaults preserve source behavior: no lifecycle guards, no local
/// config verification.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistryOptions {
    /// Reject `freeze` outside `Configured` and `unfreeze` outside `Frozen`.
    pub require_configured_for_freeze: bool,
    /// Make `verify_config` check that every port references a node defined
    /// in the same config.
    pub verify_port_node_references: bool,
}

/// Everything guarded by the registry lock. The node map and port-location
/// map are only ever replaced together while the write half is held.
struct RegistryInner {
    state: ChassisState,
    nodes: HashMap<NodeId, NodeRecord>,
    port_location: HashMap<(NodeId, PortId), PortLocation>,
    event_writer: Option<EventWriter>,
}

/// Registry of forwarding nodes and port locations for one physical chassis.
///
/// All operations are synchronous calls made by caller threads. A single
/// reader/writer lock separates configuration-changing operations
/// (exclusive) from lookups and data retrieval (shared); a retrieval in
/// flight sees either the fully-old or fully-new node map, never a partial
/// rebuild.
pub struct ChassisRegistry {
    phal: Arc<dyn PhalBackend>,
    chassis: Arc<dyn ChassisDataBackend>,
    node_factory: Arc<dyn NodeBackendFactory>,
    options: RegistryOptions,
    inner: RwLock<RegistryInner>,
}

impl ChassisRegistry {
    /// Creates a registry over the injected backends with default options.
    pub fn new(
        phal: Arc<dyn PhalBackend>,
        chassis: Arc<dyn ChassisDataBackend>,
        node_factory: Arc<dyn NodeBackendFactory>,
    ) -> Self {
        ChassisRegistry::with_options(phal, chassis, node_factory, RegistryOptions::default())
    }

    /// Creates a registry with explicit behavior options.
    pub fn with_options(
        phal: Arc<dyn PhalBackend>,
        chassis: Arc<dyn ChassisDataBackend>,
        node_factory: Arc<dyn NodeBackendFactory>,
        options: RegistryOptions,
    ) -> Self {
        ChassisRegistry {
            phal,
            chassis,
            node_factory,
            options,
            inner: RwLock::new(RegistryInner {
                state: ChassisState::Uninitialized,
                nodes: HashMap::new(),
                port_location: HashMap::new(),
                event_writer: None,
            }),
        }
    }

    fn read_inner(&self) -> RwLockReadGuard<'_, RegistryInner> {
        match self.inner.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_inner(&self) -> RwLockWriteGuard<'_, RegistryInner> {
        match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Installs a new chassis configuration, replacing the node and
    /// port-location maps wholesale.
    ///
    /// Both backend pushes are always invoked; a physical-layer failure takes
    /// precedence when both fail. The replacement maps are built before the
    /// installed ones are touched, so any rebuild failure leaves the previous
    /// configuration fully live.
    pub fn push_config(&self, config: &ChassisConfig) -> HalResult<()> {
        let mut inner = self.write_inner();
        info!(
            nodes = config.nodes.len(),
            ports = config.singleton_ports.len(),
            "pushing chassis config"
        );

        let phal_status = self.phal.push_config(config);
        let chassis_status = self.chassis.push_config(config);
        phal_status?;
        chassis_status?;

        let mut nodes = HashMap::with_capacity(config.nodes.len());
        for node_config in &config.nodes {
            info!(
                id = %node_config.id,
                name = %node_config.name,
                slot = node_config.slot,
                index = node_config.index,
                "creating node"
            );
            let backend = self.node_factory.create_node(node_config)?;
            let mut record = NodeRecord::new(node_config, backend);
            // Nodes created after a subscription was registered pick it up
            // here.
            if let Some(writer) = &inner.event_writer {
                record.register_event_writer(writer.clone())?;
            }
            record.push_config(config)?;
            nodes.insert(record.id(), record);
        }

        let mut port_location = HashMap::with_capacity(config.singleton_ports.len());
        for port in &config.singleton_ports {
            port_location.insert(
                (port.node, port.id),
                PortLocation::new(port.slot, port.port),
            );
        }

        inner.nodes = nodes;
        inner.port_location = port_location;
        inner.state = ChassisState::Configured;
        Ok(())
    }

    /// Read-only configuration check. Validation is delegated to the
    /// collaborators that consume the config; this layer only performs the
    /// reference check when opted in.
    pub fn verify_config(&self, config: &ChassisConfig) -> HalResult<()> {
        let _inner = self.read_inner();
        info!("verifying chassis config");
        if self.options.verify_port_node_references {
            for port in &config.singleton_ports {
                if config.node(port.node).is_none() {
                    return Err(HalError::invalid_configuration(format!(
                        "port {} references node {} which is not in the config",
                        port.id, port.node
                    )));
                }
            }
        }
        Ok(())
    }

    /// Shuts down the physical layer, then every node, then the chassis
    /// backend. Node failures do not stop the fan-out; the aggregate result
    /// reports success only when everything succeeded.
    pub fn shutdown(&self) -> HalResult<()> {
        let mut inner = self.write_inner();
        info!("shutting down chassis");
        self.phal.shutdown()?;

        let failed = fan_out(&inner.nodes, "shutdown", NodeRecord::shutdown);
        let chassis_status = self.chassis.shutdown();
        aggregate("shutdown", failed, chassis_status)?;
        inner.state = ChassisState::ShutDown;
        Ok(())
    }

    /// Freezes every node, then the chassis backend (best-effort fan-out).
    pub fn freeze(&self) -> HalResult<()> {
        let mut inner = self.write_inner();
        info!("freezing chassis");
        if self.options.require_configured_for_freeze && inner.state != ChassisState::Configured {
            return Err(HalError::precondition(format!(
                "freeze is only valid while configured, state is {:?}",
                inner.state
            )));
        }

        let failed = fan_out(&inner.nodes, "freeze", NodeRecord::freeze);
        let chassis_status = self.chassis.freeze();
        aggregate("freeze", failed, chassis_status)?;
        inner.state = ChassisState::Frozen;
        Ok(())
    }

    /// Unfreezes every node, then the chassis backend (best-effort fan-out).
    pub fn unfreeze(&self) -> HalResult<()> {
        let mut inner = self.write_inner();
        info!("unfreezing chassis");
        if self.options.require_configured_for_freeze && inner.state != ChassisState::Frozen {
            return Err(HalError::precondition(format!(
                "unfreeze is only valid while frozen, state is {:?}",
                inner.state
            )));
        }

        let failed = fan_out(&inner.nodes, "unfreeze", NodeRecord::unfreeze);
        let chassis_status = self.chassis.unfreeze();
        aggregate("unfreeze", failed, chassis_status)?;
        inner.state = ChassisState::Configured;
        Ok(())
    }

    /// Registers the chassis-wide event subscription, replacing any prior
    /// one, and tells every current node to adopt it. Node-level adoption is
    /// best-effort; the chassis backend's registration result is returned.
    pub fn register_event_writer(&self, writer: EventWriter) -> HalResult<()> {
        let mut inner = self.write_inner();
        info!("registering chassis event writer");
        for node in inner.nodes.values_mut() {
            if let Err(e) = node.register_event_writer(writer.clone()) {
                warn!(node = %node.id(), error = %e, "node did not adopt event writer");
            }
        }
        inner.event_writer = Some(writer.clone());
        self.chassis.register_event_writer(writer)
    }

    /// Clears the event subscription and tells every node to drop its
    /// reference.
    pub fn unregister_event_writer(&self) -> HalResult<()> {
        let mut inner = self.write_inner();
        info!("unregistering chassis event writer");
        for node in inner.nodes.values_mut() {
            if let Err(e) = node.unregister_event_writer() {
                warn!(node = %node.id(), error = %e, "node did not drop event writer");
            }
        }
        inner.event_writer = None;
        self.chassis.unregister_event_writer()
    }

    /// Returns the record for a node id.
    pub fn lookup(&self, node_id: NodeId) -> HalResult<NodeRecord> {
        let inner = self.read_inner();
        lookup_node(&inner, node_id).cloned()
    }

    /// Physical location of a configured port, if known.
    pub fn port_location(&self, node_id: NodeId, port_id: PortId) -> Option<PortLocation> {
        self.read_inner().port_location.get(&(node_id, port_id)).copied()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ChassisState {
        self.read_inner().state
    }

    /// Serves a batch of retrieval requests.
    ///
    /// `node_id` addresses the node for port-scoped requests; `None` is the
    /// broadcast/chassis-wide address. Requests are processed independently:
    /// successes go to `writer` in request order, per-request failures are
    /// appended to the returned details list and never abort the rest of the
    /// batch. An addressed node that does not exist fails the whole call.
    pub fn retrieve_data(
        &self,
        node_id: Option<NodeId>,
        requests: &[DataRequest],
        writer: &dyn ValueWriter<DataResponse>,
    ) -> HalResult<Vec<HalError>> {
        let inner = self.read_inner();
        let node = match node_id {
            Some(id) => Some(lookup_node(&inner, id)?),
            None => None,
        };

        let mut details = Vec::new();
        for request in requests {
            let result = dispatch_request(self, &inner, node, request)
                .and_then(|response| writer.write(response));
            if let Err(e) = result {
                warn!(error = %e, ?request, "retrieval request failed");
                details.push(e);
            }
        }
        Ok(details)
    }

    /// Generic value writes are intentionally not provided at this layer.
    pub fn set_values(
        &self,
        _node_id: Option<NodeId>,
        _requests: &[DataRequest],
    ) -> HalResult<()> {
        Err(HalError::unimplemented(
            "generic value writes are not provided at this layer",
        ))
    }
}

fn lookup_node(inner: &RegistryInner, node_id: NodeId) -> HalResult<&NodeRecord> {
    inner
        .nodes
        .get(&node_id)
        .ok_or_else(|| HalError::not_found(format!("node with id {} not found", node_id)))
}

/// Invokes `op` on every node, collecting failures without stopping.
fn fan_out(
    nodes: &HashMap<NodeId, NodeRecord>,
    op_name: &str,
    op: impl Fn(&NodeRecord) -> HalResult<()>,
) -> Vec<(NodeId, HalError)> {
    let mut failed = Vec::new();
    for node in nodes.values() {
        if let Err(e) = op(node) {
            error!(node = %node.id(), name = node.name(), error = %e, "node {} failed", op_name);
            failed.push((node.id(), e));
        }
    }
    failed
}

/// Folds fan-out failures and the chassis-level result into one aggregate
/// status. Node-level effects persist either way; there is no rollback.
fn aggregate(
    op_name: &str,
    failed: Vec<(NodeId, HalError)>,
    chassis_status: HalResult<()>,
) -> HalResult<()> {
    if failed.is_empty() {
        return chassis_status;
    }
    let mut parts: Vec<String> = failed
        .iter()
        .map(|(id, e)| format!("node {}: {}", id, e))
        .collect();
    if let Err(e) = chassis_status {
        parts.push(format!("chassis backend: {}", e));
    }
    Err(HalError::internal(format!(
        "{} failed ({})",
        op_name,
        parts.join("; ")
    )))
}

fn dispatch_request(
    registry: &ChassisRegistry,
    inner: &RegistryInner,
    node: Option<&NodeRecord>,
    request: &DataRequest,
) -> HalResult<DataResponse> {
    match request {
        DataRequest::OperStatus { .. }
        | DataRequest::AdminStatus { .. }
        | DataRequest::MacAddress { .. }
        | DataRequest::PortSpeed { .. }
        | DataRequest::NegotiatedPortSpeed { .. }
        | DataRequest::LacpRouterMac { .. }
        | DataRequest::LacpSystemPriority { .. }
        | DataRequest::PortCounters { .. }
        | DataRequest::ForwardingViability { .. }
        | DataRequest::HealthIndicator { .. }
        | DataRequest::HardwarePort { .. } => addressed(node)?.retrieve_port_data(request),
        DataRequest::PortQosCounters { .. } => addressed(node)?.retrieve_port_qos_data(request),
        DataRequest::MemoryErrorAlarm
        | DataRequest::FlowProgrammingExceptionAlarm
        | DataRequest::NodeInfo { .. } => registry.chassis.retrieve_chassis_data(request),
        DataRequest::FrontPanelPortInfo { node_id, port_id } => {
            let location = inner
                .port_location
                .get(&(*node_id, *port_id))
                .ok_or_else(|| {
                    HalError::not_found(format!(
                        "no port location for node {} port {}",
                        node_id, port_id
                    ))
                })?;
            registry
                .phal
                .front_panel_port_info(location.slot, location.port)
                .map(DataResponse::FrontPanelPortInfo)
        }
        DataRequest::OpticalTransceiverInfo { module, network_interface } => registry
            .phal
            .optical_transceiver_info(*module, *network_interface)
            .map(DataResponse::OpticalTransceiverInfo),
        DataRequest::LoopbackStatus { .. } => {
            Err(HalError::internal("request kind not supported yet"))
        }
    }
}

fn addressed<'a>(node: Option<&'a NodeRecord>) -> HalResult<&'a NodeRecord> {
    node.ok_or_else(|| HalError::not_found("port-scoped request without an addressed node"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{NodeBackend, NodeBackendFactory};
    use crate::config::NodeConfig;

    /// Backend that accepts everything, for state-machine tests. Failure
    /// paths are covered by the integration tests with richer doubles.
    struct OkBackend;

    impl crate::backend::PhalBackend for OkBackend {
        fn push_config(&self, _config: &ChassisConfig) -> HalResult<()> {
            Ok(())
        }
        fn shutdown(&self) -> HalResult<()> {
            Ok(())
        }
        fn front_panel_port_info(
            &self,
            _slot: i32,
            _port: i32,
        ) -> HalResult<crate::data::FrontPanelPortInfo> {
            Ok(crate::data::FrontPanelPortInfo::default())
        }
        fn optical_transceiver_info(
            &self,
            _module: i32,
            _network_interface: i32,
        ) -> HalResult<crate::data::OpticalTransceiverInfo> {
            Ok(crate::data::OpticalTransceiverInfo::default())
        }
    }

    impl crate::backend::ChassisDataBackend for OkBackend {
        fn push_config(&self, _config: &ChassisConfig) -> HalResult<()> {
            Ok(())
        }
        fn shutdown(&self) -> HalResult<()> {
            Ok(())
        }
        fn freeze(&self) -> HalResult<()> {
            Ok(())
        }
        fn unfreeze(&self) -> HalResult<()> {
            Ok(())
        }
        fn retrieve_chassis_data(&self, _request: &DataRequest) -> HalResult<DataResponse> {
            Err(HalError::internal("not served by this double"))
        }
        fn register_event_writer(&self, _writer: EventWriter) -> HalResult<()> {
            Ok(())
        }
        fn unregister_event_writer(&self) -> HalResult<()> {
            Ok(())
        }
    }

    impl NodeBackend for OkBackend {
        fn push_config(&self, _config: &ChassisConfig) -> HalResult<()> {
            Ok(())
        }
        fn shutdown(&self) -> HalResult<()> {
            Ok(())
        }
        fn freeze(&self) -> HalResult<()> {
            Ok(())
        }
        fn unfreeze(&self) -> HalResult<()> {
            Ok(())
        }
        fn retrieve_port_data(&self, _request: &DataRequest) -> HalResult<DataResponse> {
            Err(HalError::internal("not served by this double"))
        }
        fn retrieve_port_qos_data(&self, _request: &DataRequest) -> HalResult<DataResponse> {
            Err(HalError::internal("not served by this double"))
        }
        fn register_event_writer(&self, _writer: EventWriter) -> HalResult<()> {
            Ok(())
        }
        fn unregister_event_writer(&self) -> HalResult<()> {
            Ok(())
        }
    }

    impl NodeBackendFactory for OkBackend {
        fn create_node(&self, _config: &NodeConfig) -> HalResult<Arc<dyn NodeBackend>> {
            Ok(Arc::new(OkBackend))
        }
    }

    fn registry() -> ChassisRegistry {
        ChassisRegistry::new(Arc::new(OkBackend), Arc::new(OkBackend), Arc::new(OkBackend))
    }

    fn config_with_node(id: u64) -> ChassisConfig {
        ChassisConfig {
            nodes: vec![NodeConfig {
                id: NodeId::new(id),
                name: format!("asic{}", id),
                slot: 0,
                index: 0,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_starts_uninitialized_with_empty_maps() {
        let registry = registry();
        assert_eq!(registry.state(), ChassisState::Uninitialized);
        assert!(registry.lookup(NodeId::new(1)).unwrap_err().is_not_found());
        assert!(registry.port_location(NodeId::new(1), PortId::new(1)).is_none());
    }

    #[test]
    fn test_push_config_moves_to_configured() {
        let registry = registry();
        registry.push_config(&config_with_node(1)).unwrap();
        assert_eq!(registry.state(), ChassisState::Configured);
        assert_eq!(registry.lookup(NodeId::new(1)).unwrap().id(), NodeId::new(1));
    }

    #[test]
    fn test_repeated_push_hot_swaps_while_configured() {
        let registry = registry();
        registry.push_config(&config_with_node(1)).unwrap();
        registry.push_config(&config_with_node(2)).unwrap();
        assert_eq!(registry.state(), ChassisState::Configured);
        assert!(registry.lookup(NodeId::new(1)).unwrap_err().is_not_found());
        assert!(registry.lookup(NodeId::new(2)).is_ok());
    }

    #[test]
    fn test_aggregate_prefers_listing_every_failure() {
        let failed = vec![
            (NodeId::new(1), HalError::internal("a")),
            (NodeId::new(2), HalError::internal("b")),
        ];
        let err = aggregate("freeze", failed, Err(HalError::internal("c"))).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("node 1"));
        assert!(message.contains("node 2"));
        assert!(message.contains("chassis backend"));
    }

    #[test]
    fn test_aggregate_passes_through_chassis_result() {
        assert!(aggregate("freeze", Vec::new(), Ok(())).is_ok());
        assert!(aggregate("freeze", Vec::new(), Err(HalError::internal("x"))).is_err());
    }
}
