//! Shared test doubles for registry integration tests.

// Each test binary exercises its own subset of these doubles.
#![allow(dead_code)]

use hal_chassis::{
    Alarm, AlarmSeverity, ChassisConfig, ChassisDataBackend, DataRequest, DataResponse,
    EventWriter, FrontPanelPortInfo, MediaType, NodeBackend, NodeBackendFactory, NodeConfig,
    NodeInfo, OpticalTransceiverInfo, PhalBackend, PortConfig,
};
use hal_types::{HalError, HalResult, NodeId, OperState, PortId, PortSpeed};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

static TRACING: Once = Once::new();

/// Installs a test subscriber once so failing tests show registry logs
/// (set `RUST_LOG=debug` to widen).
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Builds a config with the given node ids; node `n` gets one port with
/// id `n` at slot 1, physical port `n`.
pub fn config_with_nodes(ids: &[u64]) -> ChassisConfig {
    ChassisConfig {
        nodes: ids
            .iter()
            .map(|&id| NodeConfig {
                id: NodeId::new(id),
                name: format!("asic{}", id),
                slot: 1,
                index: id as i32,
            })
            .collect(),
        singleton_ports: ids
            .iter()
            .map(|&id| PortConfig {
                id: PortId::new(id as u32),
                name: format!("1/{}", id),
                node: NodeId::new(id),
                slot: 1,
                port: id as i32,
                speed_bps: PortSpeed::BPS_100G.bps(),
            })
            .collect(),
        ..Default::default()
    }
}

#[derive(Default)]
pub struct MockPhal {
    pub fail_push: AtomicBool,
    pub fail_shutdown: AtomicBool,
    pub push_count: AtomicUsize,
    pub shutdown_count: AtomicUsize,
    pub front_panel: Mutex<HashMap<(i32, i32), FrontPanelPortInfo>>,
}

impl MockPhal {
    pub fn with_front_panel_port(self, slot: i32, port: i32, serial: &str) -> Self {
        self.front_panel.lock().unwrap().insert(
            (slot, port),
            FrontPanelPortInfo {
                media_type: MediaType::QsfpSr4,
                vendor_name: "ACME".to_string(),
                part_number: "QX-100".to_string(),
                serial_number: serial.to_string(),
            },
        );
        self
    }
}

impl PhalBackend for MockPhal {
    fn push_config(&self, _config: &ChassisConfig) -> HalResult<()> {
        self.push_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_push.load(Ordering::SeqCst) {
            return Err(HalError::internal("phal push failed"));
        }
        Ok(())
    }

    fn shutdown(&self) -> HalResult<()> {
        self.shutdown_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_shutdown.load(Ordering::SeqCst) {
            return Err(HalError::internal("phal shutdown failed"));
        }
        Ok(())
    }

    fn front_panel_port_info(&self, slot: i32, port: i32) -> HalResult<FrontPanelPortInfo> {
        self.front_panel
            .lock()
            .unwrap()
            .get(&(slot, port))
            .cloned()
            .ok_or_else(|| HalError::not_found(format!("no transceiver at {}/{}", slot, port)))
    }

    fn optical_transceiver_info(
        &self,
        module: i32,
        network_interface: i32,
    ) -> HalResult<OpticalTransceiverInfo> {
        if module < 0 || network_interface < 0 {
            return Err(HalError::not_found("no such optical module"));
        }
        Ok(OpticalTransceiverInfo {
            frequency: 193_500_000_000_000,
            input_power: -3.2,
            output_power: 1.1,
            target_output_power: 1.0,
            operational_mode: 2,
        })
    }
}

#[derive(Default)]
pub struct MockChassisBackend {
    pub fail_push: AtomicBool,
    pub fail_freeze: AtomicBool,
    pub fail_shutdown: AtomicBool,
    pub push_count: AtomicUsize,
    pub freeze_count: AtomicUsize,
    pub unfreeze_count: AtomicUsize,
    pub shutdown_count: AtomicUsize,
    pub writer_registered: AtomicBool,
}

impl ChassisDataBackend for MockChassisBackend {
    fn push_config(&self, _config: &ChassisConfig) -> HalResult<()> {
        self.push_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_push.load(Ordering::SeqCst) {
            return Err(HalError::internal("chassis push failed"));
        }
        Ok(())
    }

    fn shutdown(&self) -> HalResult<()> {
        self.shutdown_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_shutdown.load(Ordering::SeqCst) {
            return Err(HalError::internal("chassis shutdown failed"));
        }
        Ok(())
    }

    fn freeze(&self) -> HalResult<()> {
        self.freeze_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_freeze.load(Ordering::SeqCst) {
            return Err(HalError::internal("chassis freeze failed"));
        }
        Ok(())
    }

    fn unfreeze(&self) -> HalResult<()> {
        self.unfreeze_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn retrieve_chassis_data(&self, request: &DataRequest) -> HalResult<DataResponse> {
        match request {
            DataRequest::MemoryErrorAlarm => Ok(DataResponse::MemoryErrorAlarm(Alarm {
                status: true,
                time_created: 1_700_000_000,
                severity: AlarmSeverity::Critical,
                description: "memory error".to_string(),
            })),
            DataRequest::FlowProgrammingExceptionAlarm => {
                Ok(DataResponse::FlowProgrammingExceptionAlarm(Alarm::default()))
            }
            DataRequest::NodeInfo { .. } => Ok(DataResponse::NodeInfo(NodeInfo {
                vendor_name: "ACME".to_string(),
                chip_name: "AX-9000".to_string(),
            })),
            _ => Err(HalError::internal("not a chassis-scoped request")),
        }
    }

    fn register_event_writer(&self, _writer: EventWriter) -> HalResult<()> {
        self.writer_registered.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn unregister_event_writer(&self) -> HalResult<()> {
        self.writer_registered.store(false, Ordering::SeqCst);
        Ok(())
    }
}

/// Per-node test double. Serves oper status and speed for the ports the
/// chassis config assigned to its node; everything else is unsupported.
pub struct MockNode {
    pub id: NodeId,
    pub fail_shutdown: bool,
    pub fail_freeze: bool,
    pub fail_port_data: AtomicBool,
    pub shutdown_count: AtomicUsize,
    pub freeze_count: AtomicUsize,
    pub unfreeze_count: AtomicUsize,
    pub push_count: AtomicUsize,
    pub event_writer: Mutex<Option<EventWriter>>,
    ports: Mutex<HashMap<PortId, PortSpeed>>,
}

impl MockNode {
    fn new(id: NodeId, fail_shutdown: bool, fail_freeze: bool) -> Self {
        MockNode {
            id,
            fail_shutdown,
            fail_freeze,
            fail_port_data: AtomicBool::new(false),
            shutdown_count: AtomicUsize::new(0),
            freeze_count: AtomicUsize::new(0),
            unfreeze_count: AtomicUsize::new(0),
            push_count: AtomicUsize::new(0),
            event_writer: Mutex::new(None),
            ports: Mutex::new(HashMap::new()),
        }
    }

    pub fn has_event_writer(&self) -> bool {
        self.event_writer.lock().unwrap().is_some()
    }
}

impl NodeBackend for MockNode {
    fn push_config(&self, config: &ChassisConfig) -> HalResult<()> {
        self.push_count.fetch_add(1, Ordering::SeqCst);
        let mut ports = self.ports.lock().unwrap();
        ports.clear();
        for port in config.ports_for_node(self.id) {
            ports.insert(port.id, PortSpeed::from_bps(port.speed_bps));
        }
        Ok(())
    }

    fn shutdown(&self) -> HalResult<()> {
        self.shutdown_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_shutdown {
            return Err(HalError::internal(format!("node {} shutdown failed", self.id)));
        }
        Ok(())
    }

    fn freeze(&self) -> HalResult<()> {
        self.freeze_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_freeze {
            return Err(HalError::internal(format!("node {} freeze failed", self.id)));
        }
        Ok(())
    }

    fn unfreeze(&self) -> HalResult<()> {
        self.unfreeze_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn retrieve_port_data(&self, request: &DataRequest) -> HalResult<DataResponse> {
        if self.fail_port_data.load(Ordering::SeqCst) {
            return Err(HalError::internal("port data unavailable"));
        }
        let ports = self.ports.lock().unwrap();
        match request {
            DataRequest::OperStatus { port_id } => ports
                .get(port_id)
                .map(|_| DataResponse::OperStatus(OperState::Up))
                .ok_or_else(|| HalError::not_found(format!("port {} not on node {}", port_id, self.id))),
            DataRequest::PortSpeed { port_id } => ports
                .get(port_id)
                .map(|speed| DataResponse::PortSpeed(*speed))
                .ok_or_else(|| HalError::not_found(format!("port {} not on node {}", port_id, self.id))),
            _ => Err(HalError::internal("not supported yet")),
        }
    }

    fn retrieve_port_qos_data(&self, _request: &DataRequest) -> HalResult<DataResponse> {
        Err(HalError::internal("not supported yet"))
    }

    fn register_event_writer(&self, writer: EventWriter) -> HalResult<()> {
        *self.event_writer.lock().unwrap() = Some(writer);
        Ok(())
    }

    fn unregister_event_writer(&self) -> HalResult<()> {
        *self.event_writer.lock().unwrap() = None;
        Ok(())
    }
}

/// Factory handing out [`MockNode`]s, remembering every node it created.
#[derive(Default)]
pub struct MockNodeFactory {
    pub fail_shutdown_ids: HashSet<u64>,
    pub fail_freeze_ids: HashSet<u64>,
    created: Mutex<Vec<Arc<MockNode>>>,
}

impl MockNodeFactory {
    pub fn failing_shutdown_on(ids: &[u64]) -> Self {
        MockNodeFactory {
            fail_shutdown_ids: ids.iter().copied().collect(),
            ..Default::default()
        }
    }

    pub fn failing_freeze_on(ids: &[u64]) -> Self {
        MockNodeFactory {
            fail_freeze_ids: ids.iter().copied().collect(),
            ..Default::default()
        }
    }

    /// The most recently created node with the given id.
    pub fn node(&self, id: u64) -> Arc<MockNode> {
        self.created
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|n| n.id.as_u64() == id)
            .cloned()
            .expect("node was never created")
    }

    pub fn created_count(&self) -> usize {
        self.created.lock().unwrap().len()
    }
}

impl NodeBackendFactory for MockNodeFactory {
    fn create_node(&self, config: &NodeConfig) -> HalResult<Arc<dyn NodeBackend>> {
        let node = Arc::new(MockNode::new(
            config.id,
            self.fail_shutdown_ids.contains(&config.id.as_u64()),
            self.fail_freeze_ids.contains(&config.id.as_u64()),
        ));
        self.created.lock().unwrap().push(node.clone());
        Ok(node)
    }
}
