//! Data-retrieval request and response model.
//!
//! Each request carries a discriminant that selects which backend owns it:
//! port-scoped telemetry routes to the addressed node, chassis-scoped
//! telemetry to the chassis-level data backend, and physical-location
//! telemetry to the physical-layer backend.

use hal_types::{
    AdminState, ForwardingViability, HealthState, MacAddress, NodeId, OperState, PortId, PortSpeed,
};
use serde::{Deserialize, Serialize};

/// One element of a retrieval batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataRequest {
    OperStatus { port_id: PortId },
    AdminStatus { port_id: PortId },
    MacAddress { port_id: PortId },
    PortSpeed { port_id: PortId },
    NegotiatedPortSpeed { port_id: PortId },
    LacpRouterMac { port_id: PortId },
    LacpSystemPriority { port_id: PortId },
    PortCounters { port_id: PortId },
    ForwardingViability { port_id: PortId },
    HealthIndicator { port_id: PortId },
    HardwarePort { port_id: PortId },
    PortQosCounters { port_id: PortId, queue_id: u32 },
    MemoryErrorAlarm,
    FlowProgrammingExceptionAlarm,
    NodeInfo { node_id: NodeId },
    FrontPanelPortInfo { node_id: NodeId, port_id: PortId },
    OpticalTransceiverInfo { module: i32, network_interface: i32 },
    /// Known on the wire but not served by this layer.
    LoopbackStatus { port_id: PortId },
}

/// One streamed result of a retrieval batch.
#[derive(Debug, Clone, PartialEq)]
pub enum DataResponse {
    OperStatus(OperState),
    AdminStatus(AdminState),
    MacAddress(MacAddress),
    PortSpeed(PortSpeed),
    NegotiatedPortSpeed(PortSpeed),
    LacpRouterMac(MacAddress),
    LacpSystemPriority(u32),
    PortCounters(PortCounters),
    ForwardingViability(ForwardingViability),
    HealthIndicator(HealthState),
    HardwarePort(String),
    PortQosCounters(PortQosCounters),
    MemoryErrorAlarm(Alarm),
    FlowProgrammingExceptionAlarm(Alarm),
    NodeInfo(NodeInfo),
    FrontPanelPortInfo(FrontPanelPortInfo),
    OpticalTransceiverInfo(OpticalTransceiverInfo),
}

/// Octet and packet counters for one singleton port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PortCounters {
    pub in_octets: u64,
    pub in_unicast_pkts: u64,
    pub in_broadcast_pkts: u64,
    pub in_multicast_pkts: u64,
    pub in_discards: u64,
    pub in_errors: u64,
    pub in_unknown_protos: u64,
    pub in_fcs_errors: u64,
    pub out_octets: u64,
    pub out_unicast_pkts: u64,
    pub out_broadcast_pkts: u64,
    pub out_multicast_pkts: u64,
    pub out_discards: u64,
    pub out_errors: u64,
}

/// Per-queue counters for one singleton port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PortQosCounters {
    pub queue_id: u32,
    pub out_octets: u64,
    pub out_pkts: u64,
    pub out_dropped_pkts: u64,
}

/// Severity of a chassis alarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmSeverity {
    #[default]
    Unknown,
    Minor,
    Warning,
    Major,
    Critical,
}

/// A chassis-scoped alarm (memory error, flow programming exception).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Alarm {
    /// True while the alarm condition holds.
    pub status: bool,
    /// Unix timestamp in nanoseconds at which the alarm was raised.
    pub time_created: u64,
    pub severity: AlarmSeverity,
    pub description: String,
}

/// Inventory description of one forwarding node.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodeInfo {
    pub vendor_name: String,
    pub chip_name: String,
}

/// Media plugged into a front panel port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    #[default]
    Unknown,
    Sfp,
    QsfpCopper,
    QsfpSr4,
    QsfpLr4,
    QsfpPsm4,
}

/// Physical description of one front panel port, read from the module EEPROM.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FrontPanelPortInfo {
    pub media_type: MediaType,
    pub vendor_name: String,
    pub part_number: String,
    pub serial_number: String,
}

/// Tuning state of one optical transceiver network interface.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OpticalTransceiverInfo {
    /// Carrier frequency in Hz.
    pub frequency: u64,
    /// Measured input power in dBm.
    pub input_power: f64,
    /// Measured output power in dBm.
    pub output_power: f64,
    /// Configured target output power in dBm.
    pub target_output_power: f64,
    /// Vendor-specific operational mode word.
    pub operational_mode: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_alarm_defaults() {
        let alarm = Alarm::default();
        assert!(!alarm.status);
        assert_eq!(alarm.severity, AlarmSeverity::Unknown);
    }

    #[test]
    fn test_request_carries_port_scope() {
        let request = DataRequest::OperStatus { port_id: PortId::new(3) };
        assert_eq!(request, DataRequest::OperStatus { port_id: PortId::new(3) });
        assert_ne!(request, DataRequest::AdminStatus { port_id: PortId::new(3) });
    }

    #[test]
    fn test_counters_serialize() {
        let counters = PortCounters { in_octets: 42, ..Default::default() };
        let json = serde_json::to_string(&counters).unwrap();
        let back: PortCounters = serde_json::from_str(&json).unwrap();
        assert_eq!(back, counters);
    }
}
