//! Asynchronous chassis events delivered through the registered subscription.

use crate::data::Alarm;
use crate::writer::ValueWriter;
use hal_types::{AdminState, HealthState, NodeId, OperState, PortId, PortSpeed};
use std::sync::Arc;

/// State-change notification emitted by a node or chassis backend.
#[derive(Debug, Clone, PartialEq)]
pub enum ChassisEvent {
    PortOperStateChanged {
        node_id: NodeId,
        port_id: PortId,
        state: OperState,
    },
    PortAdminStateChanged {
        node_id: NodeId,
        port_id: PortId,
        state: AdminState,
    },
    PortSpeedChanged {
        node_id: NodeId,
        port_id: PortId,
        speed: PortSpeed,
    },
    PortHealthChanged {
        node_id: NodeId,
        port_id: PortId,
        state: HealthState,
    },
    AlarmRaised {
        alarm: Alarm,
    },
}

impl ChassisEvent {
    /// Node the event concerns, when it is port-scoped.
    pub fn node_id(&self) -> Option<NodeId> {
        match self {
            ChassisEvent::PortOperStateChanged { node_id, .. }
            | ChassisEvent::PortAdminStateChanged { node_id, .. }
            | ChassisEvent::PortSpeedChanged { node_id, .. }
            | ChassisEvent::PortHealthChanged { node_id, .. } => Some(*node_id),
            ChassisEvent::AlarmRaised { .. } => None,
        }
    }
}

/// The single chassis-wide event subscription: a shared output channel
/// reference propagated by reference to every node.
pub type EventWriter = Arc<dyn ValueWriter<ChassisEvent>>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_event_node_scope() {
        let event = ChassisEvent::PortOperStateChanged {
            node_id: NodeId::new(1),
            port_id: PortId::new(2),
            state: OperState::Up,
        };
        assert_eq!(event.node_id(), Some(NodeId::new(1)));

        let alarm = ChassisEvent::AlarmRaised { alarm: Alarm::default() };
        assert_eq!(alarm.node_id(), None);
    }
}
