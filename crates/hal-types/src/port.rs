//! Port attribute types reported on the data-retrieval path.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operational state of a port as reported by the forwarding node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperState {
    /// State is unknown or has not been reported yet (default).
    #[default]
    Unknown,
    /// Port is operationally up.
    Up,
    /// Port is operationally down.
    Down,
}

impl OperState {
    /// Returns true if the port is operationally up.
    pub const fn is_up(&self) -> bool {
        matches!(self, OperState::Up)
    }
}

impl fmt::Display for OperState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperState::Unknown => write!(f, "unknown"),
            OperState::Up => write!(f, "up"),
            OperState::Down => write!(f, "down"),
        }
    }
}

/// Administrative state of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminState {
    /// State is unknown or has not been configured yet (default).
    #[default]
    Unknown,
    /// Port is administratively enabled.
    Enabled,
    /// Port is administratively disabled.
    Disabled,
    /// Port is in diagnostic mode.
    Diag,
}

impl AdminState {
    /// Returns true if the port is administratively enabled.
    pub const fn is_enabled(&self) -> bool {
        matches!(self, AdminState::Enabled)
    }
}

impl fmt::Display for AdminState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdminState::Unknown => write!(f, "unknown"),
            AdminState::Enabled => write!(f, "enabled"),
            AdminState::Disabled => write!(f, "disabled"),
            AdminState::Diag => write!(f, "diag"),
        }
    }
}

/// Health of a port or component as exposed through the health indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    #[default]
    Unknown,
    Good,
    Bad,
}

/// Whether a port that is a LAG member is viable for forwarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForwardingViability {
    #[default]
    Unknown,
    Viable,
    NotViable,
}

/// Port speed in bits per second.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PortSpeed(pub u64);

impl PortSpeed {
    pub const BPS_10G: PortSpeed = PortSpeed(10_000_000_000);
    pub const BPS_25G: PortSpeed = PortSpeed(25_000_000_000);
    pub const BPS_40G: PortSpeed = PortSpeed(40_000_000_000);
    pub const BPS_100G: PortSpeed = PortSpeed(100_000_000_000);

    /// Creates a speed from a raw bits-per-second value.
    pub const fn from_bps(bps: u64) -> Self {
        PortSpeed(bps)
    }

    /// Returns the speed in bits per second.
    pub const fn bps(&self) -> u64 {
        self.0
    }

    /// Returns the speed in megabits per second, rounded down.
    pub const fn mbps(&self) -> u64 {
        self.0 / 1_000_000
    }
}

impl fmt::Display for PortSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 >= 1_000_000_000 && self.0 % 1_000_000_000 == 0 {
            write!(f, "{}G", self.0 / 1_000_000_000)
        } else {
            write!(f, "{}bps", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_oper_state() {
        assert!(OperState::Up.is_up());
        assert!(!OperState::Down.is_up());
        assert_eq!(OperState::default(), OperState::Unknown);
    }

    #[test]
    fn test_admin_state() {
        assert!(AdminState::Enabled.is_enabled());
        assert!(!AdminState::Diag.is_enabled());
        assert_eq!(AdminState::Disabled.to_string(), "disabled");
    }

    #[test]
    fn test_port_speed_display() {
        assert_eq!(PortSpeed::BPS_100G.to_string(), "100G");
        assert_eq!(PortSpeed::from_bps(1_234).to_string(), "1234bps");
        assert_eq!(PortSpeed::BPS_25G.mbps(), 25_000);
    }
}
