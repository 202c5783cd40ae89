//! Common types for the switch-hal device abstraction core.
//!
//! This crate provides the primitives shared by the chassis registry and the
//! telemetry codec:
//!
//! - [`NodeId`], [`PortId`]: identifiers for forwarding nodes and ports
//! - [`PortLocation`]: physical (slot, port) coordinates of a front panel port
//! - [`MacAddress`]: 48-bit MAC carried as a `u64` on the data-retrieval path
//! - [`PortSpeed`], [`OperState`], [`AdminState`]: port attribute types
//! - [`HalError`] / [`HalResult`]: the error taxonomy used across the core

mod error;
mod id;
mod mac;
mod port;

pub use error::{HalError, HalResult};
pub use id::{NodeId, PortId, PortLocation};
pub use mac::{InvalidMacAddress, MacAddress};
pub use port::{AdminState, ForwardingViability, HealthState, OperState, PortSpeed};
