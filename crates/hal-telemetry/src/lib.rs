//! Binary telemetry codec for raw hardware buffers.
//!
//! Hardware exposes much of its state as fixed-layout byte buffers: EEPROM
//! dumps, register snapshots, FPGA windows. This crate turns those buffers
//! into typed attributes, and turns discrete logical states (an indicator's
//! color and blink state) back into ordered sets of physical control-path
//! writes.
//!
//! - [`TelemetryField`] describes one value inside a buffer: offset, length,
//!   byte order, and a [`FieldKind`] selecting the decode rule.
//! - [`FixedLayout`] groups named fields over a single [`BufferSource`] and
//!   refreshes them all from one snapshot.
//! - [`ControlPathEncoder`] maps an `(state, color)` pair through a
//!   [`ControlPathVariant`] truth table onto per-path register writes.
//! - [`transceiver`] provides ready-made layouts for optical module EEPROMs.
//!
//! All decoding is pure and synchronous; the only I/O happens inside the
//! injected [`BufferSource`] and [`PathWriter`] collaborators.

mod control_path;
mod field;
mod layout;
pub mod transceiver;

pub use control_path::{
    ControlPathEncoder, ControlPathVariant, IndicatorColor, IndicatorHandle, IndicatorState,
    PathWriter, SysfsPathWriter,
};
pub use field::{Attribute, Endianness, FieldKind, FieldValue, FloatWidth, IntWidth, TelemetryField};
pub use layout::{BufferSource, FileBuffer, FixedLayout, StaticBuffer};
