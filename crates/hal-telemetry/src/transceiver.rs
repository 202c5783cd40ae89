//! Ready-made fixed layouts for optical transceiver EEPROMs.
//!
//! Offsets follow the SFF-8636 QSFP+ MSA memory map (lower page 00h). EEPROM
//! contents may change between reads (temperature, power levels), so callers
//! refresh the layout whenever current values are needed.

use crate::field::{FieldKind, FloatWidth, IntWidth, TelemetryField};
use crate::layout::{BufferSource, FixedLayout};
use hal_types::HalResult;

/// QSFP identifier bytes accepted at offset 0: QSFP, QSFP+, QSFP28.
const QSFP_IDENTIFIERS: [u8; 3] = [0x0c, 0x0d, 0x11];

fn uint8(offset: usize) -> HalResult<TelemetryField> {
    TelemetryField::big_endian(offset, 1, FieldKind::Uint { width: IntWidth::W32 })
}

fn flag(offset: usize, bit: u8) -> HalResult<TelemetryField> {
    TelemetryField::big_endian(offset, 1, FieldKind::BitFlag { bit, invert: false })
}

fn scaled(offset: usize, signed: bool, scale: f64) -> HalResult<TelemetryField> {
    TelemetryField::big_endian(
        offset,
        2,
        FieldKind::Scaled {
            width: FloatWidth::F32,
            signed,
            scale,
            increment: 0.0,
        },
    )
}

/// Builds the QSFP lower-page layout over the given EEPROM source.
///
/// Monitor values use the SFF-8636 scaling rules: temperature in 1/256 degC
/// steps (signed), supply voltage in 100 uV steps, per-channel receive power
/// in 0.1 uW steps.
pub fn qsfp_layout(source: Box<dyn BufferSource>) -> HalResult<FixedLayout> {
    FixedLayout::new(
        source,
        vec![
            (
                "identifier",
                TelemetryField::big_endian(
                    0,
                    1,
                    FieldKind::Magic { allowed: QSFP_IDENTIFIERS.to_vec() },
                )?,
            ),
            ("revision_compliance", uint8(1)?),
            (
                // Bit is 0 when the module data is ready.
                "data_ready",
                TelemetryField::big_endian(2, 1, FieldKind::BitFlag { bit: 0, invert: true })?,
            ),
            ("rx_los_1", flag(3, 0)?),
            ("rx_los_2", flag(3, 1)?),
            ("rx_los_3", flag(3, 2)?),
            ("rx_los_4", flag(3, 3)?),
            ("tx_los_1", flag(3, 4)?),
            ("tx_los_2", flag(3, 5)?),
            ("tx_los_3", flag(3, 6)?),
            ("tx_los_4", flag(3, 7)?),
            ("tx_fault_1", flag(4, 0)?),
            ("tx_fault_2", flag(4, 1)?),
            ("tx_fault_3", flag(4, 2)?),
            ("tx_fault_4", flag(4, 3)?),
            ("temperature", scaled(22, true, 1.0 / 256.0)?),
            ("supply_voltage", scaled(26, false, 0.0001)?),
            ("rx_power_1", scaled(34, false, 0.0001)?),
            ("rx_power_2", scaled(36, false, 0.0001)?),
            ("rx_power_3", scaled(38, false, 0.0001)?),
            ("rx_power_4", scaled(40, false, 0.0001)?),
            (
                "vendor_name",
                TelemetryField::big_endian(148, 16, FieldKind::CleanedText)?,
            ),
            (
                "vendor_oui",
                TelemetryField::big_endian(165, 3, FieldKind::Text)?,
            ),
            (
                "part_number",
                TelemetryField::big_endian(168, 16, FieldKind::CleanedText)?,
            ),
            (
                "revision_number",
                TelemetryField::big_endian(184, 2, FieldKind::CleanedText)?,
            ),
            (
                "serial_number",
                TelemetryField::big_endian(196, 16, FieldKind::CleanedText)?,
            ),
            (
                "date_code",
                TelemetryField::big_endian(212, 8, FieldKind::Text)?,
            ),
        ],
    )
}

/// Builds the layout of a LightPeak module ROM, which stores its multi-byte
/// fields least-significant-byte first.
pub fn light_peak_layout(source: Box<dyn BufferSource>) -> HalResult<FixedLayout> {
    FixedLayout::new(
        source,
        vec![
            (
                "vendor_oui",
                TelemetryField::little_endian(6, 3, FieldKind::Text)?,
            ),
            (
                "part_number",
                TelemetryField::little_endian(9, 4, FieldKind::Text)?,
            ),
            ("revision_number", uint8(13)?),
            (
                "serial_number",
                TelemetryField::little_endian(18, 4, FieldKind::Uint { width: IntWidth::W32 })?,
            ),
        ],
    )
}
