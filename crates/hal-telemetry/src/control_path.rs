//! Discrete-output control paths: indicator state encoding.
//!
//! A hardware indicator family (an LED block, typically) exposes a fixed
//! number of control paths. The `(state, color)` pair an operator wants to
//! show maps through the family's truth table onto one value per path;
//! writing those values in table order drives the physical output.

use hal_types::{HalError, HalResult};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Blink state of an indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IndicatorState {
    Off,
    Solid,
    Blinking,
}

/// Color of an indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IndicatorColor {
    Green,
    Red,
    Amber,
}

type TruthTable = BTreeMap<(IndicatorState, IndicatorColor), Vec<i32>>;

/// Immutable descriptor of one indicator family: how many control paths it
/// needs and which per-path values realize each supported `(state, color)`
/// combination.
#[derive(Debug, Clone)]
pub struct ControlPathVariant {
    name: String,
    path_count: usize,
    table: TruthTable,
}

impl ControlPathVariant {
    /// Creates a variant from a truth table. The table must be non-empty and
    /// every value vector must have the same length.
    pub fn new(name: impl Into<String>, table: TruthTable) -> HalResult<Self> {
        let name = name.into();
        let path_count = match table.values().next() {
            Some(values) => values.len(),
            None => {
                return Err(HalError::invalid_configuration(format!(
                    "variant {} has an empty truth table",
                    name
                )))
            }
        };
        if path_count == 0 || table.values().any(|v| v.len() != path_count) {
            return Err(HalError::invalid_configuration(format!(
                "variant {} has inconsistent path-value vectors",
                name
            )));
        }
        Ok(ControlPathVariant {
            name,
            path_count,
            table,
        })
    }

    /// Variant name, for diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of control paths an encoder for this variant must be given.
    pub fn required_path_count(&self) -> usize {
        self.path_count
    }

    /// Per-path values for a `(state, color)` combination, if supported.
    pub fn values(&self, state: IndicatorState, color: IndicatorColor) -> Option<&[i32]> {
        self.table.get(&(state, color)).map(Vec::as_slice)
    }

    /// Bicolor green/red block driven by two FPGA paths.
    pub fn bicolor_fpga_g_r() -> &'static ControlPathVariant {
        &BICOLOR_FPGA_G_R
    }

    /// Tricolor block: green/red pair plus a green/yellow pair.
    pub fn tricolor_fpga_gr_gy() -> &'static ControlPathVariant {
        &TRICOLOR_FPGA_GR_GY
    }

    /// Tricolor block: a green/red path plus a yellow path.
    pub fn tricolor_fpga_gr_y() -> &'static ControlPathVariant {
        &TRICOLOR_FPGA_GR_Y
    }

    /// Tricolor block with one path per color.
    pub fn tricolor_fpga_g_r_y() -> &'static ControlPathVariant {
        &TRICOLOR_FPGA_G_R_Y
    }

    /// Bicolor green/red block driven by two GPIO lines.
    pub fn bicolor_gpio_g_r() -> &'static ControlPathVariant {
        &BICOLOR_GPIO_G_R
    }
}

use IndicatorColor::{Amber, Green, Red};
use IndicatorState::{Off, Solid};

fn truth_table(entries: &[((IndicatorState, IndicatorColor), &[i32])]) -> TruthTable {
    entries
        .iter()
        .map(|(key, values)| (*key, values.to_vec()))
        .collect()
}

static BICOLOR_FPGA_G_R: Lazy<ControlPathVariant> = Lazy::new(|| {
    ControlPathVariant {
        name: "bicolor_fpga_g_r".to_string(),
        path_count: 2,
        table: truth_table(&[
            ((Off, Green), &[1, 1]),
            ((Off, Red), &[1, 1]),
            ((Solid, Green), &[0, 1]),
            ((Solid, Red), &[1, 0]),
        ]),
    }
});

static TRICOLOR_FPGA_GR_GY: Lazy<ControlPathVariant> = Lazy::new(|| {
    ControlPathVariant {
        name: "tricolor_fpga_gr_gy".to_string(),
        path_count: 4,
        table: truth_table(&[
            ((Off, Green), &[1, 1, 1, 1]),
            ((Off, Red), &[1, 1, 1, 1]),
            ((Off, Amber), &[1, 1, 1, 1]),
            ((Solid, Green), &[0, 1, 1, 1]),
            ((Solid, Red), &[1, 0, 1, 1]),
            ((Solid, Amber), &[1, 1, 1, 0]),
        ]),
    }
});

static TRICOLOR_FPGA_GR_Y: Lazy<ControlPathVariant> = Lazy::new(|| {
    ControlPathVariant {
        name: "tricolor_fpga_gr_y".to_string(),
        path_count: 2,
        table: truth_table(&[
            ((Off, Green), &[0, 0]),
            ((Off, Red), &[0, 0]),
            ((Off, Amber), &[0, 0]),
            ((Solid, Green), &[1, 0]),
            ((Solid, Red), &[2, 0]),
            ((Solid, Amber), &[0, 1]),
        ]),
    }
});

static TRICOLOR_FPGA_G_R_Y: Lazy<ControlPathVariant> = Lazy::new(|| {
    ControlPathVariant {
        name: "tricolor_fpga_g_r_y".to_string(),
        path_count: 3,
        table: truth_table(&[
            ((Off, Green), &[1, 1, 1]),
            ((Off, Red), &[1, 1, 1]),
            ((Off, Amber), &[1, 1, 1]),
            ((Solid, Green), &[0, 1, 1]),
            ((Solid, Red), &[1, 0, 1]),
            ((Solid, Amber), &[1, 1, 0]),
        ]),
    }
});

static BICOLOR_GPIO_G_R: Lazy<ControlPathVariant> = Lazy::new(|| {
    ControlPathVariant {
        name: "bicolor_gpio_g_r".to_string(),
        path_count: 2,
        table: truth_table(&[
            ((Off, Green), &[0, 0]),
            ((Off, Red), &[0, 0]),
            ((Solid, Green), &[1, 0]),
            ((Solid, Red), &[0, 1]),
        ]),
    }
});

/// Collaborator that applies a value to one physical control path.
pub trait PathWriter: Send + Sync {
    fn write_value(&self, path: &str, value: i32) -> HalResult<()>;
}

/// Writes control values to filesystem paths (sysfs attribute files).
#[derive(Debug, Default)]
pub struct SysfsPathWriter;

impl SysfsPathWriter {
    pub fn new() -> Self {
        SysfsPathWriter
    }
}

impl PathWriter for SysfsPathWriter {
    fn write_value(&self, path: &str, value: i32) -> HalResult<()> {
        std::fs::write(path, value.to_string())?;
        Ok(())
    }
}

/// Encoder from a discrete `(state, color)` pair to physical path writes.
///
/// Construction validates that the supplied path list matches the variant's
/// required path count; a mismatch yields no usable encoder.
pub struct ControlPathEncoder {
    variant: ControlPathVariant,
    paths: Vec<String>,
    writer: Arc<dyn PathWriter>,
}

impl std::fmt::Debug for ControlPathEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlPathEncoder")
            .field("variant", &self.variant)
            .field("paths", &self.paths)
            .finish_non_exhaustive()
    }
}

impl ControlPathEncoder {
    pub fn new(
        variant: ControlPathVariant,
        paths: Vec<String>,
        writer: Arc<dyn PathWriter>,
    ) -> HalResult<Self> {
        if paths.len() != variant.required_path_count() {
            return Err(HalError::invalid_configuration(format!(
                "variant {} requires {} control paths, {} supplied",
                variant.name(),
                variant.required_path_count(),
                paths.len()
            )));
        }
        Ok(ControlPathEncoder {
            variant,
            paths,
            writer,
        })
    }

    /// The variant this encoder drives.
    pub fn variant(&self) -> &ControlPathVariant {
        &self.variant
    }

    /// Writes the per-path values for `(state, color)` in table order.
    ///
    /// Each path write is an independent synchronous call; a fault between
    /// writes leaves the physical output mixed, and the failing write's error
    /// is returned as-is.
    pub fn set(&self, state: IndicatorState, color: IndicatorColor) -> HalResult<()> {
        let values = self.variant.values(state, color).ok_or_else(|| {
            HalError::invalid_configuration(format!(
                "variant {} does not support state {:?}, color {:?}",
                self.variant.name(),
                state,
                color
            ))
        })?;
        debug!(variant = self.variant.name(), ?state, ?color, "applying indicator values");
        for (path, value) in self.paths.iter().zip(values) {
            self.writer.write_value(path, *value)?;
        }
        Ok(())
    }
}

/// Latched front-end over a [`ControlPathEncoder`].
///
/// State and color arrive through independent setters; physical writes
/// happen only once both halves have been updated since the last write. The
/// latch resets even when the resulting combination is unsupported.
pub struct IndicatorHandle {
    encoder: ControlPathEncoder,
    state: Option<IndicatorState>,
    color: Option<IndicatorColor>,
    state_dirty: bool,
    color_dirty: bool,
}

impl IndicatorHandle {
    pub fn new(encoder: ControlPathEncoder) -> Self {
        IndicatorHandle {
            encoder,
            state: None,
            color: None,
            state_dirty: false,
            color_dirty: false,
        }
    }

    /// Updates the blink state half of the indicator.
    pub fn set_state(&mut self, state: IndicatorState) -> HalResult<()> {
        self.state = Some(state);
        self.state_dirty = true;
        self.apply_if_ready()
    }

    /// Updates the color half of the indicator.
    pub fn set_color(&mut self, color: IndicatorColor) -> HalResult<()> {
        self.color = Some(color);
        self.color_dirty = true;
        self.apply_if_ready()
    }

    fn apply_if_ready(&mut self) -> HalResult<()> {
        if !(self.state_dirty && self.color_dirty) {
            return Ok(());
        }
        self.state_dirty = false;
        self.color_dirty = false;
        let (Some(state), Some(color)) = (self.state, self.color) else {
            return Ok(());
        };
        self.encoder.set(state, color)
    }
}
