//! Telemetry field descriptors and the decode rules for each field kind.

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use hal_types::{HalError, HalResult};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Byte order of a multi-byte field inside a raw buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Big,
    Little,
}

/// Destination integer width for unsigned and signed fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntWidth {
    W16,
    W32,
    W64,
}

impl IntWidth {
    /// Number of bytes the destination type can hold.
    pub const fn bytes(&self) -> usize {
        match self {
            IntWidth::W16 => 2,
            IntWidth::W32 => 4,
            IntWidth::W64 => 8,
        }
    }
}

/// Destination float width for scaled fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatWidth {
    F32,
    F64,
}

/// Decode rule for a telemetry field.
///
/// A single sum type selects the decode behavior; the same generic decode
/// routine handles every destination width, so the bit-accumulation and
/// sign-extension rules live in exactly one place.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Unsigned integer accumulated from `length` bytes.
    Uint { width: IntWidth },
    /// Signed integer: decoded as unsigned, then sign-extended when the field
    /// is narrower than the destination.
    Int { width: IntWidth },
    /// Integer decoded as above, then mapped to `raw * scale + increment`.
    Scaled {
        width: FloatWidth,
        signed: bool,
        scale: f64,
        increment: f64,
    },
    /// Fixed-width text copied verbatim; a little-endian field is reversed
    /// wholesale before exposure.
    Text,
    /// Text with trailing whitespace stripped and non-printable bytes
    /// replaced by `*`.
    CleanedText,
    /// A boolean stored in a single bit of one byte.
    BitFlag { bit: u8, invert: bool },
    /// An unsigned value read from a sub-byte bit range, MSB first.
    Bits { bit_offset: u8, bit_count: u8 },
    /// A byte that must hold one of the allowed values; decodes to the byte
    /// itself and fails the refresh otherwise.
    Magic { allowed: Vec<u8> },
    /// A byte mapped through a value table, with an optional default for
    /// unmapped bytes.
    EnumByte {
        mapping: BTreeMap<u8, u32>,
        default: Option<u32>,
    },
}

/// A decoded telemetry value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    U16(u16),
    U32(u32),
    U64(u64),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Text(String),
    Bool(bool),
}

impl FieldValue {
    /// Returns the value as a u64 if it is an unsigned integer.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            FieldValue::U16(v) => Some(*v as u64),
            FieldValue::U32(v) => Some(*v as u64),
            FieldValue::U64(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as an i64 if it is a signed integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::I16(v) => Some(*v as i64),
            FieldValue::I32(v) => Some(*v as i64),
            FieldValue::I64(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as an f64 if it is a float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::F32(v) => Some(*v as f64),
            FieldValue::F64(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as text if it is a string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as a bool if it is a flag.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// Destination attribute handle a field decodes into.
///
/// The handle is cheap to clone; the layer that constructed the field owns
/// the binding and is responsible for not mutating it concurrently with a
/// decode of the same field.
#[derive(Debug, Clone, Default)]
pub struct Attribute {
    slot: Arc<Mutex<Option<FieldValue>>>,
}

impl Attribute {
    /// Creates an empty attribute.
    pub fn new() -> Self {
        Attribute::default()
    }

    /// Returns the most recently decoded value, if any.
    pub fn get(&self) -> Option<FieldValue> {
        match self.slot.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn set(&self, value: FieldValue) {
        match self.slot.lock() {
            Ok(mut guard) => *guard = Some(value),
            Err(poisoned) => *poisoned.into_inner() = Some(value),
        }
    }
}

/// Immutable descriptor of one value inside a fixed-layout buffer.
///
/// A field must be bound to a destination [`Attribute`] exactly once before
/// it can decode; decoding an unbound field fails with a precondition error,
/// and binding twice fails at the second bind.
#[derive(Debug, Clone)]
pub struct TelemetryField {
    offset: usize,
    length: usize,
    endianness: Endianness,
    kind: FieldKind,
    attribute: Option<Attribute>,
}

impl TelemetryField {
    /// Creates a field descriptor, validating that the destination type can
    /// hold `length` bytes. Width-vs-length mismatches are configuration
    /// errors caught here, never at decode time.
    pub fn new(
        offset: usize,
        length: usize,
        endianness: Endianness,
        kind: FieldKind,
    ) -> HalResult<Self> {
        if length == 0 {
            return Err(HalError::invalid_configuration("field length must be > 0"));
        }
        match &kind {
            FieldKind::Uint { width } | FieldKind::Int { width } => {
                if length > width.bytes() {
                    return Err(HalError::invalid_configuration(format!(
                        "{}-byte field does not fit a {}-byte destination",
                        length,
                        width.bytes()
                    )));
                }
            }
            FieldKind::Scaled { .. } => {
                if length > 8 {
                    return Err(HalError::invalid_configuration(format!(
                        "scaled field length {} exceeds 8 bytes",
                        length
                    )));
                }
            }
            FieldKind::BitFlag { bit, .. } => {
                if length != 1 || *bit > 7 {
                    return Err(HalError::invalid_configuration(
                        "bit flag must be one byte with bit in 0..=7",
                    ));
                }
            }
            FieldKind::Bits {
                bit_offset,
                bit_count,
            } => {
                if length != 1 || *bit_count == 0 || u32::from(*bit_offset) + u32::from(*bit_count) > 8
                {
                    return Err(HalError::invalid_configuration(
                        "bit range must stay within one byte",
                    ));
                }
            }
            FieldKind::Magic { allowed } => {
                if length != 1 || allowed.is_empty() {
                    return Err(HalError::invalid_configuration(
                        "magic field must be one byte with a non-empty allowed set",
                    ));
                }
            }
            FieldKind::EnumByte { mapping, default } => {
                if length != 1 || (mapping.is_empty() && default.is_none()) {
                    return Err(HalError::invalid_configuration(
                        "enum field must be one byte with a mapping or a default",
                    ));
                }
            }
            FieldKind::Text | FieldKind::CleanedText => {}
        }
        Ok(TelemetryField {
            offset,
            length,
            endianness,
            kind,
            attribute: None,
        })
    }

    /// Convenience constructor for big-endian fields.
    pub fn big_endian(offset: usize, length: usize, kind: FieldKind) -> HalResult<Self> {
        TelemetryField::new(offset, length, Endianness::Big, kind)
    }

    /// Convenience constructor for little-endian fields.
    pub fn little_endian(offset: usize, length: usize, kind: FieldKind) -> HalResult<Self> {
        TelemetryField::new(offset, length, Endianness::Little, kind)
    }

    /// Binds the field to its destination attribute. A field binds at most
    /// once.
    pub fn bind(&mut self, attribute: Attribute) -> HalResult<()> {
        if self.attribute.is_some() {
            return Err(HalError::invalid_configuration(
                "field is already bound to an attribute",
            ));
        }
        self.attribute = Some(attribute);
        Ok(())
    }

    /// Returns true once the field has been bound.
    pub fn is_bound(&self) -> bool {
        self.attribute.is_some()
    }

    /// Returns the bound attribute handle, if any.
    pub fn attribute(&self) -> Option<&Attribute> {
        self.attribute.as_ref()
    }

    /// First byte past the end of the field.
    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    /// Decodes the field from `buffer`, stores the value into the bound
    /// attribute, and returns it.
    pub fn decode(&self, buffer: &[u8]) -> HalResult<FieldValue> {
        let attribute = self.attribute.as_ref().ok_or_else(|| {
            HalError::precondition("decode invoked before the field was bound to an attribute")
        })?;
        if self.end() > buffer.len() {
            return Err(HalError::invalid_configuration(format!(
                "field [{}..{}) lies outside the {}-byte buffer",
                self.offset,
                self.end(),
                buffer.len()
            )));
        }
        let raw = &buffer[self.offset..self.end()];

        let value = match &self.kind {
            FieldKind::Uint { width } => {
                let acc = read_unsigned(raw, self.endianness);
                match width {
                    IntWidth::W16 => FieldValue::U16(acc as u16),
                    IntWidth::W32 => FieldValue::U32(acc as u32),
                    IntWidth::W64 => FieldValue::U64(acc),
                }
            }
            FieldKind::Int { width } => {
                let acc = sign_extend(read_unsigned(raw, self.endianness), self.length);
                match width {
                    IntWidth::W16 => FieldValue::I16(acc as i16),
                    IntWidth::W32 => FieldValue::I32(acc as i32),
                    IntWidth::W64 => FieldValue::I64(acc),
                }
            }
            FieldKind::Scaled {
                width,
                signed,
                scale,
                increment,
            } => {
                let acc = read_unsigned(raw, self.endianness);
                let raw_value = if *signed {
                    sign_extend(acc, self.length) as f64
                } else {
                    acc as f64
                };
                let scaled = raw_value * scale + increment;
                match width {
                    FloatWidth::F32 => FieldValue::F32(scaled as f32),
                    FloatWidth::F64 => FieldValue::F64(scaled),
                }
            }
            FieldKind::Text => {
                let mut bytes = raw.to_vec();
                if self.endianness == Endianness::Little {
                    bytes.reverse();
                }
                FieldValue::Text(String::from_utf8_lossy(&bytes).into_owned())
            }
            FieldKind::CleanedText => FieldValue::Text(clean_text(raw)),
            FieldKind::BitFlag { bit, invert } => {
                let set = raw[0] & (1 << bit) != 0;
                FieldValue::Bool(set != *invert)
            }
            FieldKind::Bits {
                bit_offset,
                bit_count,
            } => {
                let mut value: u32 = 0;
                for i in 0..*bit_count {
                    value <<= 1;
                    value |= ((raw[0] >> (bit_offset + bit_count - i - 1)) & 0x1) as u32;
                }
                FieldValue::U32(value)
            }
            FieldKind::Magic { allowed } => {
                if !allowed.contains(&raw[0]) {
                    return Err(HalError::internal(format!(
                        "buffer validation failed: byte {:#04x} at offset {} is not an allowed value",
                        raw[0], self.offset
                    )));
                }
                FieldValue::U32(raw[0] as u32)
            }
            FieldKind::EnumByte { mapping, default } => match mapping.get(&raw[0]) {
                Some(mapped) => FieldValue::U32(*mapped),
                None => match default {
                    Some(d) => FieldValue::U32(*d),
                    None => {
                        return Err(HalError::internal(format!(
                            "no enum value for byte {:#04x} at offset {}",
                            raw[0], self.offset
                        )))
                    }
                },
            },
        };

        attribute.set(value.clone());
        Ok(value)
    }
}

/// Accumulates up to 8 bytes into a u64 in the requested byte order.
fn read_unsigned(raw: &[u8], endianness: Endianness) -> u64 {
    match endianness {
        Endianness::Big => BigEndian::read_uint(raw, raw.len()),
        Endianness::Little => LittleEndian::read_uint(raw, raw.len()),
    }
}

/// Sign-extends a `length`-byte value held in the low bits of `raw`.
///
/// The extension mask spans the full 64-bit accumulator width; a mask built
/// from a narrower all-ones pattern would leave the upper bytes of wide
/// destinations unset.
fn sign_extend(raw: u64, length: usize) -> i64 {
    if length < 8 && raw & (1 << (length * 8 - 1)) != 0 {
        (raw | (!0u64 << (length * 8))) as i64
    } else {
        raw as i64
    }
}

/// Strips trailing ASCII whitespace, then replaces the remaining
/// non-printable bytes with `*`.
fn clean_text(raw: &[u8]) -> String {
    let trimmed_len = raw
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |i| i + 1);
    raw[..trimmed_len]
        .iter()
        .map(|&b| {
            if (0x20..=0x7e).contains(&b) {
                b as char
            } else {
                '*'
            }
        })
        .collect()
}
