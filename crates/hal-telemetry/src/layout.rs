//! Fixed-layout buffers: snapshot sources and named field groups.

use crate::field::{Attribute, FieldValue, TelemetryField};
use hal_types::{HalError, HalResult};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::debug;

/// Source of raw buffer snapshots for a [`FixedLayout`].
///
/// A snapshot is taken once per refresh; every field of the layout decodes
/// from the same snapshot. Failures surface immediately and are not retried.
pub trait BufferSource: Send {
    fn snapshot(&mut self) -> HalResult<Vec<u8>>;
}

/// An in-memory buffer, used for tests and for buffers captured elsewhere.
#[derive(Debug, Clone)]
pub struct StaticBuffer {
    bytes: Vec<u8>,
}

impl StaticBuffer {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        StaticBuffer { bytes: bytes.into() }
    }
}

impl BufferSource for StaticBuffer {
    fn snapshot(&mut self) -> HalResult<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}

/// A buffer read from a file on every snapshot, e.g. a sysfs EEPROM node.
#[derive(Debug, Clone)]
pub struct FileBuffer {
    path: PathBuf,
}

impl FileBuffer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileBuffer { path: path.into() }
    }
}

impl BufferSource for FileBuffer {
    fn snapshot(&mut self) -> HalResult<Vec<u8>> {
        Ok(std::fs::read(&self.path)?)
    }
}

/// A set of named telemetry fields decoded together from one buffer source.
///
/// Construction binds every field to a fresh [`Attribute`] and computes the
/// minimum buffer size the layout needs. [`FixedLayout::refresh`] snapshots
/// the source once and decodes every field from it.
pub struct FixedLayout {
    source: Box<dyn BufferSource>,
    fields: BTreeMap<String, TelemetryField>,
    required_len: usize,
}

impl std::fmt::Debug for FixedLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedLayout")
            .field("fields", &self.fields)
            .field("required_len", &self.required_len)
            .finish_non_exhaustive()
    }
}

impl FixedLayout {
    /// Builds a layout from unbound field descriptors. Duplicate names and
    /// already-bound fields are configuration errors.
    pub fn new(
        source: Box<dyn BufferSource>,
        fields: Vec<(&str, TelemetryField)>,
    ) -> HalResult<Self> {
        let mut bound = BTreeMap::new();
        let mut required_len = 0;
        for (name, mut field) in fields {
            field.bind(Attribute::new())?;
            required_len = required_len.max(field.end());
            if bound.insert(name.to_string(), field).is_some() {
                return Err(HalError::invalid_configuration(format!(
                    "duplicate field name: {}",
                    name
                )));
            }
        }
        Ok(FixedLayout {
            source,
            fields: bound,
            required_len,
        })
    }

    /// Minimum buffer size that fits every field.
    pub fn required_len(&self) -> usize {
        self.required_len
    }

    /// Names of all fields in the layout.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Takes one snapshot from the source and decodes every field into its
    /// attribute. Fails without decoding anything if the snapshot is smaller
    /// than the layout requires; a failing field aborts the refresh and is
    /// reported by name.
    pub fn refresh(&mut self) -> HalResult<()> {
        let buffer = self.source.snapshot()?;
        if buffer.len() < self.required_len {
            return Err(HalError::invalid_configuration(format!(
                "{}-byte buffer is too small for layout requiring {} bytes",
                buffer.len(),
                self.required_len
            )));
        }
        debug!(len = buffer.len(), fields = self.fields.len(), "refreshing fixed layout");
        for (name, field) in &self.fields {
            field.decode(&buffer).map_err(|e| {
                HalError::internal(format!("failed to update field {}: {}", name, e))
            })?;
        }
        Ok(())
    }

    /// Returns the attribute handle for a named field.
    pub fn attribute(&self, name: &str) -> HalResult<Attribute> {
        match self.fields.get(name) {
            // Fields are bound at construction, so the handle always exists.
            Some(field) => match field.attribute() {
                Some(attribute) => Ok(attribute.clone()),
                None => Err(HalError::internal(format!("field {} lost its binding", name))),
            },
            None => Err(HalError::not_found(format!("no such field defined: {}", name))),
        }
    }

    /// Returns the latest decoded value of a named field. Fails if the layout
    /// has not been refreshed yet.
    pub fn value(&self, name: &str) -> HalResult<FieldValue> {
        self.attribute(name)?.get().ok_or_else(|| {
            HalError::precondition(format!("field {} has not been decoded yet", name))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldKind, IntWidth};
    use pretty_assertions::assert_eq;

    fn uint_field(offset: usize, length: usize) -> TelemetryField {
        TelemetryField::big_endian(offset, length, FieldKind::Uint { width: IntWidth::W32 })
            .unwrap()
    }

    #[test]
    fn test_refresh_decodes_all_fields() {
        let mut layout = FixedLayout::new(
            Box::new(StaticBuffer::new(vec![0x01, 0x02, 0x03])),
            vec![("first", uint_field(0, 1)), ("rest", uint_field(1, 2))],
        )
        .unwrap();

        layout.refresh().unwrap();
        assert_eq!(layout.value("first").unwrap(), FieldValue::U32(0x01));
        assert_eq!(layout.value("rest").unwrap(), FieldValue::U32(0x0203));
    }

    #[test]
    fn test_value_before_refresh_fails() {
        let layout = FixedLayout::new(
            Box::new(StaticBuffer::new(vec![0x01])),
            vec![("only", uint_field(0, 1))],
        )
        .unwrap();

        let err = layout.value("only").unwrap_err();
        assert!(matches!(err, HalError::PreconditionViolated(_)));
    }

    #[test]
    fn test_refresh_fails_if_buffer_too_small() {
        let mut layout = FixedLayout::new(
            Box::new(StaticBuffer::new(vec![0x01, 0x02])),
            vec![("wide", uint_field(0, 4))],
        )
        .unwrap();

        assert_eq!(layout.required_len(), 4);
        let err = layout.refresh().unwrap_err();
        assert!(err.is_invalid_configuration());
        assert!(layout.value("wide").is_err());
    }

    #[test]
    fn test_unknown_field_name() {
        let layout = FixedLayout::new(
            Box::new(StaticBuffer::new(vec![0x01])),
            vec![("only", uint_field(0, 1))],
        )
        .unwrap();

        assert!(layout.attribute("missing").unwrap_err().is_not_found());
    }

    #[test]
    fn test_duplicate_field_name_rejected() {
        let err = FixedLayout::new(
            Box::new(StaticBuffer::new(vec![0x01])),
            vec![("dup", uint_field(0, 1)), ("dup", uint_field(0, 1))],
        )
        .unwrap_err();
        assert!(err.is_invalid_configuration());
    }

    #[test]
    fn test_file_buffer_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eeprom");
        std::fs::write(&path, [0xaa, 0xbb]).unwrap();

        let mut source = FileBuffer::new(&path);
        assert_eq!(source.snapshot().unwrap(), vec![0xaa, 0xbb]);

        let missing = dir.path().join("gone");
        let mut source = FileBuffer::new(&missing);
        assert!(matches!(source.snapshot().unwrap_err(), HalError::Io(_)));
    }
}
