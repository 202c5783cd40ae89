//! Output channels for streamed results and event notifications.

use hal_types::{HalError, HalResult};
use std::sync::Mutex;

/// An append-only sink accepting one value at a time.
///
/// Used both for streamed data-retrieval results and for asynchronous event
/// notifications. A failing write surfaces immediately; the writer is never
/// retried by this core.
pub trait ValueWriter<T>: Send + Sync {
    fn write(&self, value: T) -> HalResult<()>;
}

impl<T: Send> ValueWriter<T> for std::sync::mpsc::Sender<T> {
    fn write(&self, value: T) -> HalResult<()> {
        self.send(value)
            .map_err(|_| HalError::internal("output channel closed"))
    }
}

impl<T: Send> ValueWriter<T> for tokio::sync::mpsc::UnboundedSender<T> {
    fn write(&self, value: T) -> HalResult<()> {
        self.send(value)
            .map_err(|_| HalError::internal("output channel closed"))
    }
}

/// A writer that collects values in memory, for tests and synchronous
/// callers that want the whole batch at once.
#[derive(Debug, Default)]
pub struct VecWriter<T> {
    items: Mutex<Vec<T>>,
}

impl<T> VecWriter<T> {
    pub fn new() -> Self {
        VecWriter { items: Mutex::new(Vec::new()) }
    }

    /// Removes and returns everything written so far.
    pub fn take(&self) -> Vec<T> {
        match self.items.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    /// Number of values written so far.
    pub fn len(&self) -> usize {
        match self.items.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone> VecWriter<T> {
    /// Returns a copy of everything written so far.
    pub fn items(&self) -> Vec<T> {
        match self.items.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl<T: Send> ValueWriter<T> for VecWriter<T> {
    fn write(&self, value: T) -> HalResult<()> {
        match self.items.lock() {
            Ok(mut guard) => guard.push(value),
            Err(poisoned) => poisoned.into_inner().push(value),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_vec_writer_collects_in_order() {
        let writer = VecWriter::new();
        writer.write(1).unwrap();
        writer.write(2).unwrap();
        writer.write(3).unwrap();
        assert_eq!(writer.items(), vec![1, 2, 3]);
        assert_eq!(writer.take(), vec![1, 2, 3]);
        assert!(writer.is_empty());
    }

    #[test]
    fn test_std_channel_writer() {
        let (tx, rx) = std::sync::mpsc::channel();
        ValueWriter::write(&tx, 7u32).unwrap();
        assert_eq!(rx.recv().unwrap(), 7);

        drop(rx);
        assert!(ValueWriter::write(&tx, 8u32).is_err());
    }

    #[test]
    fn test_tokio_channel_writer() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        ValueWriter::write(&tx, "event").unwrap();
        assert_eq!(rx.try_recv().unwrap(), "event");

        rx.close();
        assert!(ValueWriter::write(&tx, "late").is_err());
    }
}
