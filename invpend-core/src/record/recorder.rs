use super::Record;

/// Writes records to an output destination.
pub trait Recorder {
    /// Writes a record.
    fn write(&mut self, record: Record);

    /// Flushes records written so far to the destination.
    fn flush(&mut self) {}
}
