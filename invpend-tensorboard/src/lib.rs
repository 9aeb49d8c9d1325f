//! Recorder writing episode statistics to TensorBoard event files.
use invpend_core::record::{Record, RecordValue, Recorder};
use log::{trace, warn};
use std::path::Path;
use tensorboard_rs::summary_writer::SummaryWriter;

/// Key of the record holding the horizontal axis of the plots.
const STEP_KEY: &str = "episode";

/// Write records to TFRecord.
pub struct TensorboardRecorder {
    writer: SummaryWriter,
}

impl TensorboardRecorder {
    /// Construct a [`TensorboardRecorder`].
    ///
    /// TFRecord will be stored in `logdir`.
    pub fn new<P: AsRef<Path>>(logdir: P) -> Self {
        Self {
            writer: SummaryWriter::new(logdir),
        }
    }
}

impl Recorder for TensorboardRecorder {
    /// Write a given [Record] into a TFRecord.
    ///
    /// This method handles [RecordValue::Scalar] in the [Record].
    /// Records without a scalar step are dropped.
    fn write(&mut self, record: Record) {
        let step = match record.get_scalar(STEP_KEY) {
            Ok(v) => v as usize,
            Err(e) => {
                warn!("Record dropped: {}", e);
                return;
            }
        };

        for (k, v) in record.iter() {
            if k != STEP_KEY {
                match v {
                    RecordValue::Scalar(v) => self.writer.add_scalar(k, *v, step),
                    RecordValue::String(s) => trace!("{} = {} at {}", k, s, step),
                };
            }
        }
    }

    fn flush(&mut self) {
        self.writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempdir::TempDir;

    #[test]
    fn test_write_event_file() -> Result<()> {
        let dir = TempDir::new("tensorboard_recorder")?;
        let mut recorder = TensorboardRecorder::new(dir.path());
        for episode in 0..3 {
            let mut record = Record::from_scalar("episode", episode as f32);
            record.insert("sum_reward", RecordValue::Scalar(-1.0));
            record.insert("outcome", RecordValue::String("steps_exhausted".to_string()));
            recorder.write(record);
        }
        // Without the step key nothing is written
        recorder.write(Record::from_scalar("sum_reward", 0.0));
        recorder.flush();
        // Joins the writer thread
        drop(recorder);

        let mut sizes = vec![];
        for entry in std::fs::read_dir(dir.path())? {
            let entry = entry?;
            if entry
                .file_name()
                .to_string_lossy()
                .starts_with("events.out.tfevents")
            {
                sizes.push(entry.metadata()?.len());
            }
        }
        assert_eq!(sizes.len(), 1);
        assert!(sizes[0] > 0);
        Ok(())
    }
}
