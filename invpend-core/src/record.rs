//! Records of training diagnostics.
//!
//! The training loop summarizes every episode in a [`Record`], a key-value
//! container of [`RecordValue`]s, and hands it to a [`Recorder`].
//!
//! ```rust
//! use invpend_core::record::{Record, RecordValue};
//!
//! let mut record = Record::from_scalar("episode", 12.0);
//! record.insert("sum_reward", RecordValue::Scalar(-0.5));
//! assert_eq!(record.get_scalar("sum_reward").unwrap(), -0.5);
//! ```
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
