//! Sequence of states visited in an episode.
use crate::NormalizedState;
use anyhow::{Context, Result};
use csv::{ReaderBuilder, Terminator, WriterBuilder};
use log::info;
use std::path::Path;

const HEADER: [&str; 4] = ["x", "xdot", "theta", "thetadot"];

/// Normalized states in the order they were visited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory(Vec<NormalizedState>);

impl Trajectory {
    /// Constructs an empty trajectory.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a state.
    pub fn push(&mut self, state: NormalizedState) {
        self.0.push(state);
    }

    /// Number of states.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no state is recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the states.
    pub fn states(&self) -> &[NormalizedState] {
        &self.0
    }

    /// Writes the trajectory as semicolon-delimited text with header
    /// `x;xdot;theta;thetadot`, one state per line.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut wtr = WriterBuilder::new()
            .delimiter(b';')
            .terminator(Terminator::Any(b'\n'))
            .from_path(path)?;
        wtr.write_record(&HEADER)?;
        for s in self.0.iter() {
            wtr.write_record(s.as_array().iter().map(|v| format!("{:.6}", v)))?;
        }
        wtr.flush()?;
        info!("Saved trajectory of {} states to {:?}", self.0.len(), path);
        Ok(())
    }

    /// Reads a trajectory written by [`Trajectory::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(true)
            .from_path(path)?;

        let header = rdr.headers()?;
        if header.iter().ne(HEADER.iter().copied()) {
            anyhow::bail!("Unexpected header: {:?}", header);
        }

        let mut states = Vec::new();
        for (i, record) in rdr.records().enumerate() {
            let record = record?;
            if record.len() != 4 {
                anyhow::bail!("Line {}: expected 4 values, got {}", i + 2, record.len());
            }
            let mut v = [0f64; 4];
            for (j, field) in record.iter().enumerate() {
                v[j] = field
                    .trim()
                    .parse()
                    .with_context(|| format!("Line {}: failed to parse {:?}", i + 2, field))?;
            }
            states.push(NormalizedState::new(v));
        }

        Ok(Self(states))
    }
}
