//! Two-branch action-value network.
mod base;
mod config;
pub use base::QNet;
pub use config::QNetConfig;

/// Dimension of the state input.
pub const STATE_DIM: usize = 4;
