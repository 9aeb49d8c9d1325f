mod base;
mod config;
pub use base::CartPendulum;
pub use config::CartPendulumConfig;
