//! svote platform host.
//!
//! Loads a [`PlatformConfig`], initialises logging and wires the ballot
//! farm, the payment engine and the democracy index into one [`Platform`].

pub mod config;
pub mod error;
pub mod logging;
pub mod platform;

pub use config::PlatformConfig;
pub use error::NodeError;
pub use logging::{init_logging, LogFormat};
pub use platform::Platform;
