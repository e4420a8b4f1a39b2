//! Infrastructure layer providing external service integrations.
//!
//! This module contains the assistant runtime client, the host shell bridge,
//! clipboard access, logging and command-line configuration.

pub mod assistant;
pub mod clipboard;
pub mod config;
pub mod host_bridge;
pub mod logging;

pub use assistant::*;
pub use clipboard::*;
pub use config::*;
pub use host_bridge::*;
pub use logging::*;
