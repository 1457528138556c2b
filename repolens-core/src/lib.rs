//! Repolens Core - data model, error taxonomy and ambient configuration
//!
//! Everything the repository analysis and contribution reports share lives here,
//! so the domain crate and the web layer agree on one set of types.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use types::*;

// Re-export commonly used external types
pub use tracing;
