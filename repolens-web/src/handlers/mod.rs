//! HTTP request handlers for the Repolens web server

pub mod commits;
pub mod error;
pub mod health;
pub mod pull_requests;
pub mod types;

pub use commits::*;
pub use error::*;
pub use health::*;
pub use pull_requests::*;
pub use types::*;
