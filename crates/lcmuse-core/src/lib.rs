//! Domain types and service traits for lcmuse.

pub mod config;
pub mod error;
pub mod history;
pub mod identity;
pub mod ipc;
pub mod network;
pub mod script;
pub mod shell;
pub mod suggestion;

// Re-export common error type
pub use error::{LcmuseError, Result};
