//! Error handling module
//!
//! Defines the error taxonomy and the matching process exit codes

pub mod types;

pub use types::*;
