//! Operations module
//!
//! Launches external commands and drains their output

pub mod commands;
pub mod drain;

pub use commands::*;
pub use drain::*;
