//! Git operations module
//!
//! Builds git command lines and sequences them into the sparse-checkout
//! workflows

pub mod commands;
pub mod sparse_checkout;

pub use commands::*;
pub use sparse_checkout::*;
