//! CLI command handlers
//!
//! Each handler runs one repository operation and renders its result.

pub mod client_commands;

pub use client_commands::*;
