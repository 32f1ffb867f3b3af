//! Type definitions for Client Store

pub mod client;

pub use client::*;
