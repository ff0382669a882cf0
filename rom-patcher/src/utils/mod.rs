//! Shared utilities for the rom-patcher CLI

pub mod format;

pub use format::*;
