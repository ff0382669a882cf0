//! Level 3: Integration Tests
//!
//! Adaptive application end-to-end, plus robustness against arbitrary input.

pub mod adaptive;
