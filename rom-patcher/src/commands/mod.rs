//! Command implementations

pub mod apply;
pub mod crc;
pub mod info;
