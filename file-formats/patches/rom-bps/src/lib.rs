//! # rom_bps - BPS Patch Library
//!
//! Applies BPS patches, the delta format used by most ROM hacks for
//! cartridge-era consoles, and recovers from the most common reasons a patch
//! refuses a user's file.
//!
//! ## Features
//!
//! - Strict BPS decoding with bounds-checked instruction execution
//! - Table-driven CRC32 matching the checksums stored in patch footers
//! - Header repair and revision conversion for known dumps
//! - Removal of 512-byte copier headers
//!
//! ## Examples
//!
//! ### Basic Usage
//!
//! ```no_run
//! use rom_bps::apply;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let source = std::fs::read("game.sfc")?;
//! let patch = std::fs::read("translation.bps")?;
//!
//! let target = apply(&source, &patch)?;
//! std::fs::write("game (translated).sfc", target)?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Adaptive Application
//!
//! ```no_run
//! use rom_bps::{AdaptiveOptions, adaptive_apply};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let source = std::fs::read("Super Mario Bros. 2 (USA).nes")?;
//! let patch = std::fs::read("hack.bps")?;
//!
//! match adaptive_apply(&source, &patch, AdaptiveOptions::default()) {
//!     Ok(target) => std::fs::write("hack.nes", target)?,
//!     Err(err) if err.is_wrong_input() => eprintln!("Wrong ROM: {err}"),
//!     Err(err) => return Err(err.into()),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Inspecting a Patch
//!
//! ```no_run
//! use rom_bps::BpsPatch;
//!
//! # fn main() -> Result<(), rom_bps::Error> {
//! # let data = Vec::new();
//! let patch = BpsPatch::parse(&data)?;
//! println!("{} -> {} bytes", patch.source_size, patch.target_size);
//!
//! for instruction in patch.instructions() {
//!     let instruction = instruction?;
//!     println!("{} x{}", instruction.action().name(), instruction.len());
//! }
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod adaptive;
pub mod crc;
pub mod error;
pub mod known_files;
pub mod patch;

#[cfg(any(test, feature = "test-utils", doc))]
pub mod test_utils;

// Re-export commonly used types
pub use adaptive::{AdaptiveOptions, COPIER_HEADER_SIZE, adaptive_apply, adaptive_apply_with};
pub use crc::{Crc32, crc32};
pub use error::{Buffer, Checksum, Error, Result};
pub use known_files::{KnownFileFamily, KnownVersion, Revision, unheadered_checksum};
pub use patch::{
    Action, BpsPatch, Instruction, PatchFooter, apply, expected_source_checksum,
};
