//! BPS patch file support
//!
//! BPS is a delta format: a patch describes how to build a target file out of
//! a source file using four instruction kinds.
//!
//! # Patch File Format
//!
//! 1. **Signature** - the four bytes `BPS1`
//! 2. **Header** - source size, target size and metadata size as variable-length
//!    numbers, followed by the metadata bytes
//! 3. **Instructions** - until twelve bytes before the end of the patch
//! 4. **Footer** - CRC32 of the source, the target and the patch (little endian)
//!
//! # Instructions
//!
//! Each instruction word stores the action in its low two bits and the run
//! length minus one in the remaining bits.
//!
//! - **SourceRead** - copy from the source at the current output position
//! - **TargetRead** - copy literal bytes stored in the patch
//! - **SourceCopy** - copy from the source at a relative cursor
//! - **TargetCopy** - copy from the output itself at a relative cursor
//!
//! # Applying Patches
//!
//! ```rust,no_run
//! use rom_bps::patch::{BpsPatch, apply};
//!
//! let source = std::fs::read("game.sfc")?;
//! let patch = std::fs::read("hack.bps")?;
//!
//! let target = apply(&source, &patch)?;
//!
//! // Optional: also check the footer checksums apply() does not look at
//! let parsed = BpsPatch::parse(&patch)?;
//! parsed.verify_patch()?;
//! parsed.verify_target(&target)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod apply;
mod header;
mod instruction;
pub(crate) mod reader;

pub use apply::apply;
pub use header::{BpsPatch, FOOTER_SIZE, PatchFooter, SIGNATURE, expected_source_checksum};
pub use instruction::{Action, Instruction, Instructions};
