//! BPS header and footer parsing

use super::instruction::Instructions;
use super::reader::PatchReader;
use crate::crc::{Crc32, crc32};
use crate::error::{Buffer, Checksum};
use crate::{Error, Result};

/// Magic signature at the start of every patch
pub const SIGNATURE: [u8; 4] = *b"BPS1";

/// Size of the trailing checksum block
pub const FOOTER_SIZE: usize = 12;

/// The three checksums stored at the end of a patch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchFooter {
    /// CRC32 of the source the patch was built against
    pub source_checksum: u32,
    /// CRC32 of the target the patch produces
    pub target_checksum: u32,
    /// CRC32 of every patch byte before this field
    pub patch_checksum: u32,
}

impl PatchFooter {
    /// Read the footer from the last twelve bytes of a patch
    pub fn read(patch: &[u8]) -> Result<Self> {
        let start = footer_start(patch)?;
        Ok(Self {
            source_checksum: u32_at(patch, start),
            target_checksum: u32_at(patch, start + 4),
            patch_checksum: u32_at(patch, start + 8),
        })
    }
}

/// Offset of the footer, which is also where the instruction stream ends
pub(crate) fn footer_start(patch: &[u8]) -> Result<usize> {
    patch.len().checked_sub(FOOTER_SIZE).ok_or_else(|| {
        Error::out_of_bounds(
            Buffer::Patch,
            patch.len() as i64 - FOOTER_SIZE as i64,
            FOOTER_SIZE,
        )
    })
}

fn u32_at(patch: &[u8], pos: usize) -> u32 {
    u32::from_le_bytes([patch[pos], patch[pos + 1], patch[pos + 2], patch[pos + 3]])
}

/// Read the checksum a patch expects of its source without decoding it
///
/// Only the footer is looked at, so this also succeeds on buffers that are not
/// BPS patches at all as long as they hold at least twelve bytes.
pub fn expected_source_checksum(patch: &[u8]) -> Result<u32> {
    let start = footer_start(patch)?;
    Ok(u32_at(patch, start))
}

/// Consume the signature, failing with [`Error::Malformed`] on mismatch
pub(crate) fn read_signature(reader: &mut PatchReader<'_>) -> Result<()> {
    for expected in SIGNATURE {
        match reader.read_u8() {
            Ok(byte) if byte == expected => {}
            _ => return Err(Error::Malformed),
        }
    }
    Ok(())
}

/// A parsed patch, borrowing the patch bytes
#[derive(Debug, Clone)]
pub struct BpsPatch<'a> {
    data: &'a [u8],
    /// Length of the source the patch was built against
    pub source_size: usize,
    /// Length of the target the patch produces
    pub target_size: usize,
    /// Free-form metadata, usually UTF-8 XML or empty
    pub metadata: &'a [u8],
    /// Checksums stored at the end of the patch
    pub footer: PatchFooter,
    instructions_start: usize,
}

impl<'a> BpsPatch<'a> {
    /// Parse the header and footer of a patch
    ///
    /// The instruction stream is not touched; use [`BpsPatch::instructions`]
    /// to walk it.
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut reader = PatchReader::new(data);
        read_signature(&mut reader)?;

        let source_size = reader.read_size()?;
        let target_size = reader.read_size()?;
        let metadata_size = reader.read_size()?;
        let metadata = reader.read_bytes(metadata_size)?;
        let footer = PatchFooter::read(data)?;

        log::debug!(
            "BPS header: source={source_size}, target={target_size}, metadata={metadata_size}, \
             source_crc={:08x}",
            footer.source_checksum
        );

        Ok(Self {
            data,
            source_size,
            target_size,
            metadata,
            footer,
            instructions_start: reader.position(),
        })
    }

    /// The raw patch bytes
    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    /// Metadata as text, if it is valid UTF-8 and not empty
    pub fn metadata_str(&self) -> Option<&'a str> {
        std::str::from_utf8(self.metadata)
            .ok()
            .filter(|text| !text.is_empty())
    }

    /// Iterate over the instruction stream
    pub fn instructions(&self) -> Instructions<'a> {
        let reader = PatchReader::at(self.data, self.instructions_start);
        Instructions::new(reader, self.data.len() - FOOTER_SIZE)
    }

    /// Check the patch against its own checksum
    ///
    /// `apply` never calls this; it is for callers who want stricter checks.
    pub fn verify_patch(&self) -> Result<()> {
        let mut hasher = Crc32::new();
        hasher.update(&self.data[..self.data.len() - 4]);
        let actual = hasher.finalize();

        if actual == self.footer.patch_checksum {
            Ok(())
        } else {
            Err(Error::ChecksumMismatch {
                what: Checksum::Patch,
                expected: self.footer.patch_checksum,
                actual,
            })
        }
    }

    /// Check a produced target against the checksum stored in the patch
    pub fn verify_target(&self, target: &[u8]) -> Result<()> {
        let actual = crc32(target);

        if actual == self.footer.target_checksum {
            Ok(())
        } else {
            Err(Error::ChecksumMismatch {
                what: Checksum::Target,
                expected: self.footer.target_checksum,
                actual,
            })
        }
    }
}
