//! Patch application logic
//!
//! Validates that a patch targets the given source and then executes its
//! instruction stream into a freshly allocated target buffer.

use super::header::{FOOTER_SIZE, expected_source_checksum, read_signature};
use super::instruction::{Instruction, Instructions};
use super::reader::PatchReader;
use crate::crc::crc32;
use crate::error::Buffer;
use crate::{Error, Result};

/// Apply a BPS patch to source data
///
/// # Arguments
///
/// * `source` - The original file data
/// * `patch` - The complete patch file
///
/// # Returns
///
/// The patched file data
///
/// # Errors
///
/// Returns error if:
/// - The patch does not start with `BPS1` ([`Error::Malformed`])
/// - The source length differs from the declared one ([`Error::WrongInputSize`])
/// - The source CRC32 differs from the footer ([`Error::WrongInputChecksum`])
/// - An instruction addresses bytes outside a buffer ([`Error::OutOfBounds`])
///
/// The target and patch checksums in the footer are not verified; see
/// [`BpsPatch::verify_target`](crate::BpsPatch::verify_target) for that.
pub fn apply(source: &[u8], patch: &[u8]) -> Result<Vec<u8>> {
    let mut reader = PatchReader::new(patch);
    read_signature(&mut reader)?;

    // Size first: it is cheap and rejects most wrong inputs outright.
    let expected_size = reader.read_number()?;
    if usize::try_from(expected_size).ok() != Some(source.len()) {
        return Err(Error::WrongInputSize {
            expected: usize::try_from(expected_size).unwrap_or(usize::MAX),
            actual: source.len(),
        });
    }

    let expected_checksum = expected_source_checksum(patch)?;
    let actual_checksum = crc32(source);
    if actual_checksum != expected_checksum {
        return Err(Error::WrongInputChecksum {
            expected: expected_checksum,
            actual: actual_checksum,
        });
    }

    let target_size = reader.read_size()?;
    let metadata_size = reader.read_size()?;
    reader.read_bytes(metadata_size)?;

    log::debug!(
        "Applying BPS patch: {} -> {target_size} bytes, {metadata_size} bytes of metadata",
        source.len()
    );

    let mut decoder = Decoder::new(source, target_size);
    for instruction in Instructions::new(reader, patch.len() - FOOTER_SIZE) {
        decoder.execute(instruction?)?;
    }

    if decoder.output < target_size {
        log::debug!(
            "Instruction stream ended after {} of {target_size} bytes",
            decoder.output
        );
    }

    Ok(decoder.target)
}

/// Interpreter state: the output buffer and the three cursors
struct Decoder<'s> {
    source: &'s [u8],
    target: Vec<u8>,
    output: usize,
    source_cursor: i64,
    target_cursor: i64,
}

impl<'s> Decoder<'s> {
    fn new(source: &'s [u8], target_size: usize) -> Self {
        Self {
            source,
            target: vec![0u8; target_size],
            output: 0,
            source_cursor: 0,
            target_cursor: 0,
        }
    }

    fn execute(&mut self, instruction: Instruction<'_>) -> Result<()> {
        log::trace!("{:?} at output {}", instruction, self.output);

        match instruction {
            Instruction::SourceRead { length } => {
                let from = range(Buffer::Source, self.source.len(), self.output, length)?;
                let to = self.output_range(length)?;
                self.target[to].copy_from_slice(&self.source[from]);
            }

            Instruction::TargetRead { data } => {
                let to = self.output_range(data.len())?;
                self.target[to].copy_from_slice(data);
            }

            Instruction::SourceCopy { length, offset } => {
                let start = move_cursor(&mut self.source_cursor, offset, Buffer::Source, length)?;
                let from = range(Buffer::Source, self.source.len(), start, length)?;
                let to = self.output_range(length)?;
                self.target[to].copy_from_slice(&self.source[from]);
                self.source_cursor += length as i64;
            }

            Instruction::TargetCopy { length, offset } => {
                let start = move_cursor(&mut self.target_cursor, offset, Buffer::Target, length)?;
                range(Buffer::Target, self.target.len(), start, length)?;
                let to = self.output_range(length)?;

                // Byte by byte: the read side may overlap bytes this same
                // instruction is writing, which is how runs are expanded.
                for (i, out) in to.enumerate() {
                    self.target[out] = self.target[start + i];
                }
                self.target_cursor += length as i64;
            }
        }

        self.output += instruction.len();
        Ok(())
    }

    fn output_range(&self, length: usize) -> Result<std::ops::Range<usize>> {
        range(Buffer::Target, self.target.len(), self.output, length)
    }
}

/// Bounds-check `start..start + length` against a buffer of `size` bytes
fn range(
    buffer: Buffer,
    size: usize,
    start: usize,
    length: usize,
) -> Result<std::ops::Range<usize>> {
    match start.checked_add(length) {
        Some(end) if end <= size => Ok(start..end),
        _ => Err(Error::out_of_bounds(buffer, start, length)),
    }
}

/// Apply a relative move to a copy cursor and return the new absolute start
fn move_cursor(cursor: &mut i64, offset: i64, buffer: Buffer, length: usize) -> Result<usize> {
    let moved = cursor
        .checked_add(offset)
        .ok_or_else(|| Error::out_of_bounds(buffer, i64::MAX, length))?;
    let start = usize::try_from(moved).map_err(|_| Error::out_of_bounds(buffer, moved, length))?;
    *cursor = moved;
    Ok(start)
}
