//! Test utilities for BPS patches
//!
//! The [`PatchBuilder`] assembles patches from an explicit list of
//! instructions. It does not compute differences between files; the caller
//! decides every instruction, which makes it suitable for fixtures that
//! exercise one instruction kind at a time. [`RevisionFixture`] provides a
//! small made-up game family for the adaptive layer.

mod revisions;

pub use revisions::{RevisionFixture, stamp_patch};

use crate::crc::{Crc32, crc32};
use crate::patch::SIGNATURE;

/// Append an unsigned BPS number
pub fn encode_number(out: &mut Vec<u8>, mut value: u64) {
    loop {
        let low = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(0x80 | low);
            return;
        }
        out.push(low);
        value -= 1;
    }
}

/// Append a signed BPS number
pub fn encode_signed(out: &mut Vec<u8>, value: i64) {
    let sign = u64::from(value < 0);
    encode_number(out, (value.unsigned_abs() << 1) | sign);
}

/// Assembles a BPS patch instruction by instruction
#[derive(Debug, Clone)]
pub struct PatchBuilder {
    source_size: usize,
    source_checksum: u32,
    metadata: Vec<u8>,
    body: Vec<u8>,
}

impl PatchBuilder {
    /// Start a patch for the given source
    pub fn new(source: &[u8]) -> Self {
        Self {
            source_size: source.len(),
            source_checksum: crc32(source),
            metadata: Vec::new(),
            body: Vec::new(),
        }
    }

    /// A patch that reproduces `source` unchanged
    pub fn identity(source: &[u8]) -> Vec<u8> {
        let builder = Self::new(source);
        if source.is_empty() {
            builder.build(source)
        } else {
            builder.source_read(source.len()).build(source)
        }
    }

    /// Set the metadata block
    #[must_use]
    pub fn metadata(mut self, metadata: &[u8]) -> Self {
        self.metadata = metadata.to_vec();
        self
    }

    fn word(&mut self, action: u64, length: usize) {
        assert!(length > 0, "BPS runs are at least one byte long");
        encode_number(&mut self.body, ((length as u64 - 1) << 2) | action);
    }

    /// Copy `length` source bytes at the output position
    #[must_use]
    pub fn source_read(mut self, length: usize) -> Self {
        self.word(0, length);
        self
    }

    /// Insert literal bytes
    #[must_use]
    pub fn target_read(mut self, data: &[u8]) -> Self {
        self.word(1, data.len());
        self.body.extend_from_slice(data);
        self
    }

    /// Move the source cursor by `offset` and copy `length` bytes
    #[must_use]
    pub fn source_copy(mut self, length: usize, offset: i64) -> Self {
        self.word(2, length);
        encode_signed(&mut self.body, offset);
        self
    }

    /// Move the target cursor by `offset` and copy `length` bytes
    #[must_use]
    pub fn target_copy(mut self, length: usize, offset: i64) -> Self {
        self.word(3, length);
        encode_signed(&mut self.body, offset);
        self
    }

    /// Finish the patch; `target` provides the declared size and checksum
    pub fn build(self, target: &[u8]) -> Vec<u8> {
        let mut patch = SIGNATURE.to_vec();
        encode_number(&mut patch, self.source_size as u64);
        encode_number(&mut patch, target.len() as u64);
        encode_number(&mut patch, self.metadata.len() as u64);
        patch.extend_from_slice(&self.metadata);
        patch.extend_from_slice(&self.body);

        patch.extend_from_slice(&self.source_checksum.to_le_bytes());
        patch.extend_from_slice(&crc32(target).to_le_bytes());

        let mut hasher = Crc32::new();
        hasher.update(&patch);
        patch.extend_from_slice(&hasher.finalize().to_le_bytes());
        patch
    }
}
