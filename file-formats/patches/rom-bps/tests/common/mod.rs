//! Common test utilities and fixtures
//!
//! Patches are assembled here independently of the crate's own test
//! utilities, with checksums from `crc32fast`.

#![allow(dead_code)]

use sha2::{Digest, Sha256};

/// One BPS instruction
#[derive(Debug, Clone, Copy)]
pub enum Op<'a> {
    SourceRead(usize),
    TargetRead(&'a [u8]),
    SourceCopy(usize, i64),
    TargetCopy(usize, i64),
}

/// Append a BPS variable-length number
pub fn push_number(out: &mut Vec<u8>, mut value: u64) {
    loop {
        let low = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(0x80 | low);
            break;
        }
        out.push(low);
        value -= 1;
    }
}

fn push_offset(out: &mut Vec<u8>, offset: i64) {
    push_number(out, (offset.unsigned_abs() << 1) | u64::from(offset < 0));
}

fn push_word(out: &mut Vec<u8>, action: u64, len: usize) {
    push_number(out, ((len as u64 - 1) << 2) | action);
}

/// Assemble a patch from instructions
///
/// The footer records the checksums of `source` and `target`.
pub fn make_patch(source: &[u8], target: &[u8], metadata: &[u8], ops: &[Op<'_>]) -> Vec<u8> {
    let mut patch = b"BPS1".to_vec();
    push_number(&mut patch, source.len() as u64);
    push_number(&mut patch, target.len() as u64);
    push_number(&mut patch, metadata.len() as u64);
    patch.extend_from_slice(metadata);

    for op in ops {
        match *op {
            Op::SourceRead(len) => push_word(&mut patch, 0, len),
            Op::TargetRead(data) => {
                push_word(&mut patch, 1, data.len());
                patch.extend_from_slice(data);
            }
            Op::SourceCopy(len, offset) => {
                push_word(&mut patch, 2, len);
                push_offset(&mut patch, offset);
            }
            Op::TargetCopy(len, offset) => {
                push_word(&mut patch, 3, len);
                push_offset(&mut patch, offset);
            }
        }
    }

    patch.extend_from_slice(&crc32fast::hash(source).to_le_bytes());
    patch.extend_from_slice(&crc32fast::hash(target).to_le_bytes());
    let patch_checksum = crc32fast::hash(&patch);
    patch.extend_from_slice(&patch_checksum.to_le_bytes());
    patch
}

/// A patch replacing `source` entirely with `target`
pub fn literal_patch(source: &[u8], target: &[u8]) -> Vec<u8> {
    make_patch(source, target, &[], &[Op::TargetRead(target)])
}

/// Generate test data of a specific size
pub fn generate_test_data(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 256) as u8).collect()
}

/// SHA-256 of some data, for comparing large outputs
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Install a test logger once; honours RUST_LOG
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
