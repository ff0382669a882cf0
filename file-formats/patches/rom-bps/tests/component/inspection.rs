//! Reading patches without applying them

use crate::common::{Op, make_patch};
use pretty_assertions::assert_eq;
use rom_bps::patch::FOOTER_SIZE;
use rom_bps::{Action, BpsPatch, Checksum, Error, Instruction, apply, expected_source_checksum};

fn sample() -> (Vec<u8>, Vec<u8>, Vec<u8>) {
    let source = b"The quick brown fox".to_vec();
    let target = b"The quick red fox fox".to_vec();
    let patch = make_patch(
        &source,
        &target,
        b"<?xml version=\"1.0\"?><patch/>",
        &[
            Op::SourceRead(10),
            Op::TargetRead(b"red"),
            Op::SourceCopy(4, 15),
            Op::TargetCopy(4, 13),
        ],
    );
    (source, target, patch)
}

#[test]
fn test_header_fields() {
    let (source, target, patch) = sample();
    let parsed = BpsPatch::parse(&patch).unwrap();

    assert_eq!(parsed.source_size, source.len());
    assert_eq!(parsed.target_size, target.len());
    assert_eq!(parsed.metadata_str(), Some("<?xml version=\"1.0\"?><patch/>"));
    assert_eq!(parsed.footer.source_checksum, crc32fast::hash(&source));
    assert_eq!(parsed.footer.target_checksum, crc32fast::hash(&target));
    assert_eq!(parsed.as_bytes(), &patch[..]);
    assert_eq!(expected_source_checksum(&patch), Ok(crc32fast::hash(&source)));
}

#[test]
fn test_instruction_listing() {
    let (source, target, patch) = sample();
    assert_eq!(apply(&source, &patch).unwrap(), target);

    let parsed = BpsPatch::parse(&patch).unwrap();
    let instructions: Vec<Instruction<'_>> = parsed
        .instructions()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(
        instructions,
        vec![
            Instruction::SourceRead { length: 10 },
            Instruction::TargetRead { data: b"red" },
            Instruction::SourceCopy {
                length: 4,
                offset: 15,
            },
            Instruction::TargetCopy {
                length: 4,
                offset: 13,
            },
        ]
    );

    let actions: Vec<Action> = instructions.iter().map(Instruction::action).collect();
    assert_eq!(
        actions,
        [
            Action::SourceRead,
            Action::TargetRead,
            Action::SourceCopy,
            Action::TargetCopy
        ]
    );

    let produced: usize = instructions.iter().map(Instruction::len).sum();
    assert_eq!(produced, target.len());
}

#[test]
fn test_verification_is_opt_in() {
    let (source, target, mut patch) = sample();

    // Damage the recorded target checksum; apply() does not care.
    let target_crc_at = patch.len() - FOOTER_SIZE + 4;
    patch[target_crc_at] ^= 0xFF;
    assert_eq!(apply(&source, &patch).unwrap(), target);

    let parsed = BpsPatch::parse(&patch).unwrap();
    assert!(matches!(
        parsed.verify_target(&target),
        Err(Error::ChecksumMismatch {
            what: Checksum::Target,
            ..
        })
    ));
    assert!(matches!(
        parsed.verify_patch(),
        Err(Error::ChecksumMismatch {
            what: Checksum::Patch,
            ..
        })
    ));
}

#[test]
fn test_parse_needs_footer() {
    let mut patch = b"BPS1".to_vec();
    patch.extend_from_slice(&[0x80, 0x80, 0x80]);

    assert!(matches!(
        BpsPatch::parse(&patch),
        Err(Error::OutOfBounds { .. })
    ));
}
