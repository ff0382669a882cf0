//! Instruction execution through `apply`

use crate::common::{Op, generate_test_data, literal_patch, make_patch, sha256};
use pretty_assertions::assert_eq;
use rom_bps::{Buffer, Error, apply};

#[test]
fn test_literal_replacement() {
    let source = b"Hello, world!";
    let target = b"Goodbye, world!";
    let patch = literal_patch(source, target);

    assert_eq!(apply(source, &patch).unwrap(), target);
}

#[test]
fn test_mixed_instructions() {
    let source = b"ABCDEFGHIJ";
    let target = b"ABCxyzHIJxyzHIJ";
    let patch = make_patch(
        source,
        target,
        &[],
        &[
            Op::SourceRead(3),
            Op::TargetRead(b"xyz"),
            Op::SourceCopy(3, 7),
            // Repeat everything from the literal on
            Op::TargetCopy(6, 3),
        ],
    );

    assert_eq!(apply(source, &patch).unwrap(), target);
}

#[test]
fn test_overlapping_target_copy_extends_run() {
    let source = b"";
    let target = vec![0xA5; 4096];
    let patch = make_patch(
        source,
        &target,
        &[],
        &[Op::TargetRead(&[0xA5]), Op::TargetCopy(4095, 0)],
    );

    assert_eq!(apply(source, &patch).unwrap(), target);
}

#[test]
fn test_large_source_read() {
    let source = generate_test_data(256 * 1024);
    let mut target = source.clone();
    target[1000..1004].copy_from_slice(b"BPS!");

    let patch = make_patch(
        &source,
        &target,
        &[],
        &[
            Op::SourceRead(1000),
            Op::TargetRead(b"BPS!"),
            Op::SourceRead(source.len() - 1004),
        ],
    );

    let output = apply(&source, &patch).unwrap();
    assert_eq!(sha256(&output), sha256(&target));
}

#[test]
fn test_source_copy_walks_backwards() {
    let source = b"0123456789";
    let target = b"789456123";
    let patch = make_patch(
        source,
        target,
        &[],
        &[
            Op::SourceCopy(3, 7),
            Op::SourceCopy(3, -6),
            Op::SourceCopy(3, -6),
        ],
    );

    assert_eq!(apply(source, &patch).unwrap(), target);
}

#[test]
fn test_wrong_source() {
    let patch = literal_patch(b"expected", b"output");

    assert_eq!(
        apply(b"expectet", &patch),
        Err(Error::WrongInputChecksum {
            expected: crc32fast::hash(b"expected"),
            actual: crc32fast::hash(b"expectet"),
        })
    );
    assert_eq!(
        apply(b"too long!", &patch),
        Err(Error::WrongInputSize {
            expected: 8,
            actual: 9,
        })
    );
}

#[test]
fn test_wrong_input_errors_read_as_such() {
    let patch = literal_patch(b"expected", b"output");
    let err = apply(b"other", &patch).unwrap_err();

    assert!(err.is_wrong_input());
    assert!(err.to_string().contains("not intended for this ROM"));
}

#[test]
fn test_corrupt_patch_reports_buffer() {
    let source = b"short";
    let target = b"xxxxxxxxxx";
    let patch = make_patch(source, target, &[], &[Op::SourceRead(10)]);

    let err = apply(source, &patch).unwrap_err();
    assert!(matches!(
        err,
        Error::OutOfBounds {
            buffer: Buffer::Source,
            ..
        }
    ));
    assert!(err.is_corruption());
}

#[test]
fn test_not_a_patch() {
    assert_eq!(apply(b"rom", b"PATCH"), Err(Error::Malformed));
    assert_eq!(apply(b"rom", b""), Err(Error::Malformed));
    assert_eq!(apply(b"rom", b"BPS"), Err(Error::Malformed));
}
