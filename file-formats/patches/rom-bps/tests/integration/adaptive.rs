//! Adaptive application end-to-end

use crate::common::{Op, generate_test_data, init_logging, literal_patch, make_patch, sha256};
use pretty_assertions::assert_eq;
use rom_bps::known_files::RevisionConversion;
use rom_bps::{
    AdaptiveOptions, COPIER_HEADER_SIZE, Error, KnownFileFamily, KnownVersion, Revision,
    adaptive_apply, adaptive_apply_with, apply, unheadered_checksum,
};

const HEADER: [u8; 16] = *b"NES\x1a\x01\x01\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00";
const ALT_HEADER: [u8; 16] = *b"NES\x1a\x01\x01\x00\x08\x00\x00\x07\x00\x00\x00\x00\x01";

struct Dumps {
    rev_0: Vec<u8>,
    rev_0_alt: Vec<u8>,
    rev_a: Vec<u8>,
}

impl Dumps {
    fn new() -> Self {
        let program = generate_test_data(2048);
        let mut revised = program.clone();
        revised[500..504].copy_from_slice(b"REVA");

        Self {
            rev_0: [&HEADER[..], &program].concat(),
            rev_0_alt: [&ALT_HEADER[..], &program].concat(),
            rev_a: [&HEADER[..], &revised].concat(),
        }
    }

    fn versions(&self) -> [(u32, KnownVersion<'static>); 3] {
        let version = |data: &[u8], name, revision, header| {
            (
                crc32fast::hash(data),
                KnownVersion {
                    name,
                    revision,
                    unheadered_checksum: unheadered_checksum(data),
                    header,
                },
            )
        };

        [
            version(&self.rev_0, "Game (PRG0)", Revision::Rev0, HEADER),
            version(&self.rev_0_alt, "Game (PRG0, NES 2.0)", Revision::Rev0, ALT_HEADER),
            version(&self.rev_a, "Game (Rev A)", Revision::RevA, HEADER),
        ]
    }
}

#[test]
fn test_revision_conversion_with_custom_family() {
    init_logging();

    let dumps = Dumps::new();
    let versions = dumps.versions();
    let to_rev_a = literal_patch(&dumps.rev_0, &dumps.rev_a);
    let to_rev_0 = literal_patch(&dumps.rev_a, &dumps.rev_0);
    let conversions = [
        RevisionConversion {
            from: Revision::Rev0,
            to: Revision::RevA,
            patch: Some(to_rev_a.as_slice()),
        },
        RevisionConversion {
            from: Revision::RevA,
            to: Revision::Rev0,
            patch: Some(to_rev_0.as_slice()),
        },
    ];
    let family = KnownFileFamily {
        name: "Game",
        versions: &versions,
        conversions: &conversions,
    };

    let mut hacked = dumps.rev_a.clone();
    hacked[16..20].copy_from_slice(b"HACK");
    let hack = make_patch(
        &dumps.rev_a,
        &hacked,
        &[],
        &[
            Op::SourceRead(16),
            Op::TargetRead(b"HACK"),
            Op::SourceCopy(dumps.rev_a.len() - 20, 20),
        ],
    );
    assert_eq!(apply(&dumps.rev_a, &hack).unwrap(), hacked);

    for source in [&dumps.rev_0, &dumps.rev_0_alt] {
        let output = adaptive_apply_with(source, &hack, AdaptiveOptions::default(), &family)
            .expect("conversion should make the patch apply");
        assert_eq!(sha256(&output), sha256(&hacked));
    }

    // The family knows nothing about this file
    assert!(matches!(
        adaptive_apply_with(&hacked, &hack, AdaptiveOptions::default(), &family),
        Err(Error::WrongInputChecksum { .. })
    ));
}

#[test]
fn test_smb2_table_leaves_other_games_alone() {
    let source = generate_test_data(4096);
    let expected_source = generate_test_data(4095);
    let patch = literal_patch(&expected_source, b"target");

    assert_eq!(
        adaptive_apply(&source, &patch, AdaptiveOptions::default()),
        Err(Error::WrongInputSize {
            expected: 4095,
            actual: 4096,
        })
    );
}

#[test]
fn test_copier_header_is_preserved() {
    init_logging();

    let cartridge = generate_test_data(8192);
    let mut translated = cartridge.clone();
    translated[0x100..0x108].copy_from_slice(b"ENGLISH!");
    let patch = make_patch(
        &cartridge,
        &translated,
        &[],
        &[
            Op::SourceRead(0x100),
            Op::TargetRead(b"ENGLISH!"),
            Op::SourceRead(cartridge.len() - 0x108),
        ],
    );

    let copier_header = vec![0u8; COPIER_HEADER_SIZE];
    let source = [&copier_header[..], &cartridge].concat();

    let output = adaptive_apply(&source, &patch, AdaptiveOptions::default()).unwrap();
    assert_eq!(output.len(), COPIER_HEADER_SIZE + translated.len());
    assert_eq!(&output[..COPIER_HEADER_SIZE], &copier_header[..]);
    assert_eq!(sha256(&output[COPIER_HEADER_SIZE..]), sha256(&translated));

    let strict = AdaptiveOptions::strict();
    assert_eq!(
        adaptive_apply(&source, &patch, strict),
        apply(&source, &patch)
    );
}

#[test]
fn test_corrupt_patch_is_not_retried() {
    let source = generate_test_data(1024);
    let patch = make_patch(&source, &[0u8; 8], &[], &[Op::SourceCopy(8, 4096)]);

    assert!(matches!(
        adaptive_apply(&source, &patch, AdaptiveOptions::default()),
        Err(Error::OutOfBounds { .. })
    ));
}
