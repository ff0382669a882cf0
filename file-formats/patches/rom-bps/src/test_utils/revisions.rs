//! Synthetic known-file family for exercising revision handling
//!
//! Mirrors the shape of the Super Mario Bros. 2 table (two headers for the
//! first revision, one for the second, conversion patches in both directions)
//! with small generated dumps instead of real ROM data.

use super::PatchBuilder;
use crate::crc::crc32;
use crate::known_files::{
    INES_HEADER_SIZE, KnownFileFamily, KnownVersion, Revision, RevisionConversion,
    unheadered_checksum,
};

const INES_HEADER: [u8; INES_HEADER_SIZE] = [
    0x4e, 0x45, 0x53, 0x1a, 0x02, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

const NES2_HEADER: [u8; INES_HEADER_SIZE] = [
    0x4e, 0x45, 0x53, 0x1a, 0x02, 0x01, 0x00, 0x08, 0x00, 0x00, 0x07, 0x00, 0x00, 0x00, 0x00, 0x01,
];

/// Where the second revision differs from the first
const REVISED: std::ops::Range<usize> = 100..110;

/// Build a patch that overwrites `source` at `offset` with `bytes`
///
/// Returns the patch and the target it produces.
pub fn stamp_patch(source: &[u8], offset: usize, bytes: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let mut target = source.to_vec();
    target[offset..offset + bytes.len()].copy_from_slice(bytes);

    let rest = source.len() - offset - bytes.len();
    let mut builder = PatchBuilder::new(source);
    if offset > 0 {
        builder = builder.source_read(offset);
    }
    builder = builder.target_read(bytes);
    if rest > 0 {
        builder = builder.source_read(rest);
    }

    let patch = builder.build(&target);
    (patch, target)
}

/// Three dumps of a made-up game plus conversion patches between revisions
#[derive(Debug, Clone)]
pub struct RevisionFixture {
    /// First revision, iNES 1.0 header (canonical)
    pub rev_0: Vec<u8>,
    /// First revision, NES 2.0 header
    pub rev_0_nes2: Vec<u8>,
    /// Second revision, iNES 1.0 header
    pub rev_a: Vec<u8>,
    versions: [(u32, KnownVersion<'static>); 3],
    rev_0_to_rev_a: Vec<u8>,
    rev_a_to_rev_0: Vec<u8>,
}

impl RevisionFixture {
    /// Size of the generated program data
    pub const PROGRAM_SIZE: usize = 4096;

    /// Generate the dumps, table and conversion patches
    pub fn new() -> Self {
        let program: Vec<u8> = (0..Self::PROGRAM_SIZE)
            .map(|i| (i * 31 % 251) as u8)
            .collect();

        let rev_0 = [&INES_HEADER[..], &program].concat();
        let rev_0_nes2 = [&NES2_HEADER[..], &program].concat();

        let revised = vec![0xEE; REVISED.len()];
        let (rev_0_to_rev_a, rev_a) = stamp_patch(&rev_0, REVISED.start, &revised);
        let (rev_a_to_rev_0, _) = stamp_patch(&rev_a, REVISED.start, &rev_0[REVISED]);

        let versions = [
            (
                crc32(&rev_0),
                KnownVersion {
                    name: "Test Game (PRG0).nes",
                    revision: Revision::Rev0,
                    unheadered_checksum: unheadered_checksum(&rev_0),
                    header: INES_HEADER,
                },
            ),
            (
                crc32(&rev_0_nes2),
                KnownVersion {
                    name: "Test Game (NES 2.0).nes",
                    revision: Revision::Rev0,
                    unheadered_checksum: unheadered_checksum(&rev_0_nes2),
                    header: NES2_HEADER,
                },
            ),
            (
                crc32(&rev_a),
                KnownVersion {
                    name: "Test Game (Rev A).nes",
                    revision: Revision::RevA,
                    unheadered_checksum: unheadered_checksum(&rev_a),
                    header: INES_HEADER,
                },
            ),
        ];

        Self {
            rev_0,
            rev_0_nes2,
            rev_a,
            versions,
            rev_0_to_rev_a,
            rev_a_to_rev_0,
        }
    }

    /// Conversion entries borrowing the generated patches
    pub fn conversions(&self) -> [RevisionConversion<'_>; 2] {
        [
            RevisionConversion {
                from: Revision::Rev0,
                to: Revision::RevA,
                patch: Some(self.rev_0_to_rev_a.as_slice()),
            },
            RevisionConversion {
                from: Revision::RevA,
                to: Revision::Rev0,
                patch: Some(self.rev_a_to_rev_0.as_slice()),
            },
        ]
    }

    /// The family table, using the given conversion entries
    pub fn family<'a>(&'a self, conversions: &'a [RevisionConversion<'a>]) -> KnownFileFamily<'a> {
        KnownFileFamily {
            name: "Test Game",
            versions: &self.versions,
            conversions,
        }
    }
}

impl Default for RevisionFixture {
    fn default() -> Self {
        Self::new()
    }
}
