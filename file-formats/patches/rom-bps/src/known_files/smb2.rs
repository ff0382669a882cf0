//! Super Mario Bros. 2 (NES)
//!
//! Three dumps circulate: PRG0 with an iNES 1.0 header, PRG0 with an NES 2.0
//! header, and the PRG1 revision ("Rev A"). The two PRG0 dumps share their
//! program data and differ only in the header.

use super::{INES_HEADER_SIZE, KnownFileFamily, KnownVersion, Revision, RevisionConversion};

mod assets {
    include!(concat!(env!("OUT_DIR"), "/assets.rs"));
}

/// Headered CRC32 of the PRG0 dump with an iNES 1.0 header
pub const REV_0_CRC: u32 = 0x7d3f_6f3d;

/// Headered CRC32 of the PRG0 dump with an NES 2.0 header
pub const REV_0_NES2_CRC: u32 = 0x4350_7232;

/// Headered CRC32 of the Rev A dump
pub const REV_A_CRC: u32 = 0xe0ca_425c;

const INES_HEADER: [u8; INES_HEADER_SIZE] = [
    0x4e, 0x45, 0x53, 0x1a, 0x08, 0x10, 0x40, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

const NES2_HEADER: [u8; INES_HEADER_SIZE] = [
    0x4e, 0x45, 0x53, 0x1a, 0x08, 0x10, 0x40, 0x08, 0x00, 0x00, 0x07, 0x00, 0x00, 0x00, 0x00, 0x01,
];

/// PRG0, iNES 1.0 header
pub const REV_0: KnownVersion<'static> = KnownVersion {
    name: "Super Mario Bros. 2 (U) (PRG0) [!].nes",
    revision: Revision::Rev0,
    unheadered_checksum: 0x57ac_67af,
    header: INES_HEADER,
};

/// PRG0, NES 2.0 header
pub const REV_0_NES2: KnownVersion<'static> = KnownVersion {
    name: "Super Mario Bros. 2 (USA).nes",
    revision: Revision::Rev0,
    unheadered_checksum: 0x57ac_67af,
    header: NES2_HEADER,
};

/// PRG1
pub const REV_A: KnownVersion<'static> = KnownVersion {
    name: "Super Mario Bros. 2 (USA) (Rev A).nes",
    revision: Revision::RevA,
    unheadered_checksum: 0xca59_4ace,
    header: INES_HEADER,
};

/// Converts a PRG0 dump carrying [`REV_0`]'s header into Rev A
pub const PATCH_REV_0_TO_REV_A: Option<&[u8]> = assets::REV_0_TO_REV_A;

/// Converts a Rev A dump carrying [`REV_A`]'s header into PRG0
pub const PATCH_REV_A_TO_REV_0: Option<&[u8]> = assets::REV_A_TO_REV_0;

static VERSIONS: [(u32, KnownVersion<'static>); 3] = [
    (REV_0_CRC, REV_0),
    (REV_0_NES2_CRC, REV_0_NES2),
    (REV_A_CRC, REV_A),
];

static CONVERSIONS: [RevisionConversion<'static>; 2] = [
    RevisionConversion {
        from: Revision::Rev0,
        to: Revision::RevA,
        patch: PATCH_REV_0_TO_REV_A,
    },
    RevisionConversion {
        from: Revision::RevA,
        to: Revision::Rev0,
        patch: PATCH_REV_A_TO_REV_0,
    },
];

/// The Super Mario Bros. 2 family
pub static SMB2: KnownFileFamily<'static> = KnownFileFamily {
    name: "Super Mario Bros. 2",
    versions: &VERSIONS,
    conversions: &CONVERSIONS,
};
