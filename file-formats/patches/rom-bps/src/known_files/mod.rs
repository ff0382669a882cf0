//! Registry of well-known ROM dumps
//!
//! Patches are usually built against one particular dump of a game. Different
//! dumps of the same game may differ only in their iNES header, or may be a
//! different revision of the program. A [`KnownFileFamily`] records, for one
//! game, which dumps exist and how to turn one revision into another, so the
//! adaptive layer can repair a source before retrying a patch.
//!
//! The table is keyed by the CRC32 of the *headered* dump, which is what a
//! patch records as its expected source checksum.

pub mod smb2;

use crate::crc::crc32;

/// Size of the iNES header in front of NES program data
pub const INES_HEADER_SIZE: usize = 16;

/// Program revision of a dump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Revision {
    /// First release (PRG0)
    Rev0,
    /// Revised release (PRG1)
    RevA,
}

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Rev0 => "Rev 0",
            Self::RevA => "Rev A",
        })
    }
}

/// One recognized dump
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownVersion<'a> {
    /// Conventional file name of the dump
    pub name: &'a str,
    /// Program revision
    pub revision: Revision,
    /// CRC32 of everything after the header
    pub unheadered_checksum: u32,
    /// The header this dump carries
    pub header: [u8; INES_HEADER_SIZE],
}

impl KnownVersion<'_> {
    /// Copy `data` with its header replaced by this version's header
    ///
    /// Data shorter than a header only has its existing bytes replaced.
    pub fn reheader(&self, data: &[u8]) -> Vec<u8> {
        let mut reheadered = data.to_vec();
        let len = reheadered.len().min(INES_HEADER_SIZE);
        reheadered[..len].copy_from_slice(&self.header[..len]);
        reheadered
    }
}

/// An embedded patch converting one revision into another
#[derive(Debug, Clone, Copy)]
pub struct RevisionConversion<'a> {
    /// Revision the patch applies to
    pub from: Revision,
    /// Revision the patch produces
    pub to: Revision,
    /// The patch, or `None` when it was not available at build time
    pub patch: Option<&'a [u8]>,
}

/// All known dumps of one game
#[derive(Debug, Clone, Copy)]
pub struct KnownFileFamily<'a> {
    /// Name of the game
    pub name: &'a str,
    /// Versions keyed by headered CRC32, in priority order
    pub versions: &'a [(u32, KnownVersion<'a>)],
    /// Patches between revisions
    pub conversions: &'a [RevisionConversion<'a>],
}

impl<'a> KnownFileFamily<'a> {
    /// Find the version a patch with this expected source checksum targets
    pub fn lookup(&self, headered_checksum: u32) -> Option<&'a KnownVersion<'a>> {
        self.versions
            .iter()
            .find(|(checksum, _)| *checksum == headered_checksum)
            .map(|(_, version)| version)
    }

    /// The first listed version of a revision
    ///
    /// Its header is the one conversion patches expect on their input.
    pub fn canonical(&self, revision: Revision) -> Option<&'a KnownVersion<'a>> {
        self.versions
            .iter()
            .map(|(_, version)| version)
            .find(|version| version.revision == revision)
    }

    /// The patch converting `from` into `to`, if one is available
    pub fn conversion(&self, from: Revision, to: Revision) -> Option<&'a [u8]> {
        self.conversions
            .iter()
            .find(|conversion| conversion.from == from && conversion.to == to)
            .and_then(|conversion| conversion.patch)
    }

    /// Identify a dump by its own headered checksum
    pub fn identify(&self, data: &[u8]) -> Option<&'a KnownVersion<'a>> {
        self.lookup(crc32(data))
    }

    /// Find the first version whose program data has this checksum
    ///
    /// Use this for data hashed without its header; dumps that differ only in
    /// the header resolve to the first one listed.
    pub fn lookup_unheadered(&self, unheadered_checksum: u32) -> Option<&'a KnownVersion<'a>> {
        self.versions
            .iter()
            .map(|(_, version)| version)
            .find(|version| version.unheadered_checksum == unheadered_checksum)
    }
}

/// CRC32 of a dump without its iNES header
///
/// Data no longer than a header hashes as empty.
pub fn unheadered_checksum(data: &[u8]) -> u32 {
    crc32(data.get(INES_HEADER_SIZE..).unwrap_or_default())
}
