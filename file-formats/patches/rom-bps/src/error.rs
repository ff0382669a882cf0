//! Error types for BPS patch application

use thiserror::Error;

/// Result type alias for patch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for patch operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The buffer does not start with the `BPS1` signature
    #[error("Not a BPS patch")]
    Malformed,

    /// The source length differs from the length the patch was built against
    #[error("This patch is not intended for this ROM: expected {expected} bytes, got {actual}")]
    WrongInputSize {
        /// Source length declared by the patch
        expected: usize,
        /// Length of the supplied source
        actual: usize,
    },

    /// The source checksum differs from the one recorded in the patch footer
    #[error(
        "This patch is not intended for this ROM: expected CRC32 {expected:08x}, got {actual:08x}"
    )]
    WrongInputChecksum {
        /// Source checksum recorded in the patch footer
        expected: u32,
        /// Checksum of the supplied source
        actual: u32,
    },

    /// A read or write fell outside one of the buffers
    #[error("Corrupt patch: {len} byte(s) at offset {offset} are outside the {buffer} buffer")]
    OutOfBounds {
        /// Which buffer was addressed
        buffer: Buffer,
        /// First offset accessed
        offset: i64,
        /// Number of bytes accessed
        len: usize,
    },

    /// A variable-length number does not fit in 64 bits
    #[error("Corrupt patch: variable-length number at offset {offset} overflows")]
    NumberOverflow {
        /// Patch offset of the number's first byte
        offset: usize,
    },

    /// An opt-in footer verification failed
    #[error("Checksum mismatch for {what}: expected {expected:08x}, got {actual:08x}")]
    ChecksumMismatch {
        /// Which footer field was verified
        what: Checksum,
        /// Checksum stored in the footer
        expected: u32,
        /// Checksum that was computed
        actual: u32,
    },
}

/// The buffers an instruction can address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Buffer {
    /// The input being patched
    Source,
    /// The output being produced
    Target,
    /// The patch itself
    Patch,
}

impl std::fmt::Display for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Source => "source",
            Self::Target => "target",
            Self::Patch => "patch",
        })
    }
}

/// Footer checksums that can be verified on request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checksum {
    /// CRC32 of the produced target
    Target,
    /// CRC32 of the patch, excluding its own last four bytes
    Patch,
}

impl std::fmt::Display for Checksum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Target => "target",
            Self::Patch => "patch",
        })
    }
}

impl Error {
    /// Create a new OutOfBounds error
    pub(crate) fn out_of_bounds(buffer: Buffer, offset: impl TryInto<i64>, len: usize) -> Self {
        Self::OutOfBounds {
            buffer,
            offset: offset.try_into().unwrap_or(i64::MAX),
            len,
        }
    }

    /// Check if the patch is valid but targets a different input
    ///
    /// These are the only errors the adaptive layer tries to work around.
    pub fn is_wrong_input(&self) -> bool {
        matches!(
            self,
            Self::WrongInputSize { .. } | Self::WrongInputChecksum { .. }
        )
    }

    /// Check if this error indicates the patch itself is damaged
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Self::Malformed
                | Self::OutOfBounds { .. }
                | Self::NumberOverflow { .. }
                | Self::ChecksumMismatch { .. }
        )
    }
}
