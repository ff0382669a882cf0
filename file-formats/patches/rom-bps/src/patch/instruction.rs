//! BPS instruction stream decoding

use super::reader::PatchReader;
use crate::{Error, Result};

/// Low two bits of an instruction word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Copy from the source at the current output position
    SourceRead,
    /// Copy literal bytes out of the patch
    TargetRead,
    /// Copy from the source at a relative cursor
    SourceCopy,
    /// Copy from already written output at a relative cursor
    TargetCopy,
}

impl Action {
    fn from_bits(bits: u64) -> Self {
        match bits & 3 {
            0 => Self::SourceRead,
            1 => Self::TargetRead,
            2 => Self::SourceCopy,
            _ => Self::TargetCopy,
        }
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            Self::SourceRead => "SourceRead",
            Self::TargetRead => "TargetRead",
            Self::SourceCopy => "SourceCopy",
            Self::TargetCopy => "TargetCopy",
        }
    }
}

/// One decoded instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction<'a> {
    /// `length` bytes of source at the output position
    SourceRead {
        /// Run length, at least one
        length: usize,
    },
    /// Literal bytes taken from the patch
    TargetRead {
        /// The literal run
        data: &'a [u8],
    },
    /// `length` bytes of source after moving the source cursor by `offset`
    SourceCopy {
        /// Run length, at least one
        length: usize,
        /// Relative move applied to the source cursor before copying
        offset: i64,
    },
    /// `length` bytes of output after moving the target cursor by `offset`
    TargetCopy {
        /// Run length, at least one
        length: usize,
        /// Relative move applied to the target cursor before copying
        offset: i64,
    },
}

impl Instruction<'_> {
    /// The action encoded in the instruction word
    pub fn action(&self) -> Action {
        match self {
            Self::SourceRead { .. } => Action::SourceRead,
            Self::TargetRead { .. } => Action::TargetRead,
            Self::SourceCopy { .. } => Action::SourceCopy,
            Self::TargetCopy { .. } => Action::TargetCopy,
        }
    }

    /// Number of output bytes the instruction produces
    pub fn len(&self) -> usize {
        match self {
            Self::TargetRead { data } => data.len(),
            Self::SourceRead { length }
            | Self::SourceCopy { length, .. }
            | Self::TargetCopy { length, .. } => *length,
        }
    }

    /// Always false; a run is at least one byte long
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Iterator over the instruction stream of a patch
///
/// Stops when the read position reaches the footer, or after the first error.
#[derive(Debug, Clone)]
pub struct Instructions<'a> {
    reader: PatchReader<'a>,
    end: usize,
    failed: bool,
}

impl<'a> Instructions<'a> {
    pub(crate) fn new(reader: PatchReader<'a>, end: usize) -> Self {
        Self {
            reader,
            end,
            failed: false,
        }
    }

    /// Patch offset of the next instruction
    pub fn position(&self) -> usize {
        self.reader.position()
    }

    fn decode(&mut self) -> Result<Instruction<'a>> {
        let start = self.reader.position();
        let word = self.reader.read_number()?;
        let length = usize::try_from(word >> 2)
            .ok()
            .and_then(|length| length.checked_add(1))
            .ok_or(Error::NumberOverflow { offset: start })?;

        Ok(match Action::from_bits(word) {
            Action::SourceRead => Instruction::SourceRead { length },
            Action::TargetRead => Instruction::TargetRead {
                data: self.reader.read_bytes(length)?,
            },
            Action::SourceCopy => Instruction::SourceCopy {
                length,
                offset: self.reader.read_signed()?,
            },
            Action::TargetCopy => Instruction::TargetCopy {
                length,
                offset: self.reader.read_signed()?,
            },
        })
    }
}

impl<'a> Iterator for Instructions<'a> {
    type Item = Result<Instruction<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.reader.position() >= self.end {
            return None;
        }

        let instruction = self.decode();
        self.failed = instruction.is_err();
        Some(instruction)
    }
}

impl std::iter::FusedIterator for Instructions<'_> {}
