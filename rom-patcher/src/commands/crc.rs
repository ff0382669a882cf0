//! Checksum command

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use std::fs;
use std::path::PathBuf;

use rom_bps::crc32;
use rom_bps::known_files::smb2::SMB2;
use rom_bps::known_files::{KnownFileFamily, KnownVersion};

use crate::utils::format_checksum;

#[derive(Args)]
pub struct CrcArgs {
    /// Files to checksum
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Number of leading bytes to leave out (16 for an iNES header, 512 for a copier header)
    #[arg(long, default_value_t = 0)]
    pub skip: usize,
}

/// Recognize a dump from the whole file or from the hashed part
///
/// The table is keyed by headered checksums, so the whole file is tried
/// first; `body_checksum` then matches program data hashed without a header.
fn identify<'a>(
    family: &KnownFileFamily<'a>,
    data: &[u8],
    body_checksum: u32,
) -> Option<&'a KnownVersion<'a>> {
    family
        .identify(data)
        .or_else(|| family.lookup_unheadered(body_checksum))
}

pub fn execute(args: CrcArgs) -> Result<()> {
    for path in &args.files {
        let data =
            fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;

        let body = data.get(args.skip..).unwrap_or_default();
        let checksum = crc32(body);
        log::debug!("{}: {} bytes hashed", path.display(), body.len());

        match identify(&SMB2, &data, checksum) {
            Some(version) => println!(
                "{}  {}  {}",
                format_checksum(checksum),
                path.display(),
                style(version.name).green()
            ),
            None => println!("{}  {}", format_checksum(checksum), path.display()),
        }
    }

    Ok(())
}
