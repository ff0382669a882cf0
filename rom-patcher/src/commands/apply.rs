//! Patch application command

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use std::fs;
use std::path::{Path, PathBuf};

use rom_bps::{AdaptiveOptions, BpsPatch, adaptive_apply};

use crate::utils::format_bytes;

#[derive(Args)]
pub struct ApplyArgs {
    /// Path to the ROM to patch
    pub source: PathBuf,

    /// Path to the BPS patch
    pub patch: PathBuf,

    /// Where to write the result (default: patch name with the ROM's extension)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Do not repair headers or revisions of known dumps
    #[arg(long)]
    pub no_smb2: bool,

    /// Do not try stripping a 512-byte copier header
    #[arg(long)]
    pub no_smc: bool,

    /// Apply the patch as-is, without any repair
    #[arg(long, conflicts_with_all = ["no_smb2", "no_smc"])]
    pub strict: bool,

    /// Also check the patch and target checksums stored in the patch
    #[arg(long)]
    pub verify: bool,
}

impl ApplyArgs {
    fn options(&self) -> AdaptiveOptions {
        if self.strict {
            AdaptiveOptions::strict()
        } else {
            AdaptiveOptions::default()
                .with_smb2(!self.no_smb2)
                .with_smc(!self.no_smc)
        }
    }
}

/// Output path used when none is given: the patch path with the source's extension
pub fn default_output(source: &Path, patch: &Path) -> PathBuf {
    match source.extension() {
        Some(extension) => patch.with_extension(extension),
        None => patch.with_extension(""),
    }
}

pub fn execute(args: ApplyArgs, quiet: bool) -> Result<()> {
    let source = fs::read(&args.source)
        .with_context(|| format!("Failed to read ROM: {}", args.source.display()))?;
    let patch = fs::read(&args.patch)
        .with_context(|| format!("Failed to read patch: {}", args.patch.display()))?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.source, &args.patch));
    if output == args.source {
        anyhow::bail!(
            "Refusing to overwrite the source ROM {}; pass --output",
            args.source.display()
        );
    }

    let options = args.options();
    log::debug!("Applying {} with {options:?}", args.patch.display());

    let target = adaptive_apply(&source, &patch, options).with_context(|| {
        format!(
            "Failed to apply {} to {}",
            args.patch.display(),
            args.source.display()
        )
    })?;

    if args.verify {
        let parsed = BpsPatch::parse(&patch)?;
        parsed.verify_patch().context("Patch file is damaged")?;

        // A kept copier header sits in front of the patched data.
        let produced = &target[target.len().saturating_sub(parsed.target_size)..];
        parsed
            .verify_target(produced)
            .context("Patched ROM does not match the patch's target checksum")?;
    }

    fs::write(&output, &target)
        .with_context(|| format!("Failed to write output: {}", output.display()))?;

    if !quiet {
        println!(
            "✓ Patched {} -> {} ({})",
            style(args.source.display()).cyan(),
            style(output.display()).green(),
            format_bytes(target.len() as u64)
        );
    }

    Ok(())
}
