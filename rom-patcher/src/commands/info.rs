//! Patch inspection command

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use std::fs;
use std::path::PathBuf;

use rom_bps::known_files::smb2::SMB2;
use rom_bps::known_files::{KnownFileFamily, Revision};
use rom_bps::{Action, BpsPatch};

use crate::utils::{format_bytes, format_checksum, format_percentage};

#[derive(Args)]
pub struct InfoArgs {
    /// Path to the BPS patch
    pub patch: PathBuf,

    /// Show statistics about the instruction stream
    #[arg(long)]
    pub instructions: bool,
}

const ACTIONS: [Action; 4] = [
    Action::SourceRead,
    Action::TargetRead,
    Action::SourceCopy,
    Action::TargetCopy,
];

pub fn execute(args: InfoArgs) -> Result<()> {
    let data = fs::read(&args.patch)
        .with_context(|| format!("Failed to read patch: {}", args.patch.display()))?;
    let patch = BpsPatch::parse(&data)
        .with_context(|| format!("Failed to parse patch: {}", args.patch.display()))?;

    println!("\n{}", style("BPS Patch Information").bold().underlined());
    println!("File: {}", style(args.patch.display()).cyan());
    println!("Patch size: {}", format_bytes(data.len() as u64));
    println!(
        "Source: {} (CRC32 {})",
        format_bytes(patch.source_size as u64),
        style(format_checksum(patch.footer.source_checksum)).yellow()
    );
    println!(
        "Target: {} (CRC32 {})",
        format_bytes(patch.target_size as u64),
        style(format_checksum(patch.footer.target_checksum)).yellow()
    );

    let integrity = match patch.verify_patch() {
        Ok(()) => style("ok").green(),
        Err(_) => style("mismatch").red(),
    };
    println!(
        "Patch CRC32: {} ({integrity})",
        format_checksum(patch.footer.patch_checksum)
    );

    if let Some(version) = SMB2.lookup(patch.footer.source_checksum) {
        println!(
            "Expected ROM: {} ({})",
            style(version.name).green(),
            version.revision
        );

        for from in missing_conversions(&SMB2, version.revision) {
            println!(
                "{} {from} dumps cannot be converted to {} in this build; \
                 only {} dumps (any header) will apply",
                style("Note:").yellow(),
                version.revision,
                version.revision
            );
        }
    }

    match patch.metadata_str() {
        Some(text) => println!("\n{}\n{text}", style("Metadata").bold()),
        None if patch.metadata.is_empty() => {}
        None => println!(
            "\nMetadata: {} of binary data",
            format_bytes(patch.metadata.len() as u64)
        ),
    }

    if args.instructions {
        print_instruction_stats(&patch)?;
    }

    Ok(())
}

/// Revisions present in the family that have no conversion patch into `to`
fn missing_conversions(family: &KnownFileFamily<'_>, to: Revision) -> Vec<Revision> {
    let mut missing = Vec::new();
    for (_, version) in family.versions {
        let from = version.revision;
        if from != to && family.conversion(from, to).is_none() && !missing.contains(&from) {
            missing.push(from);
        }
    }
    missing
}

/// Position of an action in [`ACTIONS`]
fn slot(action: Action) -> usize {
    match action {
        Action::SourceRead => 0,
        Action::TargetRead => 1,
        Action::SourceCopy => 2,
        Action::TargetCopy => 3,
    }
}

fn print_instruction_stats(patch: &BpsPatch<'_>) -> Result<()> {
    let mut counts = [0u64; 4];
    let mut bytes = [0u64; 4];

    for instruction in patch.instructions() {
        let instruction = instruction.context("Failed to decode instruction stream")?;
        let index = slot(instruction.action());
        counts[index] += 1;
        bytes[index] += instruction.len() as u64;
    }

    let total: u64 = bytes.iter().sum();

    println!("\n{}", style("Instructions").bold());
    for (i, action) in ACTIONS.iter().enumerate() {
        println!(
            "  {:<11} {:>8} x  {:>10}  {:>6}",
            action.name(),
            counts[i],
            format_bytes(bytes[i]),
            format_percentage(bytes[i], total)
        );
    }
    println!("  Total output: {}", style(format_bytes(total)).green());

    Ok(())
}
