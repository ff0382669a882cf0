//! Root CLI structure for rom-patcher

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "rom-patcher")]
#[command(about = "Apply BPS patches to ROM dumps", long_about = None)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply a patch, repairing the source if it does not match
    Apply(crate::commands::apply::ApplyArgs),

    /// Display information about a patch
    Info(crate::commands::info::InfoArgs),

    /// Print CRC32 checksums of files
    Crc(crate::commands::crc::CrcArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
