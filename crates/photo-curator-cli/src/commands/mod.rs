//! CLI command definitions and handlers.

pub mod curate;

use clap::{Parser, Subcommand};

/// Photo Curator - Automated photo curation
#[derive(Parser)]
#[command(name = "photo-curator")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Shared curate arguments (manifest, thresholds, flags).
    #[command(flatten)]
    pub curate: curate::CurateArgs,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Score, cluster and curate a photo collection manifest
    Curate(curate::CurateArgs),
}

/// Process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Run completed; every cluster was curated cleanly.
    Success,
    /// Run completed, but some photos carry face issues.
    IssuesFound,
    /// Run failed.
    Error,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        match code {
            ExitCode::Success => Self::from(0),
            ExitCode::IssuesFound => Self::from(1),
            ExitCode::Error => Self::from(2),
        }
    }
}
