//! CLI command definitions

use clap::Args;
use std::path::PathBuf;

/// Run a release
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Path to the pull request event payload
    #[arg(short, long, env = "GITHUB_EVENT_PATH")]
    pub event: PathBuf,

    /// Print commands and the comment instead of executing them
    #[arg(long)]
    pub dry_run: bool,
}

/// Evaluate the gate without running anything
#[derive(Debug, Args, Clone)]
pub struct CheckCommand {
    /// Path to the pull request event payload
    #[arg(short, long, env = "GITHUB_EVENT_PATH")]
    pub event: PathBuf,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Validate the release configuration
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
