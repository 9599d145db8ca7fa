pub mod init;
pub mod pr;
pub mod report;
pub mod schema;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "revq")]
#[command(
    author,
    version,
    about = "Pull request review status reporter for GitHub repositories"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Enrich open pull requests and produce reports
    Report(ReportArgs),

    /// Print one pull request's review status
    Pr(PrArgs),

    /// Write a starter config file
    Init(InitArgs),

    /// Print JSON Schema for config validation
    Schema,
}

#[derive(Parser, Clone)]
pub struct ReportArgs {
    /// Path to config file
    #[arg(short, long, default_value = "revq.yaml")]
    pub config: PathBuf,

    /// Override repository (owner/repo)
    #[arg(long)]
    pub repo: Option<String>,

    /// Override max parallel enrichments
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Override output directory
    #[arg(long)]
    pub report_dir: Option<PathBuf>,

    /// Override max open pull requests fetched
    #[arg(long)]
    pub max_prs: Option<usize>,

    /// Restrict to specific PR numbers (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub prs: Option<Vec<u64>>,

    /// Show plan without enriching
    #[arg(long)]
    pub dry_run: bool,

    /// Exit 1 if any reviewer requested changes (CI mode)
    #[arg(long)]
    pub fail_on_changes_requested: bool,
}

#[derive(Parser, Clone)]
pub struct PrArgs {
    /// Pull request number
    pub number: u64,

    /// Path to config file
    #[arg(short, long, default_value = "revq.yaml")]
    pub config: PathBuf,

    /// Override repository (owner/repo)
    #[arg(long)]
    pub repo: Option<String>,
}

#[derive(Parser, Clone)]
pub struct InitArgs {
    /// Where to write the config
    #[arg(long, default_value = "revq.yaml")]
    pub path: PathBuf,

    /// Repository to pre-fill (owner/repo)
    #[arg(long)]
    pub repo: Option<String>,

    /// Overwrite an existing config
    #[arg(long)]
    pub force: bool,
}
