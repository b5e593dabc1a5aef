use clap::Parser;
use crate::enums::commands::Commands;

#[derive(Parser)]
#[clap(name = "repo-organizer")]
#[clap(about = "AI-assisted triage of your GitHub repositories", long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[clap(short, long, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Commands,
}
