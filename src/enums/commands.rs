use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Write a sample configuration file
    Init,
    /// Analyze the owner's repositories and write reports
    Analyze {
        /// GitHub user or organization (defaults to the configured owner)
        #[clap(short, long)]
        owner: Option<String>,
        /// Maximum number of repositories to fetch
        #[clap(short, long)]
        limit: Option<usize>,
        /// Re-analyze even when a cached report is up to date
        #[clap(short, long)]
        force: bool,
        /// Number of concurrent analysis workers
        #[clap(short, long)]
        workers: Option<usize>,
        /// Analyze only the repository with this name
        #[clap(short, long)]
        single_repo: Option<String>,
    },
    /// Check the configuration for problems
    Validate,
}
