use std::process::ExitCode;
use clap::Parser;
use repo_organizer::errors::ErrorHandler;
use repo_organizer::structs::cli::Cli;
use repo_organizer::workers::command_runner::CommandRunner;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    match CommandRunner::new().run_command(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ErrorHandler::handle_error(&e);
            ExitCode::FAILURE
        }
    }
}
