use clap::Parser;
use colored::Colorize;
use coros_cli::cli::Cli;
use coros_client::config::Config;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    coros_cli::logging::init(cli.verbose);

    let result = match Config::from_env() {
        Ok(config) => coros_cli::run(cli, config).await,
        Err(e) => Err(e.into()),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", "Error:".red());
            ExitCode::FAILURE
        }
    }
}
