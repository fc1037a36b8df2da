//! Terminal frontend for `coros_client`: argument parsing, table rendering,
//! activity selection, and writing exports to disk.

pub mod cli;
pub mod commands;
pub mod display;
pub mod logging;

use anyhow::Result;
use cli::{Cli, Command};
use commands::{ActivityPicker, DownloadOptions, IdPicker, PromptPicker};
use coros_client::config::Config;
use coros_client::http_client::ReqwestCorosClient;

/// Apply command-line overrides on top of the environment configuration.
/// An explicit `--region` also wins over `COROS_BASE_URL`.
pub fn resolve_config(cli: &Cli, mut config: Config) -> Config {
    if let Some(region) = cli.region {
        if let Some(base_url) = config.base_url_override.take() {
            tracing::warn!(%base_url, %region, "--region given; ignoring COROS_BASE_URL");
        }
        config.region = region;
    }
    config
}

pub async fn run(cli: Cli, config: Config) -> Result<()> {
    let config = resolve_config(&cli, config);
    tracing::debug!(region = %config.region, base_url = config.base_url(), "configured");
    let client = ReqwestCorosClient::from_config(&config)?;
    let credentials = config.credentials();
    let mut stdout = std::io::stdout();

    match cli.command {
        Command::List { limit } => {
            let limit = limit.unwrap_or(config.default_limit);
            commands::list(&client, &credentials, limit, &mut stdout).await?;
        }
        Command::Download {
            format,
            limit,
            output,
            ids,
            overwrite,
        } => {
            let options = DownloadOptions {
                format,
                limit: limit.unwrap_or(config.default_limit),
                output,
                overwrite,
            };
            let mut picker: Box<dyn ActivityPicker> = if ids.is_empty() {
                Box::new(PromptPicker)
            } else {
                Box::new(IdPicker(ids))
            };
            commands::download(&client, &credentials, &options, picker.as_mut(), &mut stdout)
                .await?;
        }
    }
    Ok(())
}
