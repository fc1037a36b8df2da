use coros_client::storage::{OverwritePolicy, write_file};
use coros_client::{
    CorosClient, DownloadRequest, ExportFormat, config::Config, http_client::ReqwestCorosClient,
};
use std::path::PathBuf;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::from_env()?;

    let format: ExportFormat = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "gpx".to_string())
        .parse()?;

    let output_dir = std::env::var("COROS_OUTPUT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."));

    let client = ReqwestCorosClient::from_config(&cfg)?;
    let session = client.authenticate(&cfg.credentials()).await?;

    // The export endpoint needs the sport type, so pick the activity from the list
    let Some(latest) = client.list_activities(&session, 1).await?.into_iter().next() else {
        println!("No activities recorded yet");
        return Ok(());
    };

    let file = client
        .download_activity(&session, &DownloadRequest::for_activity(&latest, format))
        .await
        .map_err(|e| format!("download failed: {}", e))?;
    let path = write_file(&file, &output_dir, OverwritePolicy::Fail).await?;

    println!("Saved {} to {}", latest.name, path.display());
    Ok(())
}
