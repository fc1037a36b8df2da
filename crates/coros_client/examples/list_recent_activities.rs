use coros_client::{CorosClient, config::Config, http_client::ReqwestCorosClient};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Example: expects COROS_EMAIL and COROS_PASSWORD in env
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("config error: {}", e);
            return Ok(());
        }
    };
    let client = ReqwestCorosClient::from_config(&cfg)?;
    let session = client.authenticate(&cfg.credentials()).await?;

    let activities = client
        .list_activities(&session, cfg.default_limit)
        .await
        .map_err(|e| format!("failed to fetch activities: {}", e))?;

    if activities.is_empty() {
        println!("No activities recorded yet");
        return Ok(());
    }

    println!("Recent activities (limit {}):", cfg.default_limit);
    for a in activities {
        println!("- {} [{}] {}", a.id, a.sport_type, a.name);
    }

    Ok(())
}
