//! `list` and `download` command implementations.

use anyhow::{Context, Result, bail};
use coros_client::storage::{OverwritePolicy, write_file};
use coros_client::{
    ActivitySummary, CorosClient, Credentials, DownloadRequest, ExportFormat, Session,
};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::display;

/// Chooses which listed activities to download.
pub trait ActivityPicker {
    /// Indices into `activities`, in download order.
    fn pick(&mut self, activities: &[ActivitySummary]) -> Result<Vec<usize>>;
}

/// Interactive multi-select prompt on the terminal.
pub struct PromptPicker;

impl ActivityPicker for PromptPicker {
    fn pick(&mut self, activities: &[ActivitySummary]) -> Result<Vec<usize>> {
        let items: Vec<String> = activities.iter().map(display::selection_label).collect();
        let chosen = dialoguer::MultiSelect::new()
            .with_prompt("Select activities to download (space to toggle, enter to confirm)")
            .items(&items)
            .interact()
            .context("reading selection")?;
        Ok(chosen)
    }
}

/// Picks the activities whose ids were given on the command line. A repeated
/// id is picked once, at its first position.
pub struct IdPicker(pub Vec<String>);

impl ActivityPicker for IdPicker {
    fn pick(&mut self, activities: &[ActivitySummary]) -> Result<Vec<usize>> {
        let mut picked = Vec::with_capacity(self.0.len());
        for id in &self.0 {
            let index = activities.iter().position(|a| &a.id == id).with_context(|| {
                format!(
                    "activity {id} is not among the {} most recent activities (raise --limit)",
                    activities.len()
                )
            })?;
            if !picked.contains(&index) {
                picked.push(index);
            }
        }
        Ok(picked)
    }
}

pub struct DownloadOptions {
    pub format: ExportFormat,
    pub limit: u32,
    pub output: PathBuf,
    pub overwrite: bool,
}

async fn login(
    client: &dyn CorosClient,
    credentials: &Credentials,
    out: &mut dyn Write,
) -> Result<Session> {
    writeln!(out, "Logging in...")?;
    let session = client.authenticate(credentials).await?;
    writeln!(out, "{}", display::session_notice())?;
    Ok(session)
}

pub async fn list(
    client: &dyn CorosClient,
    credentials: &Credentials,
    limit: u32,
    out: &mut dyn Write,
) -> Result<Vec<ActivitySummary>> {
    let session = login(client, credentials, out).await?;
    writeln!(out, "Fetching {limit} most recent activities...\n")?;
    let activities = client.list_activities(&session, limit).await?;

    if activities.is_empty() {
        writeln!(out, "No activities found")?;
        return Ok(activities);
    }
    write!(out, "{}", display::activity_table(&activities))?;
    writeln!(out, "\nTotal: {} activities", activities.len())?;
    Ok(activities)
}

pub async fn download(
    client: &dyn CorosClient,
    credentials: &Credentials,
    options: &DownloadOptions,
    picker: &mut dyn ActivityPicker,
    out: &mut dyn Write,
) -> Result<Vec<PathBuf>> {
    let session = login(client, credentials, out).await?;
    writeln!(out, "Fetching {} most recent activities...\n", options.limit)?;
    let activities = client.list_activities(&session, options.limit).await?;
    if activities.is_empty() {
        writeln!(out, "No activities found")?;
        return Ok(Vec::new());
    }

    let selected = picker.pick(&activities)?;
    if selected.is_empty() {
        writeln!(out, "Nothing selected")?;
        return Ok(Vec::new());
    }

    let policy = if options.overwrite {
        OverwritePolicy::Overwrite
    } else {
        OverwritePolicy::Fail
    };
    let mut written = Vec::with_capacity(selected.len());
    for index in selected {
        let Some(activity) = activities.get(index) else {
            bail!("selection {index} is out of range");
        };
        written.push(
            save_one(client, &session, activity, options.format, &options.output, policy, out)
                .await?,
        );
    }
    Ok(written)
}

async fn save_one(
    client: &dyn CorosClient,
    session: &Session,
    activity: &ActivitySummary,
    format: ExportFormat,
    dir: &Path,
    policy: OverwritePolicy,
    out: &mut dyn Write,
) -> Result<PathBuf> {
    writeln!(
        out,
        "Downloading {} as {}...",
        activity.name,
        format.extension().to_uppercase()
    )?;
    let request = DownloadRequest::for_activity(activity, format);
    let file = client.download_activity(session, &request).await?;
    let path = write_file(&file, dir, policy)
        .await
        .with_context(|| format!("saving activity {}", activity.id))?;
    writeln!(out, "Saved to {}", path.display())?;
    Ok(path)
}
