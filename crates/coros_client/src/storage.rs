//! Writing downloaded exports to disk.

use crate::{CorosError, DownloadedFile};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// What to do when the destination file already exists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OverwritePolicy {
    #[default]
    Fail,
    Overwrite,
}

/// Write `file` into `dir` under its suggested name, creating `dir` if needed.
pub async fn write_file(
    file: &DownloadedFile,
    dir: &Path,
    policy: OverwritePolicy,
) -> Result<PathBuf, CorosError> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(&file.file_name);

    let mut options = tokio::fs::OpenOptions::new();
    options.write(true);
    match policy {
        OverwritePolicy::Fail => options.create_new(true),
        OverwritePolicy::Overwrite => options.create(true).truncate(true),
    };
    let mut out = options.open(&path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::AlreadyExists {
            std::io::Error::new(
                e.kind(),
                format!("{} already exists (use --overwrite to replace it)", path.display()),
            )
        } else {
            e
        }
    })?;
    out.write_all(&file.bytes).await?;
    out.sync_all().await?;

    tracing::debug!(path = %path.display(), bytes = file.bytes.len(), "file written");
    Ok(path)
}
