use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::{PodcastError, Result};

pub(super) fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir()?.join(path))
}

/// Write `bytes` to a hidden sibling file, then rename it over `path`.
///
/// On any failure the temporary file is removed and `path` is untouched.
pub(super) async fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| PodcastError::Export(format!("{} is not a file path", path.display())))?
        .to_string_lossy()
        .into_owned();
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|e| PodcastError::Export(format!("cannot create {}: {e}", parent.display())))?;

    let temp = parent.join(format!(".{file_name}.{}.partial", Uuid::new_v4().simple()));
    if let Err(err) = tokio::fs::write(&temp, bytes).await {
        discard(&temp).await;
        return Err(PodcastError::Export(format!(
            "cannot write {}: {err}",
            temp.display()
        )));
    }
    if let Err(err) = tokio::fs::rename(&temp, path).await {
        discard(&temp).await;
        return Err(PodcastError::Export(format!(
            "cannot move output into {}: {err}",
            path.display()
        )));
    }
    Ok(())
}

async fn discard(temp: &Path) {
    if let Err(err) = tokio::fs::remove_file(temp).await {
        if err.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %temp.display(), error = %err, "failed to remove partial output");
        }
    }
}
