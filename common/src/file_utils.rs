use anyhow::{Context, Result};
use slide_layout_protocol::Notebook;
use std::io::Write;
use std::path::Path;

/// Read and parse a notebook, rejecting anything but nbformat 4.
pub async fn load_notebook<P: AsRef<Path>>(path: P) -> Result<Notebook> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let notebook = Notebook::from_json(&content)
        .with_context(|| format!("{} is not a valid notebook", path.display()))?;
    notebook
        .check_format()
        .with_context(|| format!("cannot edit {}", path.display()))?;
    Ok(notebook)
}

/// Stage `content` in a uniquely named file next to `path`, carry over the
/// existing file's permissions, then rename it into place.
fn replace_file(path: &Path, content: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = tempfile::Builder::new()
        .prefix(".slide-layout-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .with_context(|| format!("failed to create staging file in {}", dir.display()))?;
    let staged_path = staged.path().to_path_buf();
    staged
        .write_all(content)
        .and_then(|()| staged.flush())
        .with_context(|| format!("failed to write {}", staged_path.display()))?;

    if let Ok(existing) = std::fs::metadata(path) {
        staged
            .as_file()
            .set_permissions(existing.permissions())
            .with_context(|| format!("failed to copy permissions of {}", path.display()))?;
    }

    // On failure the staged file is removed when the error drops it.
    staged
        .persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}

/// Write the notebook through a staging file and rename it into place, so
/// readers never see a partial document.
pub async fn save_notebook<P: AsRef<Path>>(
    path: P,
    notebook: &Notebook,
    indent: usize,
) -> Result<()> {
    let path = path.as_ref().to_path_buf();
    let content = notebook
        .to_json_string(indent)
        .context("failed to serialize notebook")?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create dir: {}", parent.display()))?;
    }

    let target = path.clone();
    tokio::task::spawn_blocking(move || replace_file(&target, content.as_bytes()))
        .await
        .context("notebook writer task failed")??;

    tracing::debug!("Saved notebook to {}", path.display());
    Ok(())
}

/// Write a fresh, empty nbformat 4.5 notebook. Fails if `path` exists.
pub async fn create_notebook<P: AsRef<Path>>(path: P, indent: usize) -> Result<Notebook> {
    let path = path.as_ref();
    if tokio::fs::try_exists(path).await.unwrap_or(false) {
        anyhow::bail!("file already exists: {}", path.display());
    }
    let notebook = Notebook::default();
    save_notebook(path, &notebook, indent).await?;
    Ok(notebook)
}
