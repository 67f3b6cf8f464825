use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use extract::StartupInfo;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Where results go after an interrupted run.
pub const PARTIAL_RESULTS_FILE: &str = "partial_results.json";

pub fn timestamped_filename(now: DateTime<Local>) -> String {
    format!("startup_results_{}.json", now.format("%Y%m%d_%H%M%S"))
}

/// `"Scale AI"` -> `scale_ai_info.json`
pub fn single_result_filename(startup_name: &str) -> String {
    format!("{}_info.json", startup_name.trim().replace(' ', "_").to_lowercase())
}

/// Overwrite `path` with the full result set as pretty JSON. The data goes to
/// a sibling temp file first so a crash mid-write never truncates the last
/// good checkpoint.
pub async fn write_results(path: &Path, results: &[StartupInfo]) -> Result<()> {
    write_json(path, &results).await
}

pub async fn write_single(path: &Path, info: &StartupInfo) -> Result<()> {
    write_json(path, info).await
}

async fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize results")?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, json)
        .await
        .with_context(|| format!("Failed to write file: {:?}", temp_path))?;
    if let Err(e) = fs::rename(&temp_path, path).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(e).with_context(|| format!("Failed to move {:?} into place", temp_path));
    }

    Ok(())
}

pub async fn read_results(path: &Path) -> Result<Vec<StartupInfo>> {
    let json = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read results file: {:?}", path))?;

    serde_json::from_str(&json).with_context(|| format!("Failed to parse results file: {:?}", path))
}

/// Save a final result set. Returns the path written, or `None` when there
/// was nothing to save. Without an explicit path a timestamped name is used.
pub async fn save_results(results: &[StartupInfo], path: Option<&Path>) -> Result<Option<PathBuf>> {
    if results.is_empty() {
        return Ok(None);
    }

    let path = match path {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(timestamped_filename(Local::now())),
    };

    write_results(&path, results).await?;
    Ok(Some(path))
}
