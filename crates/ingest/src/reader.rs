use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

pub struct FileReader;

impl FileReader {
    /// Read a newline-delimited list of names. Lines are trimmed and blank
    /// lines dropped; order is preserved and duplicates are kept.
    pub async fn read_names(path: &Path) -> Result<Vec<String>> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read file: {:?}", path))?;

        Ok(Self::parse_names(&content))
    }

    pub fn parse_names(content: &str) -> Vec<String> {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }
}
