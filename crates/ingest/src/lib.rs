pub mod reader;

pub use reader::FileReader;

use std::path::Path;
use tracing::{info, warn};

/// Default location of the startup list when none is given.
pub const DEFAULT_LIST_FILE: &str = "list.txt";

/// Load startup names, treating a missing or unreadable file as an empty list.
pub async fn load_startup_list(path: &Path) -> Vec<String> {
    match FileReader::read_names(path).await {
        Ok(names) => {
            info!(path = %path.display(), count = names.len(), "Loaded startup list");
            names
        }
        Err(e) => {
            warn!(path = %path.display(), error = %format!("{e:#}"), "Could not read startup list");
            Vec::new()
        }
    }
}
