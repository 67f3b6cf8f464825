pub mod schema;
pub mod normalizer;
pub mod llm;
pub mod prompt;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use schema::{ContactField, ContactInfo, HiringStatus, StartupInfo, NOT_FOUND};
pub use normalizer::{normalize_response, ParseOutcome};
pub use llm::{AnthropicClient, CompletionClient};

use std::sync::Arc;
use tracing::{debug, warn};

/// Looks up one startup per call. Faults from the completion client are
/// folded into an error record; `search` never fails.
#[derive(Clone)]
pub struct StartupSearcher {
    llm_client: Arc<dyn CompletionClient>,
}

impl StartupSearcher {
    pub fn new(llm_client: Arc<dyn CompletionClient>) -> Self {
        Self { llm_client }
    }

    pub async fn search(&self, startup_name: &str) -> StartupInfo {
        let prompt = prompt::build_search_prompt(startup_name);

        let response_text = match self.llm_client.complete(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!(startup = %startup_name, error = %format!("{e:#}"), "Search request failed");
                return StartupInfo::failed(
                    startup_name,
                    format!("Failed to search for startup: {e:#}"),
                );
            }
        };

        let outcome = ParseOutcome::classify(&response_text);
        debug!(startup = %startup_name, outcome = outcome.kind(), "Normalized response");
        outcome.into_info(startup_name, &response_text)
    }
}
