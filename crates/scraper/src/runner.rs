use extract::{StartupInfo, StartupSearcher};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::checkpoint;

/// Progress notifications emitted while a batch runs.
#[derive(Debug)]
pub enum BatchEvent<'a> {
    Started { total: usize },
    Processing { index: usize, total: usize, startup_name: &'a str },
    Finished { index: usize, total: usize, info: &'a StartupInfo },
    Waiting { delay: Duration },
}

type Observer = Box<dyn Fn(BatchEvent<'_>) + Send + Sync>;

/// Results of a run. After an interruption `results` holds every startup
/// that finished before the stop.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    pub results: Vec<StartupInfo>,
    pub interrupted: bool,
}

impl BatchOutcome {
    fn empty() -> Self {
        Self {
            results: Vec::new(),
            interrupted: false,
        }
    }
}

/// Queries startups one at a time with a fixed pause between requests.
pub struct BatchRunner {
    searcher: StartupSearcher,
    delay: Duration,
    observer: Option<Observer>,
}

impl BatchRunner {
    pub fn new(searcher: StartupSearcher, delay: Duration) -> Self {
        Self {
            searcher,
            delay,
            observer: None,
        }
    }

    pub fn with_observer<F>(mut self, observer: F) -> Self
    where
        F: Fn(BatchEvent<'_>) + Send + Sync + 'static,
    {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    fn emit(&self, event: BatchEvent<'_>) {
        if let Some(observer) = &self.observer {
            observer(event);
        }
    }

    /// Run every name through the searcher in order.
    ///
    /// One result is produced per attempted name. When `checkpoint_path` is
    /// set the file is rewritten with all results so far after each startup.
    /// Cancellation is honoured between startups and while waiting; a query
    /// already in flight is allowed to finish.
    pub async fn run(
        &self,
        names: &[String],
        checkpoint_path: Option<&Path>,
        cancel: &CancellationToken,
    ) -> BatchOutcome {
        if names.is_empty() {
            return BatchOutcome::empty();
        }

        let total = names.len();
        let mut results = Vec::with_capacity(total);
        self.emit(BatchEvent::Started { total });
        info!(total, delay_ms = self.delay.as_millis() as u64, "Starting batch");

        for (index, startup_name) in names.iter().enumerate() {
            if cancel.is_cancelled() {
                return self.interrupted(results, total);
            }

            self.emit(BatchEvent::Processing { index, total, startup_name });
            let started = Instant::now();

            let info = self.search_guarded(startup_name).await;
            debug!(
                startup = %startup_name,
                elapsed_ms = started.elapsed().as_millis() as u64,
                failed = info.is_error(),
                "Startup processed"
            );

            self.emit(BatchEvent::Finished { index, total, info: &info });
            results.push(info);

            if let Some(path) = checkpoint_path {
                if let Err(e) = checkpoint::write_results(path, &results).await {
                    warn!(
                        path = %path.display(),
                        error = %format!("{e:#}"),
                        "Could not save progress"
                    );
                }
            }

            let is_last = index + 1 == total;
            if !is_last && !self.delay.is_zero() {
                self.emit(BatchEvent::Waiting { delay: self.delay });
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return self.interrupted(results, total),
                    _ = sleep(self.delay) => {}
                }
            }
        }

        // A stop requested during the final query still counts as an interruption.
        if cancel.is_cancelled() {
            return self.interrupted(results, total);
        }

        info!(processed = results.len(), "Batch completed");
        BatchOutcome {
            results,
            interrupted: false,
        }
    }

    fn interrupted(&self, results: Vec<StartupInfo>, total: usize) -> BatchOutcome {
        warn!(processed = results.len(), total, "Batch interrupted");
        BatchOutcome {
            results,
            interrupted: true,
        }
    }

    /// The searcher already turns query faults into error records; this
    /// catches anything that still escapes, such as a panic in the client.
    async fn search_guarded(&self, startup_name: &str) -> StartupInfo {
        match AssertUnwindSafe(self.searcher.search(startup_name))
            .catch_unwind()
            .await
        {
            Ok(info) => info,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(startup = %startup_name, error = %message, "Unexpected error during search");
                StartupInfo::failed(startup_name, format!("Unexpected error: {message}"))
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use extract::testing::{Reply, ScriptedClient};
    use extract::{ContactInfo, HiringStatus};
    use std::sync::{Arc, Mutex};

    const ACME: &str = r#"{"startup_name":"Acme","hiring_status":"YES","contact_info":{"website":"https://acme.io","email":"Not found","linkedin":"Not found","twitter":"Not found","other":"Not found"},"description":"d","keywords":[]}"#;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn runner(client: Arc<ScriptedClient>, delay: Duration) -> BatchRunner {
        BatchRunner::new(StartupSearcher::new(client), delay)
    }

    #[tokio::test]
    async fn test_empty_input_has_no_side_effects() {
        let client = Arc::new(ScriptedClient::new(vec![]));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checkpoint.json");

        let outcome = runner(client.clone(), Duration::from_secs(2))
            .run(&[], Some(&path), &CancellationToken::new())
            .await;

        assert!(outcome.results.is_empty());
        assert!(!outcome.interrupted);
        assert_eq!(client.calls(), 0);
        assert!(!path.exists());
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_result_per_name_despite_faults() {
        let client = Arc::new(ScriptedClient::new(vec![
            Reply::text(ACME),
            Reply::fail("simulated network timeout"),
            Reply::panic("client bug"),
            Reply::text("Sorry, I found nothing about Zyx123."),
        ]));
        let input = names(&["Acme", "Widgetco", "Buggy", "Zyx123"]);

        let outcome = runner(client.clone(), Duration::from_secs(2))
            .run(&input, None, &CancellationToken::new())
            .await;

        assert!(!outcome.interrupted);
        assert_eq!(outcome.results.len(), input.len());
        assert_eq!(client.calls(), 4);

        let acme = &outcome.results[0];
        assert_eq!(acme.hiring(), HiringStatus::Yes);
        assert_eq!(acme.contact_info.website, "https://acme.io");

        let widgetco = &outcome.results[1];
        assert_eq!(widgetco.startup_name, "Widgetco");
        assert!(widgetco.error.as_deref().unwrap().contains("simulated network timeout"));
        assert_eq!(widgetco.hiring_status, "unknown");

        let buggy = &outcome.results[2];
        assert_eq!(buggy.error.as_deref(), Some("Unexpected error: client bug"));
        assert_eq!(buggy.contact_info, ContactInfo::default());

        assert_eq!(outcome.results[3].description, "Sorry, I found nothing about Zyx123.");
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_between_requests_but_not_after_last() {
        let client = Arc::new(ScriptedClient::new(vec![
            Reply::text(ACME),
            Reply::fail("timeout"),
            Reply::text(ACME),
        ]));
        let waits = Arc::new(Mutex::new(Vec::new()));
        let recorded = waits.clone();
        let runner = runner(client, Duration::from_secs(2)).with_observer(move |event| {
            if let BatchEvent::Waiting { delay } = event {
                recorded.lock().unwrap().push(delay);
            }
        });

        let start = tokio::time::Instant::now();
        let outcome = runner
            .run(&names(&["A", "Widgetco", "C"]), None, &CancellationToken::new())
            .await;

        assert_eq!(outcome.results.len(), 3);
        // A failed startup still gets the pause before the next one.
        assert_eq!(*waits.lock().unwrap(), vec![Duration::from_secs(2); 2]);
        assert!(start.elapsed() >= Duration::from_secs(4));
        assert!(start.elapsed() < Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn test_checkpoint_written_after_each_startup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        let client = Arc::new(ScriptedClient::new(vec![Reply::text(ACME), Reply::fail("quota")]));

        let checkpoint_path = path.clone();
        let sizes = Arc::new(Mutex::new(Vec::new()));
        let seen = sizes.clone();
        let runner = runner(client, Duration::from_secs(1)).with_observer(move |event| {
            // Waiting is emitted after the checkpoint for the finished startup.
            if let BatchEvent::Waiting { .. } = event {
                let raw = std::fs::read_to_string(&checkpoint_path).unwrap();
                let saved: Vec<StartupInfo> = serde_json::from_str(&raw).unwrap();
                seen.lock().unwrap().push(saved.len());
            }
        });

        let outcome = runner
            .run(&names(&["Acme", "Widgetco"]), Some(&path), &CancellationToken::new())
            .await;

        assert_eq!(*sizes.lock().unwrap(), vec![1]);
        let saved = checkpoint::read_results(&path).await.unwrap();
        assert_eq!(saved, outcome.results);
    }

    #[tokio::test(start_paused = true)]
    async fn test_checkpoint_failure_does_not_abort() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be replaced by the checkpoint file.
        let path = dir.path().join("occupied");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), "x").unwrap();
        let client = Arc::new(ScriptedClient::new(vec![Reply::text(ACME), Reply::text(ACME)]));

        let outcome = runner(client, Duration::from_secs(1))
            .run(&names(&["A", "B"]), Some(&path), &CancellationToken::new())
            .await;

        assert_eq!(outcome.results.len(), 2);
        assert!(!outcome.interrupted);
        assert!(!dir.path().join("occupied.json.tmp").exists());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_keeps_partial_results() {
        let client = Arc::new(ScriptedClient::new(vec![
            Reply::text(ACME),
            Reply::text(ACME),
            Reply::text(ACME),
        ]));
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        let runner = runner(client.clone(), Duration::from_secs(2)).with_observer(move |event| {
            if let BatchEvent::Finished { index: 1, .. } = event {
                trigger.cancel();
            }
        });

        let outcome = runner.run(&names(&["A", "B", "C"]), None, &cancel).await;

        assert!(outcome.interrupted);
        assert_eq!(outcome.results.len(), 2);
        assert_eq!(client.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_last_startup_marks_interrupted() {
        let client = Arc::new(ScriptedClient::new(vec![Reply::text(ACME), Reply::text(ACME)]));
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        let runner = runner(client, Duration::from_secs(2)).with_observer(move |event| {
            if let BatchEvent::Processing { index: 1, .. } = event {
                trigger.cancel();
            }
        });

        let outcome = runner.run(&names(&["A", "B"]), None, &cancel).await;

        assert!(outcome.interrupted);
        assert_eq!(outcome.results.len(), 2);
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let client = Arc::new(ScriptedClient::new(vec![Reply::text(ACME)]));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let outcome = runner(client.clone(), Duration::ZERO)
            .run(&names(&["A"]), None, &cancel)
            .await;

        assert!(outcome.interrupted);
        assert!(outcome.results.is_empty());
        assert_eq!(client.calls(), 0);
    }

    #[test]
    fn test_panic_message() {
        let boxed: Box<dyn Any + Send> = Box::new("static str");
        assert_eq!(panic_message(boxed.as_ref()), "static str");
        let boxed: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(boxed.as_ref()), "owned");
        let boxed: Box<dyn Any + Send> = Box::new(42);
        assert_eq!(panic_message(boxed.as_ref()), "unknown panic");
    }
}
