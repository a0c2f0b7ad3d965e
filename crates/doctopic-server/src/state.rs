//! Shared application state.

use std::sync::Arc;
use std::time::Duration;

use doctopic_core::{DocTopicConfig, Error, Result};
use doctopic_infer::TopicClassifier;
use doctopic_store::KeywordStore;

/// Read-only resources built once at startup and shared by all handlers.
pub struct AppState {
    pub config: DocTopicConfig,
    pub keywords: KeywordStore,
    pub classifier: Arc<TopicClassifier>,
}

impl AppState {
    pub fn new(config: DocTopicConfig, keywords: KeywordStore, classifier: TopicClassifier) -> Self {
        Self {
            config,
            keywords,
            classifier: Arc::new(classifier),
        }
    }
}

/// Run CPU-bound or blocking work off the async runtime, bounded by `limit`.
///
/// On timeout the worker thread is left to finish on its own; the caller
/// gets a retryable [`Error::Timeout`].
pub async fn run_blocking<T, F>(limit: Duration, what: &str, f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::time::timeout(limit, tokio::task::spawn_blocking(f)).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => Err(Error::Internal(format!("{} task failed: {}", what, e))),
        Err(_) => Err(Error::Timeout(format!(
            "{} took longer than {}s",
            what,
            limit.as_secs_f32()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_blocking_returns_value() {
        let value = run_blocking(Duration::from_secs(5), "add", || Ok(2 + 2))
            .await
            .unwrap();
        assert_eq!(value, 4);
    }

    #[tokio::test]
    async fn test_run_blocking_times_out() {
        let err = run_blocking(Duration::from_millis(10), "sleep", || {
            std::thread::sleep(Duration::from_millis(200));
            Ok(())
        })
        .await
        .unwrap_err();
        assert!(matches!(err, Error::Timeout(_)));
        assert!(err.is_retryable());
    }
}
