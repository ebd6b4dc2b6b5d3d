//! AI hints. Fetched off the UI thread, bounded by a timeout, cancellable.
//!
//! The guess engine never waits on any of this: the UI charges the life up
//! front, spawns a [`HintTask`], and polls it between frames.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tokio::task::JoinHandle;

use crate::puzzle::Puzzle;

pub const CANNED_HINT: &str =
    "Think about how you are updating the map values: are you incrementing or overwriting?";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HintError {
    #[error("hint service unavailable: {0}")]
    Unavailable(String),
    #[error("hint service returned an empty hint")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HintResult {
    Ok(String),
    TimedOut,
    Failed(String),
}

#[async_trait]
pub trait HintProvider: Send + Sync {
    async fn fetch_hint(&self, buggy_code: &str, explanation: &str) -> Result<String, HintError>;
}

/// The coaching prompt a model-backed provider sends.
pub fn build_prompt(buggy_code: &str, explanation: &str) -> String {
    format!(
        "You are a programming coach for a game called Bugdle.\n\
         The bug is: {}\n\
         The code is: {}\n\
         Provide a short, one-sentence hint that doesn't give away the answer \
         but points them in the right direction.",
        explanation, buggy_code
    )
}

/// Stand-in for a real model: waits a moment, then answers with a fixed hint.
#[derive(Debug, Clone)]
pub struct CannedHintProvider {
    delay: Duration,
}

impl CannedHintProvider {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for CannedHintProvider {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

#[async_trait]
impl HintProvider for CannedHintProvider {
    async fn fetch_hint(&self, buggy_code: &str, explanation: &str) -> Result<String, HintError> {
        log::debug!("prompt:\n{}", build_prompt(buggy_code, explanation));
        tokio::time::sleep(self.delay).await;
        Ok(CANNED_HINT.to_string())
    }
}

/// Serves hints generated ahead of time and stored with the puzzles, keyed by
/// buggy code. Anything else goes to `fallback`.
pub struct PrecomputedHintProvider {
    hints: HashMap<String, String>,
    fallback: Arc<dyn HintProvider>,
}

impl PrecomputedHintProvider {
    pub fn from_puzzles(puzzles: &[Puzzle], fallback: Arc<dyn HintProvider>) -> Self {
        let hints = puzzles
            .iter()
            .filter_map(|p| {
                p.ai_hint
                    .as_ref()
                    .filter(|hint| !hint.trim().is_empty())
                    .map(|hint| (p.code(), hint.clone()))
            })
            .collect();
        Self { hints, fallback }
    }

    pub fn len(&self) -> usize {
        self.hints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hints.is_empty()
    }
}

#[async_trait]
impl HintProvider for PrecomputedHintProvider {
    async fn fetch_hint(&self, buggy_code: &str, explanation: &str) -> Result<String, HintError> {
        match self.hints.get(buggy_code) {
            Some(hint) => Ok(hint.clone()),
            None => self.fallback.fetch_hint(buggy_code, explanation).await,
        }
    }
}

pub async fn fetch_with_timeout(
    provider: &dyn HintProvider,
    buggy_code: &str,
    explanation: &str,
    timeout: Duration,
) -> HintResult {
    match tokio::time::timeout(timeout, provider.fetch_hint(buggy_code, explanation)).await {
        Ok(Ok(hint)) if hint.trim().is_empty() => HintResult::Failed(HintError::Empty.to_string()),
        Ok(Ok(hint)) => HintResult::Ok(hint.trim().to_string()),
        Ok(Err(e)) => {
            log::warn!("hint fetch failed: {}", e);
            HintResult::Failed(e.to_string())
        }
        Err(_) => {
            log::warn!("hint fetch timed out after {:?}", timeout);
            HintResult::TimedOut
        }
    }
}

/// An in-flight hint request. Dropping it cancels the fetch.
pub struct HintTask {
    handle: JoinHandle<()>,
    receiver: oneshot::Receiver<HintResult>,
}

impl HintTask {
    pub fn spawn(
        runtime: &Handle,
        provider: Arc<dyn HintProvider>,
        buggy_code: String,
        explanation: String,
        timeout: Duration,
    ) -> Self {
        let (sender, receiver) = oneshot::channel();
        let handle = runtime.spawn(async move {
            let result =
                fetch_with_timeout(provider.as_ref(), &buggy_code, &explanation, timeout).await;
            // Nobody is listening if the task was cancelled
            let _ = sender.send(result);
        });
        HintTask { handle, receiver }
    }

    /// Non-blocking. `None` while the fetch is still running.
    pub fn try_take(&mut self) -> Option<HintResult> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(HintResult::Failed(
                "hint task stopped without an answer".to_string(),
            )),
        }
    }

    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for HintTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct Failing;

    #[async_trait]
    impl HintProvider for Failing {
        async fn fetch_hint(&self, _: &str, _: &str) -> Result<String, HintError> {
            Err(HintError::Unavailable("offline".to_string()))
        }
    }

    struct Fixed(&'static str);

    #[async_trait]
    impl HintProvider for Fixed {
        async fn fetch_hint(&self, _: &str, _: &str) -> Result<String, HintError> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn prompt_carries_code_and_explanation() {
        let prompt = build_prompt("mp[x] = 1;", "overwrites the count");
        assert!(prompt.contains("The bug is: overwrites the count"));
        assert!(prompt.contains("The code is: mp[x] = 1;"));
    }

    #[tokio::test]
    async fn canned_provider_returns_fixed_hint() {
        let provider = CannedHintProvider::new(Duration::from_millis(5));
        let result =
            fetch_with_timeout(&provider, "code", "bug", Duration::from_secs(5)).await;
        assert_eq!(result, HintResult::Ok(CANNED_HINT.to_string()));
    }

    #[tokio::test]
    async fn slow_provider_times_out() {
        let provider = CannedHintProvider::new(Duration::from_secs(5));
        let result =
            fetch_with_timeout(&provider, "code", "bug", Duration::from_millis(20)).await;
        assert_eq!(result, HintResult::TimedOut);
    }

    #[tokio::test]
    async fn provider_errors_become_failed() {
        let result = fetch_with_timeout(&Failing, "code", "bug", Duration::from_secs(1)).await;
        assert_eq!(
            result,
            HintResult::Failed("hint service unavailable: offline".to_string())
        );
    }

    #[tokio::test]
    async fn blank_hint_is_a_failure() {
        let result = fetch_with_timeout(&Fixed("  "), "code", "bug", Duration::from_secs(1)).await;
        assert!(matches!(result, HintResult::Failed(_)));
    }

    #[tokio::test]
    async fn precomputed_hints_take_priority() {
        let mut with_hint = Puzzle::new("a", "x = 1\ny = 2", 0, "bug").unwrap();
        with_hint.ai_hint = Some("look at x".to_string());
        let without_hint = Puzzle::new("b", "z = 3", 0, "bug").unwrap();

        let provider = PrecomputedHintProvider::from_puzzles(
            &[with_hint, without_hint],
            Arc::new(Fixed("fallback")),
        );
        assert_eq!(provider.len(), 1);

        assert_eq!(
            provider.fetch_hint("x = 1\ny = 2", "bug").await,
            Ok("look at x".to_string())
        );
        assert_eq!(
            provider.fetch_hint("z = 3", "bug").await,
            Ok("fallback".to_string())
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn task_delivers_result_without_blocking() {
        let mut task = HintTask::spawn(
            &Handle::current(),
            Arc::new(CannedHintProvider::new(Duration::from_millis(20))),
            "code".to_string(),
            "bug".to_string(),
            Duration::from_secs(5),
        );
        assert_eq!(task.try_take(), None);

        let mut result = None;
        for _ in 0..100 {
            tokio::time::sleep(Duration::from_millis(10)).await;
            result = task.try_take();
            if result.is_some() {
                break;
            }
        }
        assert_eq!(result, Some(HintResult::Ok(CANNED_HINT.to_string())));
    }

    struct Flagging {
        finished: Arc<AtomicBool>,
    }

    #[async_trait]
    impl HintProvider for Flagging {
        async fn fetch_hint(&self, _: &str, _: &str) -> Result<String, HintError> {
            tokio::time::sleep(Duration::from_millis(50)).await;
            self.finished.store(true, Ordering::SeqCst);
            Ok("too late".to_string())
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn cancelled_task_never_finishes() {
        let finished = Arc::new(AtomicBool::new(false));
        let task = HintTask::spawn(
            &Handle::current(),
            Arc::new(Flagging {
                finished: finished.clone(),
            }),
            "code".to_string(),
            "bug".to_string(),
            Duration::from_secs(10),
        );
        task.cancel();

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!finished.load(Ordering::SeqCst));
    }
}
