use crate::error::Result;
use crate::result::{CrawlResult, CrawlStats};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Cooperative cancellation flag, polled by the crawler before each dequeue.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A crawl running on its own tokio task.
pub struct CrawlHandle {
    pub(crate) cancel: CancelToken,
    pub(crate) progress: watch::Receiver<CrawlStats>,
    pub(crate) task: JoinHandle<CrawlResult>,
}

impl CrawlHandle {
    /// Stops the crawl before its next fetch; the partial graph is still returned.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Receiver updated with a snapshot on every dequeue and once at the end.
    pub fn progress(&self) -> watch::Receiver<CrawlStats> {
        self.progress.clone()
    }

    pub fn latest_stats(&self) -> CrawlStats {
        self.progress.borrow().clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub async fn result(self) -> Result<CrawlResult> {
        Ok(self.task.await?)
    }
}
