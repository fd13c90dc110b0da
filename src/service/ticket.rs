use std::future::Future;

use tokio::task::JoinHandle;
use tracing::error;

use crate::store::{StoreError, StoreResult};

/// Completion signal for a write that is already running.
///
/// Dropping the ticket does not cancel the write. Failures are always logged, so
/// callers that ignore the ticket still leave a trace.
#[must_use = "drop the ticket explicitly to fire and forget"]
pub struct WriteTicket<T> {
    handle: JoinHandle<StoreResult<T>>,
}

impl<T: Send + 'static> WriteTicket<T> {
    pub(crate) fn spawn<F>(operation: &'static str, key: String, write: F) -> Self
    where
        F: Future<Output = StoreResult<T>> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let result = write.await;
            if let Err(e) = &result {
                error!(error = %e, operation, key = %key, "Store write failed");
            }
            result
        });
        Self { handle }
    }

    /// Waits for the store to acknowledge the write.
    pub async fn wait(self) -> StoreResult<T> {
        self.handle
            .await
            .map_err(|e| StoreError::Interrupted(e.to_string()))?
    }

    pub fn is_done(&self) -> bool {
        self.handle.is_finished()
    }
}
