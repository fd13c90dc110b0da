use std::future::Future;

use strum_macros::{AsRefStr, Display};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::debug;

use super::StoreResult;

const FEED_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Collection {
    Employees,
    Attendance,
}

/// Change notifications for a store. Every successful mutation publishes the
/// collection it touched.
#[derive(Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<Collection>,
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeFeed {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(FEED_CAPACITY);
        Self { sender }
    }

    pub fn publish(&self, collection: Collection) {
        // No receivers just means nobody is watching.
        let _ = self.sender.send(collection);
    }

    pub fn watchers(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Registers a live query on `collection`.
    ///
    /// `deliver` receives the current result of `fetch` right away and the full
    /// refreshed result after every change to the collection, until the returned
    /// handle is cancelled or dropped. Registering again restarts delivery.
    pub fn subscribe<T, F, Fut, C>(&self, collection: Collection, fetch: F, mut deliver: C) -> Subscription
    where
        T: Send + 'static,
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = StoreResult<T>> + Send + 'static,
        C: FnMut(StoreResult<T>) + Send + 'static,
    {
        // Listen before the first fetch so no change slips between the two.
        let mut changes = self.sender.subscribe();

        let task = tokio::spawn(async move {
            deliver(fetch().await);

            loop {
                match changes.recv().await {
                    Ok(changed) if changed == collection => deliver(fetch().await),
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(%collection, skipped, "Subscription lagged, refetching");
                        deliver(fetch().await);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        Subscription { task }
    }
}

/// Handle to a live query. Delivery stops on [`Subscription::cancel`] or drop.
pub struct Subscription {
    task: JoinHandle<()>,
}

impl Subscription {
    pub fn cancel(self) {
        self.task.abort();
    }

    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}
