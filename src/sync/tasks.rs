use std::future::Future;

use anyhow::{Context, Result};
use tokio::task::JoinHandle;

/// A dispatched background operation. The HTTP layer detaches the
/// handle and acknowledges immediately; the CLI joins it to surface
/// the outcome.
pub struct TaskHandle<T> {
    handle: JoinHandle<T>,
}

impl<T> TaskHandle<T> {
    /// Lets the task run to completion unobserved.
    pub fn detach(self) {
        drop(self.handle);
    }

    pub async fn join(self) -> Result<T> {
        self.handle.await.context("Background task panicked")
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

pub fn spawn<F>(future: F) -> TaskHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    TaskHandle {
        handle: tokio::spawn(future),
    }
}
