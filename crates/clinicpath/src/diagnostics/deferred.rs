use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// One-shot work item that runs after a delay unless cancelled first.
///
/// Dropping the task cancels it. Cancelling the parent token passed to
/// [`DeferredTask::spawn`] cancels it too.
pub struct DeferredTask {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl DeferredTask {
    /// Must be called from within a tokio runtime.
    pub fn spawn<F>(delay: Duration, parent: &CancellationToken, work: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let token = parent.child_token();
        let task_token = token.clone();
        let handle = tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = task_token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    if !task_token.is_cancelled() {
                        work();
                    }
                }
            }
        });
        Self { token, handle }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for DeferredTask {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
