use std::future::Future;
use std::sync::Arc;
use tokio::sync::OnceCell;

use super::executor::ExecutorError;

/// Process-wide, lazily performed backend setup.
///
/// The cell memoizes the initialization itself: callers that arrive while the
/// first initialization is still running wait on it instead of starting their
/// own. The outcome, success or failure, is kept for the life of the value.
#[derive(Debug)]
pub struct SharedSetup<T> {
    cell: OnceCell<Result<Arc<T>, ExecutorError>>,
}

impl<T> Default for SharedSetup<T> {
    fn default() -> Self {
        Self { cell: OnceCell::new() }
    }
}

impl<T> SharedSetup<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_or_init<F, Fut>(&self, init: F) -> Result<Arc<T>, ExecutorError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ExecutorError>>,
    {
        self.cell
            .get_or_init(|| async {
                let result = init().await.map(Arc::new);
                if let Err(e) = &result {
                    log::warn!("Backend setup failed: {e}");
                }
                result
            })
            .await
            .clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }
}
