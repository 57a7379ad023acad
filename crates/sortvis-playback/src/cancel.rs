//! Per-run cancellation.
//!
//! Every run gets its own [`CancelSource`]. Timed actions hold a
//! [`RunToken`] and check it, together with the run id, before touching any
//! state. A token from an earlier run never matches the current source, so a
//! late callback cannot mutate a newer run even if it was never cancelled.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

struct CancelInner {
    run_id: u64,
    cancelled: AtomicBool,
    notify: Notify,
}

/// Control side of a run's cancellation.
pub struct CancelSource {
    inner: Arc<CancelInner>,
}

/// Observer side, cloned into every scheduled action of the run.
#[derive(Clone)]
pub struct RunToken {
    inner: Arc<CancelInner>,
}

impl CancelSource {
    pub fn new(run_id: u64) -> Self {
        Self {
            inner: Arc::new(CancelInner {
                run_id,
                cancelled: AtomicBool::new(false),
                notify: Notify::new(),
            }),
        }
    }

    pub fn run_id(&self) -> u64 {
        self.inner.run_id
    }

    pub fn token(&self) -> RunToken {
        RunToken {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Cancel the run and wake every task waiting on [`RunToken::cancelled`].
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Release);
        self.inner.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Whether `token` belongs to this source and is still live.
    pub fn admits(&self, token: &RunToken) -> bool {
        Arc::ptr_eq(&self.inner, &token.inner) && !token.is_cancelled()
    }
}

impl RunToken {
    pub fn run_id(&self) -> u64 {
        self.inner.run_id
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Resolve once the run is cancelled.
    pub async fn cancelled(&self) {
        loop {
            // Register before checking so a concurrent cancel is not missed.
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

impl std::fmt::Debug for RunToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunToken")
            .field("run_id", &self.run_id())
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
