//! Discard results of requests whose view has gone away.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use futures::future::{AbortHandle, Abortable};

/// Groups the in-flight requests of one view.
///
/// [`run`](Self::run) yields `None` instead of a value when the scope was
/// left before the request finished. Leaving is permanent.
#[derive(Debug, Default)]
pub struct ViewScope {
    handles: Mutex<Vec<AbortHandle>>,
    left: AtomicBool,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn run<F: Future>(&self, future: F) -> Option<F::Output> {
        if self.is_left() {
            return None;
        }
        let (handle, registration) = AbortHandle::new_pair();
        {
            let mut handles = self.handles.lock().unwrap_or_else(PoisonError::into_inner);
            handles.retain(|h| !h.is_aborted());
            handles.push(handle);
        }
        // leave() may have raced with the registration above
        if self.is_left() {
            return None;
        }
        Abortable::new(future, registration).await.ok()
    }

    /// Abort everything still pending in this scope.
    pub fn leave(&self) {
        self.left.store(true, Ordering::SeqCst);
        let handles = std::mem::take(
            &mut *self.handles.lock().unwrap_or_else(PoisonError::into_inner),
        );
        if !handles.is_empty() {
            tracing::debug!(pending = handles.len(), "Discarding in-flight requests");
        }
        for handle in handles {
            handle.abort();
        }
    }

    pub fn is_left(&self) -> bool {
        self.left.load(Ordering::SeqCst)
    }
}
