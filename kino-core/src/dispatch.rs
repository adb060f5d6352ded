//! Explicit UI-thread dispatch.
//!
//! View-models own UI-bound state and must only be touched from the thread
//! that created them. Instead of reading an ambient context, the dispatcher
//! is captured once at composition time and passed as a constructor
//! dependency; violations fail fast as programming errors.

use std::future::Future;
use std::thread::{self, ThreadId};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Handle to the UI thread and its runtime.
///
/// The affinity guarantee assumes a current-thread runtime: tasks spawned
/// through the dispatcher then share the thread that called
/// [`Dispatcher::new`].
#[derive(Debug, Clone)]
pub struct Dispatcher {
    thread: ThreadId,
    handle: Handle,
}

impl Dispatcher {
    /// Captures the current thread and tokio runtime as the UI context.
    ///
    /// # Panics
    ///
    /// Panics outside a tokio runtime.
    pub fn new() -> Self {
        Self {
            thread: thread::current().id(),
            handle: Handle::current(),
        }
    }

    pub fn is_ui_thread(&self) -> bool {
        thread::current().id() == self.thread
    }

    /// Fails fast when called from any thread but the UI thread.
    pub fn assert_ui_thread(&self) {
        assert!(
            self.is_ui_thread(),
            "UI-bound state must only be touched from the UI thread"
        );
    }

    /// Spawns a projection task on the UI runtime.
    pub fn spawn<F>(&self, future: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.handle.spawn(future)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
