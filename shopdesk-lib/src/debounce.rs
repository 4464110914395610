//! Trailing-edge debouncer.
//!
//! A [`Debouncer`] owns a single timer slot. Every [`trigger`](Debouncer::trigger)
//! replaces the pending value and restarts the quiet period; the action runs
//! once, with the last value, after the quiet period elapses with no further
//! triggers. There is no maximum wait.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use shopdesk_lib::Debouncer;
//!
//! let debouncer = Debouncer::new(Duration::from_millis(300), |query: String| {
//!     println!("search for {query}");
//! });
//!
//! debouncer.trigger("sh".to_string());
//! debouncer.trigger("shoes".to_string()); // only this one runs
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

type Action<T> = Arc<dyn Fn(T) -> BoxFuture<'static, ()> + Send + Sync>;

/// The value waiting for the quiet period, and the timer that will deliver it.
struct Pending<T> {
    generation: u64,
    value: T,
    timer: JoinHandle<()>,
}

/// Resettable trailing-edge debouncer.
///
/// Must be triggered from within a tokio runtime. Dropping the debouncer
/// cancels any pending run.
pub struct Debouncer<T> {
    delay: Duration,
    action: Action<T>,
    slot: Arc<Mutex<Option<Pending<T>>>>,
    generation: AtomicU64,
}

impl<T> std::fmt::Debug for Debouncer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.delay)
            .field("pending", &self.is_pending())
            .finish()
    }
}

impl<T: Send + 'static> Debouncer<T> {
    /// Create a debouncer around a synchronous action.
    pub fn new<F>(delay: Duration, action: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self::new_async(delay, move |value| {
            action(value);
            std::future::ready(())
        })
    }

    /// Create a debouncer around an asynchronous action.
    pub fn new_async<F, Fut>(delay: Duration, action: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            delay,
            action: Arc::new(move |value| action(value).boxed()),
            slot: Arc::new(Mutex::new(None)),
            generation: AtomicU64::new(0),
        }
    }

    /// Replace the pending value and restart the quiet period.
    pub fn trigger(&self, value: T) {
        let Ok(runtime) = Handle::try_current() else {
            log::warn!("debouncer triggered outside a tokio runtime; dropping value");
            return;
        };

        let Ok(mut guard) = self.slot.lock() else {
            return;
        };
        // Numbered under the slot lock so generations follow slot order.
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let delay = self.delay;
        let action = Arc::clone(&self.action);
        let slot = Arc::clone(&self.slot);

        if let Some(previous) = guard.take() {
            previous.timer.abort();
        }

        let timer = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let value = match slot.lock() {
                Ok(mut guard) => match guard.take() {
                    Some(pending) if pending.generation == generation => pending.value,
                    // Superseded between wake-up and lock; put it back.
                    other => {
                        *guard = other;
                        return;
                    }
                },
                Err(_) => return,
            };
            action(value).await;
        });

        *guard = Some(Pending {
            generation,
            value,
            timer,
        });
    }

    /// Run the pending value now, skipping the rest of the quiet period.
    ///
    /// Returns `true` if there was a pending value.
    pub async fn flush(&self) -> bool {
        let pending = match self.slot.lock() {
            Ok(mut guard) => guard.take(),
            Err(_) => None,
        };
        match pending {
            Some(pending) => {
                pending.timer.abort();
                (self.action)(pending.value).await;
                true
            }
            None => false,
        }
    }
}

impl<T> Debouncer<T> {
    /// The quiet period.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Drop the pending value without running the action.
    pub fn cancel(&self) {
        if let Ok(mut guard) = self.slot.lock()
            && let Some(pending) = guard.take()
        {
            pending.timer.abort();
        }
    }

    /// Whether a value is waiting for the quiet period to elapse.
    pub fn is_pending(&self) -> bool {
        self.slot.lock().map(|g| g.is_some()).unwrap_or(false)
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.cancel();
    }
}
