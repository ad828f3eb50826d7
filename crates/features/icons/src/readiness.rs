//! Readiness registry: one `loaded` flag per provider, shared read-only with
//! every icon below it.
//!
//! The flag is settled at most once, either `false -> true` or
//! `false -> false + error`, and never reverts. The provider's load task is the
//! only writer and it writes through a weak handle, so a load that finishes
//! after its provider is gone changes nothing.

use crate::error::SpriteLoadError;
use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};
use tokio::sync::watch;

/// Snapshot of the readiness flag.
#[derive(Debug, Clone, Default)]
pub struct ReadinessState {
    loaded: bool,
    error: Option<Arc<SpriteLoadError>>,
}

impl ReadinessState {
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// The failure that ended loading, if any.
    #[must_use]
    pub fn error(&self) -> Option<&SpriteLoadError> {
        self.error.as_deref()
    }

    /// Loaded or failed: no further transition will happen.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        self.loaded || self.error.is_some()
    }
}

/// Synchronous subscriber to the one-time readiness transition.
///
/// Called once, on the thread that settles the flag, or immediately on
/// registration if the flag is already settled.
pub trait ReadinessObserver: Send + Sync {
    fn on_settled(&self, state: &ReadinessState);
}

impl<F> ReadinessObserver for F
where
    F: Fn(&ReadinessState) + Send + Sync,
{
    fn on_settled(&self, state: &ReadinessState) {
        self(state);
    }
}

struct RegistryInner {
    state: watch::Sender<ReadinessState>,
    // Held while settling so registration and notification cannot interleave.
    observers: Mutex<Vec<Arc<dyn ReadinessObserver>>>,
}

impl fmt::Debug for RegistryInner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryInner")
            .field("state", &*self.state.borrow())
            .field("observers", &self.observers.lock().len())
            .finish()
    }
}

/// The owning side of the registry. Dropping it retires the registry.
#[derive(Debug)]
pub(crate) struct Readiness {
    inner: Arc<RegistryInner>,
}

impl Readiness {
    pub(crate) fn new() -> Self {
        let (state, _) = watch::channel(ReadinessState::default());
        Self { inner: Arc::new(RegistryInner { state, observers: Mutex::new(Vec::new()) }) }
    }

    pub(crate) fn handle(&self) -> ReadinessHandle {
        ReadinessHandle {
            receiver: self.inner.state.subscribe(),
            registry: Arc::downgrade(&self.inner),
        }
    }

    pub(crate) fn writer(&self) -> ReadinessWriter {
        ReadinessWriter { registry: Arc::downgrade(&self.inner) }
    }
}

/// Write access for the load task. Every write is a no-op once the owning
/// [`Readiness`] is dropped or the flag is settled.
#[derive(Debug, Clone)]
pub(crate) struct ReadinessWriter {
    registry: Weak<RegistryInner>,
}

impl ReadinessWriter {
    /// Flips `loaded` to `true`. Returns whether this call made the transition.
    pub(crate) fn mark_loaded(&self) -> bool {
        self.settle(|state| state.loaded = true)
    }

    /// Records a terminal load failure. Returns whether it was recorded.
    pub(crate) fn record_error(&self, error: impl Into<Arc<SpriteLoadError>>) -> bool {
        let error = error.into();
        self.settle(move |state| state.error = Some(error))
    }

    fn settle(&self, apply: impl FnOnce(&mut ReadinessState)) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };

        let (observers, snapshot) = {
            let mut observers = registry.observers.lock();
            let changed = registry.state.send_if_modified(|state| {
                if state.is_settled() {
                    return false;
                }
                apply(state);
                true
            });
            if !changed {
                return false;
            }
            (std::mem::take(&mut *observers), registry.state.borrow().clone())
        };

        for observer in observers {
            observer.on_settled(&snapshot);
        }
        true
    }
}

/// Read-only view of a provider's readiness flag.
///
/// Cheap to clone; every clone observes the same flag.
#[derive(Debug, Clone)]
pub struct ReadinessHandle {
    receiver: watch::Receiver<ReadinessState>,
    registry: Weak<RegistryInner>,
}

impl ReadinessHandle {
    /// Current snapshot.
    #[must_use]
    pub fn current(&self) -> ReadinessState {
        self.receiver.borrow().clone()
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.receiver.borrow().is_loaded()
    }

    /// An async subscription to flag changes.
    #[must_use]
    pub fn subscribe(&self) -> ReadinessReceiver {
        ReadinessReceiver { receiver: self.receiver.clone() }
    }

    /// Registers an observer for the settle transition.
    ///
    /// Already settled flags notify the observer before this returns. Observers
    /// of a retired registry are dropped without notification.
    pub fn observe(&self, observer: impl ReadinessObserver + 'static) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };

        let observer: Arc<dyn ReadinessObserver> = Arc::new(observer);
        let settled = {
            let mut observers = registry.observers.lock();
            let state = registry.state.borrow().clone();
            if state.is_settled() {
                Some(state)
            } else {
                observers.push(Arc::clone(&observer));
                None
            }
        };

        if let Some(state) = settled {
            observer.on_settled(&state);
        }
    }
}

/// Awaitable readiness subscription, built on a `watch` channel.
#[derive(Debug, Clone)]
pub struct ReadinessReceiver {
    receiver: watch::Receiver<ReadinessState>,
}

impl ReadinessReceiver {
    /// Waits until the flag settles. Returns the final `loaded` value, or
    /// `false` if the provider is torn down first.
    pub async fn wait_ready(&mut self) -> bool {
        self.receiver.wait_for(ReadinessState::is_settled).await.is_ok_and(|state| state.is_loaded())
    }

    /// Waits for the next change, returning `None` once the provider is gone.
    pub async fn changed(&mut self) -> Option<ReadinessState> {
        match self.receiver.changed().await {
            Ok(()) => Some(self.receiver.borrow_and_update().clone()),
            Err(_) => None,
        }
    }

    #[must_use]
    pub fn current(&self) -> ReadinessState {
        self.receiver.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, impl ReadinessObserver + 'static) {
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&hits);
        (hits, move |_: &ReadinessState| {
            seen.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn flag_flips_once_and_never_reverts() {
        let readiness = Readiness::new();
        let handle = readiness.handle();
        let writer = readiness.writer();

        assert!(!handle.is_loaded());
        assert!(writer.mark_loaded());
        assert!(!writer.mark_loaded());
        assert!(!writer.record_error(SpriteLoadError::from("late failure")));

        let state = handle.current();
        assert!(state.is_loaded());
        assert!(state.error().is_none());
    }

    #[test]
    fn error_is_terminal() {
        let readiness = Readiness::new();
        let writer = readiness.writer();

        assert!(writer.record_error(SpriteLoadError::Status {
            status: 404,
            reason: "Not Found".into(),
            context: None,
        }));
        assert!(!writer.mark_loaded());

        let state = readiness.handle().current();
        assert!(!state.is_loaded());
        assert_eq!(state.error().and_then(SpriteLoadError::status), Some(404));
    }

    #[test]
    fn observers_fire_once_including_late_ones() {
        let readiness = Readiness::new();
        let handle = readiness.handle();
        let (early, observer) = counter();
        handle.observe(observer);

        readiness.writer().mark_loaded();
        readiness.writer().mark_loaded();
        assert_eq!(early.load(Ordering::SeqCst), 1);

        let (late, observer) = counter();
        handle.observe(observer);
        assert_eq!(late.load(Ordering::SeqCst), 1, "late observer sees the settled flag");
    }

    #[test]
    fn writes_after_teardown_are_ignored() {
        let readiness = Readiness::new();
        let handle = readiness.handle();
        let writer = readiness.writer();
        drop(readiness);

        assert!(!writer.mark_loaded());
        assert!(!handle.is_loaded());

        let (hits, observer) = counter();
        handle.observe(observer);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn receivers_wake_on_transition() {
        let readiness = Readiness::new();
        let mut receiver = readiness.handle().subscribe();
        let writer = readiness.writer();

        let waiter = tokio::spawn(async move { receiver.wait_ready().await });
        tokio::task::yield_now().await;
        writer.mark_loaded();

        assert!(waiter.await.expect("waiter task"));
    }

    #[tokio::test]
    async fn receivers_give_up_when_provider_is_dropped() {
        let readiness = Readiness::new();
        let mut receiver = readiness.handle().subscribe();
        drop(readiness);

        assert!(!receiver.wait_ready().await);
        assert!(receiver.changed().await.is_none());
    }
}
