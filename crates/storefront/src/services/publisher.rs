//! Publish-subscribe fan-out of store snapshots.
//!
//! Each store owns one [`Publisher`] and calls [`Publisher::publish`] with its
//! full snapshot after every successful mutation. Listeners run
//! synchronously, in registration order, on the mutating task.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};

type Listener<T> = Arc<dyn Fn(&[T]) + Send + Sync>;

struct Registry<T> {
    next_id: AtomicU64,
    listeners: RwLock<Vec<(u64, Listener<T>)>>,
}

impl<T> Registry<T> {
    fn remove(&self, id: u64) {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(listener_id, _)| *listener_id != id);
    }
}

/// Snapshot publisher for one store.
pub struct Publisher<T> {
    registry: Arc<Registry<T>>,
}

impl<T: 'static> Publisher<T> {
    /// Create a publisher with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Registry {
                next_id: AtomicU64::new(0),
                listeners: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Register a listener. It stays registered until the returned
    /// [`Subscription`] is dropped or unsubscribed.
    #[must_use = "dropping the subscription unsubscribes the listener"]
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&[T]) + Send + Sync + 'static,
        T: Send + Sync,
    {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        self.registry
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(listener)));

        let registry: Weak<Registry<T>> = Arc::downgrade(&self.registry);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(registry) = registry.upgrade() {
                    registry.remove(id);
                }
            })),
        }
    }

    /// Call every listener with `snapshot`.
    pub fn publish(&self, snapshot: &[T]) {
        // Clone the handles so a listener may subscribe or unsubscribe
        // without deadlocking on the registry.
        let listeners: Vec<Listener<T>> = self
            .registry
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(snapshot);
        }
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.registry
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl<T: 'static> Default for Publisher<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Publisher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self
            .registry
            .listeners
            .read()
            .map_or(0, |listeners| listeners.len());
        f.debug_struct("Publisher")
            .field("listeners", &count)
            .finish()
    }
}

/// Handle to a registered listener.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Remove the listener now.
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    /// Keep the listener registered for the publisher's lifetime.
    pub fn detach(mut self) {
        self.cancel = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_listeners_receive_snapshots_in_order() {
        let publisher = Publisher::<u32>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let first = Arc::clone(&seen);
        let _a = publisher.subscribe(move |items| first.lock().unwrap().push(("a", items.len())));
        let second = Arc::clone(&seen);
        let _b = publisher.subscribe(move |items| second.lock().unwrap().push(("b", items.len())));

        publisher.publish(&[1, 2, 3]);

        assert_eq!(*seen.lock().unwrap(), vec![("a", 3), ("b", 3)]);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let publisher = Publisher::<u32>::new();
        let calls = Arc::new(AtomicU64::new(0));

        let counter = Arc::clone(&calls);
        let subscription = publisher.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        publisher.publish(&[1]);
        drop(subscription);
        publisher.publish(&[1]);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(publisher.listener_count(), 0);
    }

    #[test]
    fn test_detach_keeps_listener() {
        let publisher = Publisher::<u32>::new();
        publisher.subscribe(|_| {}).detach();
        assert_eq!(publisher.listener_count(), 1);
    }

    #[test]
    fn test_unsubscribe_after_publisher_dropped() {
        let publisher = Publisher::<u32>::new();
        let subscription = publisher.subscribe(|_| {});
        drop(publisher);
        subscription.unsubscribe();
    }
}
