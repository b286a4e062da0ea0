use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Handle returned by [`Observable::subscribe`]; pass it back to
/// [`Observable::unsubscribe`] to stop receiving updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

/// A value that notifies its subscribers after every change.
///
/// Subscribers are called with a snapshot of the new value outside the value
/// lock, so a callback may read the observable again. Changes and their
/// notifications are serialised: subscribers see changes in the order they
/// were applied, and a callback must not change the same observable.
pub struct Observable<T> {
    value: Mutex<T>,
    /// Held from a change until all of its notifications have run.
    notify: Mutex<()>,
    subscribers: Mutex<Vec<(Subscription, Callback<T>)>>,
    next_id: AtomicU64,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<T: Clone> Observable<T> {
    pub fn new(value: T) -> Self {
        Observable {
            value: Mutex::new(value),
            notify: Mutex::new(()),
            subscribers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Returns a copy of the current value.
    pub fn get(&self) -> T {
        lock(&self.value).clone()
    }

    /// Reads the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&*lock(&self.value))
    }

    pub fn set(&self, value: T) {
        self.update(|current| *current = value);
    }

    /// Mutates the value in place, then notifies subscribers.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let _ordered = lock(&self.notify);
        let snapshot = {
            let mut guard = lock(&self.value);
            f(&mut *guard);
            guard.clone()
        };
        let callbacks: Vec<Callback<T>> =
            lock(&self.subscribers).iter().map(|(_, cb)| Arc::clone(cb)).collect();
        for callback in callbacks {
            callback(&snapshot);
        }
    }

    pub fn subscribe(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let id = Subscription(self.next_id.fetch_add(1, Ordering::Relaxed));
        lock(&self.subscribers).push((id, Arc::new(callback)));
        id
    }

    /// Returns `false` if the subscription was already removed.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut subscribers = lock(&self.subscribers);
        let before = subscribers.len();
        subscribers.retain(|(id, _)| *id != subscription);
        subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.subscribers).len()
    }
}
