//! Per-key call coalescing.
//!
//! [`SingleFlight`] collapses concurrent calls for the same key into one
//! execution: the first caller (the leader) starts the work, later callers
//! await a shared handle to the same future, and everyone receives a clone of
//! its output. The entry is removed as soon as the leader finishes or is
//! dropped, so a cancelled or failed call is never replayed to later callers.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};

type Flight<T> = Shared<BoxFuture<'static, T>>;

struct Entry<T> {
    ticket: u64,
    flight: Flight<T>,
}

struct Inner<K, T> {
    flights: Mutex<HashMap<K, Entry<T>>>,
    next_ticket: AtomicU64,
}

impl<K, T> Inner<K, T> {
    fn lock(&self) -> MutexGuard<'_, HashMap<K, Entry<T>>> {
        self.flights.lock().unwrap_or_else(|err| err.into_inner())
    }
}

/// Table of in-flight computations keyed by `K`.
///
/// Cloning shares the table.
///
/// # Examples
/// ```
/// use wordbook::domain::SingleFlight;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let flights: SingleFlight<&str, u32> = SingleFlight::new();
/// let value = flights.run("answer", || async { 42 }).await;
/// assert_eq!(value, 42);
/// assert_eq!(flights.in_flight(), 0);
/// # });
/// ```
pub struct SingleFlight<K, T> {
    inner: Arc<Inner<K, T>>,
}

impl<K, T> Clone for SingleFlight<K, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, T> Default for SingleFlight<K, T> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Inner {
                flights: Mutex::new(HashMap::new()),
                next_ticket: AtomicU64::new(0),
            }),
        }
    }
}

impl<K, T> SingleFlight<K, T>
where
    K: Eq + Hash + Clone,
    T: Clone,
{
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys with a computation currently in progress.
    pub fn in_flight(&self) -> usize {
        self.inner.lock().len()
    }

    /// Run `make()` for `key`, or join the computation already running for
    /// it.
    ///
    /// `make` is only invoked by the leader. Followers that are still
    /// awaiting when the leader is dropped keep driving the shared future to
    /// completion; new callers start a fresh computation.
    pub async fn run<F, Fut>(&self, key: K, make: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + Sync + 'static,
    {
        let (flight, _leader) = {
            let mut flights = self.inner.lock();
            if let Some(entry) = flights.get(&key) {
                (entry.flight.clone(), None)
            } else {
                let ticket = self.inner.next_ticket.fetch_add(1, Ordering::Relaxed);
                let flight = make().boxed().shared();
                flights.insert(
                    key.clone(),
                    Entry {
                        ticket,
                        flight: flight.clone(),
                    },
                );
                let leader = LeaderGuard {
                    inner: Arc::clone(&self.inner),
                    key,
                    ticket,
                };
                (flight, Some(leader))
            }
        };
        flight.await
    }
}

/// Removes the leader's entry when the leader completes or is cancelled.
struct LeaderGuard<K: Eq + Hash, T> {
    inner: Arc<Inner<K, T>>,
    key: K,
    ticket: u64,
}

impl<K: Eq + Hash, T> Drop for LeaderGuard<K, T> {
    fn drop(&mut self) {
        let mut flights = self.inner.lock();
        if flights
            .get(&self.key)
            .is_some_and(|entry| entry.ticket == self.ticket)
        {
            flights.remove(&self.key);
        }
    }
}
