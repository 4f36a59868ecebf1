//! Multicast event surface for native objects.
//!
//! Native types in this workspace expose their events through
//! [`MulticastEvent`]. Handlers are compared by reference identity, duplicates
//! are allowed, and removal drops the most recently added matching handler.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::bridge::{same_callback, NativeCallback};

pub struct MulticastEvent<N> {
    handlers: Mutex<Vec<NativeCallback<N>>>,
}

impl<N> MulticastEvent<N> {
    pub fn new() -> Self {
        Self {
            handlers: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<NativeCallback<N>>> {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add(&self, handler: NativeCallback<N>) {
        self.lock().push(handler);
    }

    /// Remove one occurrence of `handler`. Returns `false` when it was not
    /// registered.
    pub fn remove(&self, handler: &NativeCallback<N>) -> bool {
        let mut handlers = self.lock();
        match handlers
            .iter()
            .rposition(|registered| same_callback(registered, handler))
        {
            Some(position) => {
                handlers.remove(position);
                true
            }
            None => false,
        }
    }

    /// Invoke every handler registered at the time of the call, in
    /// registration order. Returns the number of handlers invoked.
    pub fn raise(&self, args: &N) -> usize {
        // Handlers may add or remove handlers while running.
        let snapshot: Vec<NativeCallback<N>> = self.lock().clone();
        for handler in &snapshot {
            handler(args);
        }
        snapshot.len()
    }

    pub fn handler_count(&self) -> usize {
        self.lock().len()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl<N> Default for MulticastEvent<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> fmt::Debug for MulticastEvent<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MulticastEvent")
            .field("handlers", &self.handler_count())
            .finish()
    }
}
