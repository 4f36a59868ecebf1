//! # Callback Bridge
//!
//! Tracks, per wrapper instance and per event member, which synthesized
//! native callback was registered on behalf of each caller callback.
//!
//! ## Overview
//!
//! A wrapper exposes events typed in terms of interface-level arguments while
//! the native object raises events with native arguments. Every
//! [`attach`](CallbackBridge::attach) builds a new native callback that
//! converts the argument and forwards to the caller. Because that callback is a
//! fresh value each time, detaching has to look up the one that was actually
//! registered; re-synthesizing it would never match.
//!
//! ```text
//!  caller callback ──attach──> CallbackBridge ──native callback──> native event
//!                                   │
//!  caller callback ──try_detach──>  └── first matching entry ──> remove from native event
//! ```
//!
//! ## Multicast semantics
//!
//! - Attaching the same caller callback twice records two entries.
//! - Each [`try_detach`](CallbackBridge::try_detach) removes exactly one
//!   entry, the earliest one still present.
//! - Detaching an unknown callback returns `None` and changes nothing.
//!
//! ## Cleanup
//!
//! [`release_all`](CallbackBridge::release_all) drains every member and runs
//! the unregister hook recorded by [`register_member`](CallbackBridge::register_member)
//! for each drained native callback. Hooks run after the table lock is
//! released, so a native object may raise events from inside its removal
//! routine without deadlocking.
//!
//! Releasing is final. `attach` registers the native callback with the
//! native object while holding the table lock, and fails once the bridge has
//! been released, so no native registration can outlive the cleanup.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::error::{InteropError, Result};

/// Callback supplied by the caller, typed with interface-level arguments.
pub type Callback<A> = Arc<dyn Fn(&A) + Send + Sync>;

/// Callback registered with the native object, typed with native arguments.
pub type NativeCallback<N> = Arc<dyn Fn(&N) + Send + Sync>;

type Unregister<N> = Arc<dyn Fn(&NativeCallback<N>) + Send + Sync>;

/// Compare two callbacks by reference identity.
///
/// Only the data pointer is compared; captured state is never inspected.
pub fn same_callback<F: ?Sized>(a: &Arc<F>, b: &Arc<F>) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct MemberKey {
    name: &'static str,
    types: TypeId,
}

impl MemberKey {
    fn of<A: 'static, N: 'static>(name: &'static str) -> Self {
        Self {
            name,
            types: TypeId::of::<MemberTable<A, N>>(),
        }
    }
}

struct Registration<A, N> {
    caller: Callback<A>,
    native: NativeCallback<N>,
}

struct MemberTable<A, N> {
    entries: Vec<Registration<A, N>>,
    unregister: Option<Unregister<N>>,
}

impl<A, N> MemberTable<A, N> {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            unregister: None,
        }
    }
}

/// Native unregistration work collected under the lock and run after it.
struct PendingRelease {
    count: usize,
    run: Box<dyn FnOnce() + Send>,
}

trait ErasedMember: Send {
    fn len(&self) -> usize;
    fn drain(&mut self) -> PendingRelease;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<A: 'static, N: 'static> ErasedMember for MemberTable<A, N> {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn drain(&mut self) -> PendingRelease {
        let natives: Vec<NativeCallback<N>> =
            self.entries.drain(..).map(|entry| entry.native).collect();
        let count = natives.len();
        let unregister = self.unregister.clone();

        PendingRelease {
            count,
            run: Box::new(move || {
                if let Some(unregister) = unregister {
                    for native in &natives {
                        unregister(native);
                    }
                }
            }),
        }
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

type Members = HashMap<MemberKey, Box<dyn ErasedMember>>;

#[derive(Default)]
struct Table {
    members: Members,
    released: bool,
}

fn table_mut<'a, A: 'static, N: 'static>(
    members: &'a mut Members,
    name: &'static str,
) -> &'a mut MemberTable<A, N> {
    let slot = members
        .entry(MemberKey::of::<A, N>(name))
        .or_insert_with(|| Box::new(MemberTable::<A, N>::new()));

    match slot.as_any_mut().downcast_mut::<MemberTable<A, N>>() {
        Some(table) => table,
        None => unreachable!("member key encodes the table type"),
    }
}

/// Per-wrapper registration table for bridged event callbacks.
///
/// All operations on one bridge are serialized by a single mutex; separate
/// bridges never coordinate.
pub struct CallbackBridge {
    table: Mutex<Table>,
}

impl CallbackBridge {
    pub fn new() -> Self {
        Self {
            table: Mutex::new(Table::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Table> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record how a native callback for `member` is removed from the native
    /// object. Used by [`release_all`](Self::release_all).
    pub fn register_member<A, N, U>(&self, member: &'static str, unregister: U)
    where
        A: 'static,
        N: 'static,
        U: Fn(&NativeCallback<N>) + Send + Sync + 'static,
    {
        let mut table = self.lock();
        table_mut::<A, N>(&mut table.members, member).unregister = Some(Arc::new(unregister));
    }

    /// Synthesize a native callback that converts its argument with
    /// `converter` and invokes `callback`, hand it to `register` and record
    /// the pair.
    ///
    /// `register` adds the callback to the native event. It runs under the
    /// table lock, so it must not call back into this bridge.
    ///
    /// # Errors
    ///
    /// Fails with [`InteropError::ObjectDisposed`] once
    /// [`release_all`](Self::release_all) has run; `register` is not called.
    pub fn attach<A, N, F, R>(
        &self,
        member: &'static str,
        callback: Callback<A>,
        converter: F,
        register: R,
    ) -> Result<NativeCallback<N>>
    where
        A: 'static,
        N: 'static,
        F: Fn(&N) -> A + Send + Sync + 'static,
        R: FnOnce(&NativeCallback<N>),
    {
        let target = Arc::clone(&callback);
        let native: NativeCallback<N> = Arc::new(move |args: &N| {
            let converted = converter(args);
            target(&converted);
        });

        let mut table = self.lock();
        if table.released {
            debug!(member, "Attach rejected on released bridge");
            return Err(InteropError::ObjectDisposed {
                type_name: "CallbackBridge",
            });
        }

        register(&native);
        let entries = table_mut::<A, N>(&mut table.members, member);
        entries.entries.push(Registration {
            caller: callback,
            native: Arc::clone(&native),
        });
        debug!(member, registrations = entries.entries.len(), "Attached callback");

        Ok(native)
    }

    /// Remove the earliest registration of `callback` for `member` and return
    /// the native callback that must be unregistered from the native event.
    pub fn try_detach<A, N>(
        &self,
        member: &'static str,
        callback: &Callback<A>,
    ) -> Option<NativeCallback<N>>
    where
        A: 'static,
        N: 'static,
    {
        let mut guard = self.lock();
        let table = guard
            .members
            .get_mut(&MemberKey::of::<A, N>(member))?
            .as_any_mut()
            .downcast_mut::<MemberTable<A, N>>()?;

        let Some(position) = table
            .entries
            .iter()
            .position(|entry| same_callback(&entry.caller, callback))
        else {
            debug!(member, "Detach requested for unknown callback");
            return None;
        };

        let registration = table.entries.remove(position);
        debug!(member, registrations = table.entries.len(), "Detached callback");
        Some(registration.native)
    }

    /// Number of live registrations for `member`.
    pub fn len(&self, member: &str) -> usize {
        self.lock()
            .members
            .iter()
            .filter(|(key, _)| key.name == member)
            .map(|(_, table)| table.len())
            .sum()
    }

    /// Number of live registrations across every member.
    pub fn total_len(&self) -> usize {
        self.lock().members.values().map(|table| table.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_len() == 0
    }

    /// Whether [`release_all`](Self::release_all) has run.
    pub fn is_released(&self) -> bool {
        self.lock().released
    }

    /// Drop every registration, unregister the matching native callbacks and
    /// refuse further attaches.
    ///
    /// Returns how many registrations were released.
    pub fn release_all(&self) -> usize {
        let pending: Vec<PendingRelease> = {
            let mut table = self.lock();
            table.released = true;
            table.members.values_mut().map(|member| member.drain()).collect()
        };

        let mut released = 0;
        for release in pending {
            released += release.count;
            (release.run)();
        }

        if released > 0 {
            debug!(released, "Released bridged callbacks");
        }
        released
    }
}

impl Default for CallbackBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CallbackBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.lock();
        let mut names: Vec<(&'static str, usize)> = table
            .members
            .iter()
            .map(|(key, table)| (key.name, table.len()))
            .collect();
        names.sort_unstable();

        f.debug_struct("CallbackBridge")
            .field("members", &names)
            .field("released", &table.released)
            .finish()
    }
}
