//! Integration tests for the wrapper, conversion and callback bridge working
//! together through a leaf adapter.
//!
//! This test suite verifies:
//! - Multicast attach/detach semantics observed from the native side
//! - Bulk cleanup on dispose and on drop
//! - Attaching to a disposed wrapper registers nothing natively
//! - Concurrent attach/detach, and attach racing dispose, on a single wrapper
//! - Rejection of hand-written interface implementations by `unwrap`

use core_interop::{
    unwrap, wrap, wrap_all, wrap_all_required, Adapter, Callback, FromNative, InteropError,
    MulticastEvent, Result, Wrapper,
};
use std::any::Any;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

// ============================================================================
// Native counter and its adapter
// ============================================================================

#[derive(Default)]
struct NativeCounter {
    value: AtomicU64,
    incremented: MulticastEvent<u64>,
}

impl NativeCounter {
    fn increment(&self) -> usize {
        let value = self.value.fetch_add(1, Ordering::SeqCst) + 1;
        self.incremented.raise(&value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Incremented {
    value: u64,
}

trait Counter: Adapter {
    fn value(&self) -> u64;
}

const INCREMENTED: &str = "incremented";

struct CounterAdapter {
    inner: Wrapper<NativeCounter>,
}

impl FromNative<NativeCounter> for CounterAdapter {
    fn from_native(native: Arc<NativeCounter>) -> Self {
        let inner = Wrapper::borrowed(native);
        let counter = Arc::clone(inner.raw_native());
        inner
            .callbacks()
            .register_member::<Incremented, u64, _>(INCREMENTED, move |native_cb| {
                counter.incremented.remove(native_cb);
            });
        Self { inner }
    }
}

impl Adapter for CounterAdapter {
    fn raw_native_any(&self) -> Option<&(dyn Any + Send + Sync)> {
        Some(self.inner.as_native_any())
    }
}

impl Counter for CounterAdapter {
    fn value(&self) -> u64 {
        self.inner.raw_native().value.load(Ordering::SeqCst)
    }
}

impl CounterAdapter {
    fn on_incremented(&self, callback: Callback<Incremented>) -> Result<()> {
        let incremented = &self.inner.raw_native().incremented;
        self.inner.callbacks().attach(
            INCREMENTED,
            callback,
            |value: &u64| Incremented { value: *value },
            |native| incremented.add(Arc::clone(native)),
        )?;
        Ok(())
    }

    fn off_incremented(&self, callback: &Callback<Incremented>) -> bool {
        match self
            .inner
            .callbacks()
            .try_detach::<Incremented, u64>(INCREMENTED, callback)
        {
            Some(native) => {
                self.inner.raw_native().incremented.remove(&native);
                true
            }
            None => false,
        }
    }

    fn registrations(&self) -> usize {
        self.inner.callbacks().len(INCREMENTED)
    }
}

fn counting(hits: &Arc<AtomicUsize>) -> Callback<Incremented> {
    let hits = Arc::clone(hits);
    Arc::new(move |_: &Incremented| {
        hits.fetch_add(1, Ordering::SeqCst);
    })
}

// ============================================================================
// Multicast semantics
// ============================================================================

#[test]
fn test_attach_detach_scenario() {
    let native = Arc::new(NativeCounter::default());
    let adapter = CounterAdapter::from_native(Arc::clone(&native));
    let hits = Arc::new(AtomicUsize::new(0));
    let a = counting(&hits);

    adapter.on_incremented(Arc::clone(&a)).unwrap();
    native.increment();
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    adapter.on_incremented(Arc::clone(&a)).unwrap();
    native.increment();
    assert_eq!(hits.load(Ordering::SeqCst), 3);

    assert!(adapter.off_incremented(&a));
    native.increment();
    assert_eq!(hits.load(Ordering::SeqCst), 4);

    assert!(adapter.off_incremented(&a));
    native.increment();
    assert_eq!(hits.load(Ordering::SeqCst), 4);

    assert_eq!(adapter.registrations(), 0);
    assert_eq!(native.incremented.handler_count(), 0);
}

#[test]
fn test_attach_then_detach_leaves_nothing_registered() {
    let native = Arc::new(NativeCounter::default());
    let adapter = CounterAdapter::from_native(Arc::clone(&native));
    let hits = Arc::new(AtomicUsize::new(0));
    let a = counting(&hits);

    adapter.on_incremented(Arc::clone(&a)).unwrap();
    adapter.off_incremented(&a);

    assert_eq!(native.increment(), 0);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert_eq!(adapter.registrations(), 0);
}

#[test]
fn test_detach_never_attached_is_noop() {
    let native = Arc::new(NativeCounter::default());
    let adapter = CounterAdapter::from_native(Arc::clone(&native));
    let hits = Arc::new(AtomicUsize::new(0));
    let attached = counting(&hits);
    let stranger = counting(&hits);

    adapter.on_incremented(Arc::clone(&attached)).unwrap();

    assert!(!adapter.off_incremented(&stranger));
    assert_eq!(adapter.registrations(), 1);
    assert_eq!(native.incremented.handler_count(), 1);
}

#[test]
fn test_event_arguments_are_converted() {
    let native = Arc::new(NativeCounter::default());
    let adapter = CounterAdapter::from_native(Arc::clone(&native));
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    adapter.on_incremented(Arc::new(move |event: &Incremented| {
        sink.lock().unwrap().push(event.clone());
    }))
    .unwrap();
    native.increment();
    native.increment();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![Incremented { value: 1 }, Incremented { value: 2 }]
    );
    assert_eq!(adapter.value(), 2);
}

#[test]
fn test_tables_are_per_wrapper_instance() {
    let native = Arc::new(NativeCounter::default());
    let first = CounterAdapter::from_native(Arc::clone(&native));
    let second = CounterAdapter::from_native(Arc::clone(&native));
    let hits = Arc::new(AtomicUsize::new(0));
    let a = counting(&hits);

    first.on_incremented(Arc::clone(&a)).unwrap();

    // The second wrapper never attached `a`, so it has nothing to detach.
    assert!(!second.off_incremented(&a));
    assert_eq!(native.increment(), 1);
    assert_eq!(first.registrations(), 1);
    assert_eq!(second.registrations(), 0);
}

// ============================================================================
// Cleanup
// ============================================================================

#[test]
fn test_dispose_unregisters_native_callbacks() {
    let native = Arc::new(NativeCounter::default());
    let adapter = CounterAdapter::from_native(Arc::clone(&native));
    let hits = Arc::new(AtomicUsize::new(0));
    let a = counting(&hits);

    adapter.on_incremented(Arc::clone(&a)).unwrap();
    adapter.on_incremented(Arc::clone(&a)).unwrap();
    adapter.inner.dispose().unwrap();

    assert_eq!(native.increment(), 0);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert_eq!(Arc::strong_count(&a), 1);
}

#[test]
fn test_drop_unregisters_native_callbacks() {
    let native = Arc::new(NativeCounter::default());
    let hits = Arc::new(AtomicUsize::new(0));
    {
        let adapter = CounterAdapter::from_native(Arc::clone(&native));
        adapter.on_incremented(counting(&hits)).unwrap();
        assert_eq!(native.incremented.handler_count(), 1);
    }

    assert_eq!(native.incremented.handler_count(), 0);
    assert_eq!(native.increment(), 0);
}

#[test]
fn test_dispose_only_touches_own_registrations() {
    let native = Arc::new(NativeCounter::default());
    let first = CounterAdapter::from_native(Arc::clone(&native));
    let second = CounterAdapter::from_native(Arc::clone(&native));
    let hits = Arc::new(AtomicUsize::new(0));

    first.on_incremented(counting(&hits)).unwrap();
    second.on_incremented(counting(&hits)).unwrap();
    first.inner.dispose().unwrap();

    assert_eq!(native.increment(), 1);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn test_attach_after_dispose_registers_nothing() {
    let native = Arc::new(NativeCounter::default());
    let hits = Arc::new(AtomicUsize::new(0));
    let a = counting(&hits);
    {
        let adapter = CounterAdapter::from_native(Arc::clone(&native));
        adapter.inner.dispose().unwrap();

        assert!(matches!(
            adapter.on_incremented(Arc::clone(&a)),
            Err(InteropError::ObjectDisposed { .. })
        ));
        assert_eq!(adapter.registrations(), 0);
    }

    assert_eq!(native.incremented.handler_count(), 0);
    assert_eq!(native.increment(), 0);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert_eq!(Arc::strong_count(&a), 1);
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_concurrent_attach_detach_leaves_table_empty() {
    const THREADS: usize = 8;
    const ROUNDS: usize = 200;

    let native = Arc::new(NativeCounter::default());
    let adapter = Arc::new(CounterAdapter::from_native(Arc::clone(&native)));
    let hits = Arc::new(AtomicUsize::new(0));
    let shared = counting(&hits);

    let handles: Vec<_> = (0..THREADS)
        .map(|worker| {
            let adapter = Arc::clone(&adapter);
            let shared = Arc::clone(&shared);
            let hits = Arc::clone(&hits);
            thread::spawn(move || {
                let own = counting(&hits);
                for round in 0..ROUNDS {
                    let callback = if (worker + round) % 2 == 0 {
                        &shared
                    } else {
                        &own
                    };
                    adapter.on_incremented(Arc::clone(callback)).unwrap();
                    assert!(adapter.off_incremented(callback));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(adapter.registrations(), 0);
}

#[test]
fn test_attach_racing_dispose_leaves_no_native_handlers() {
    const ITERATIONS: usize = 100;
    const ATTACHERS: usize = 4;

    for _ in 0..ITERATIONS {
        let native = Arc::new(NativeCounter::default());
        let adapter = Arc::new(CounterAdapter::from_native(Arc::clone(&native)));
        let hits = Arc::new(AtomicUsize::new(0));

        let attachers: Vec<_> = (0..ATTACHERS)
            .map(|_| {
                let adapter = Arc::clone(&adapter);
                let hits = Arc::clone(&hits);
                thread::spawn(move || {
                    while adapter.on_incremented(counting(&hits)).is_ok() {}
                })
            })
            .collect();

        adapter.inner.dispose().unwrap();
        for attacher in attachers {
            attacher.join().unwrap();
        }

        assert_eq!(native.incremented.handler_count(), 0);
        assert_eq!(adapter.registrations(), 0);
    }
}

// ============================================================================
// Conversion through the adapter
// ============================================================================

#[test]
fn test_wrapped_adapters_compare_by_native_identity() {
    let native = Arc::new(NativeCounter::default());
    let a: CounterAdapter = wrap(Some(Arc::clone(&native))).unwrap();
    let b: CounterAdapter = wrap(Some(Arc::clone(&native))).unwrap();

    let mut set = HashSet::new();
    set.insert(a.inner.native_addr());
    assert!(set.contains(&b.inner.native_addr()));
    assert!(a.inner == b.inner);
}

#[test]
fn test_unwrap_through_interface_object() {
    let native = Arc::new(NativeCounter::default());
    let counter: Box<dyn Counter> = Box::new(CounterAdapter::from_native(Arc::clone(&native)));

    let back = unwrap::<NativeCounter, dyn Counter>(Some(counter.as_ref()))
        .unwrap()
        .unwrap();
    assert!(Arc::ptr_eq(&back, &native));
}

#[test]
fn test_wrap_all_over_adapters() {
    let a = Arc::new(NativeCounter::default());
    let b = Arc::new(NativeCounter::default());

    let nullable: Vec<Option<CounterAdapter>> =
        wrap_all(vec![Some(Arc::clone(&a)), None, Some(Arc::clone(&b))]);
    assert!(nullable[1].is_none());
    assert!(Arc::ptr_eq(nullable[2].as_ref().unwrap().inner.raw_native(), &b));

    let required = wrap_all_required::<_, CounterAdapter, _>(vec![Some(a), None, Some(b)]);
    assert!(matches!(
        required,
        Err(InteropError::NullElementInNonNullableSequence { index: 1 })
    ));
}

mod hand_written {
    use super::*;
    use mockall::mock;

    mock! {
        pub FakeCounter {}

        impl Adapter for FakeCounter {}

        impl Counter for FakeCounter {
            fn value(&self) -> u64;
        }
    }

    #[test]
    fn test_mock_works_as_interface() {
        let mut fake = MockFakeCounter::new();
        fake.expect_value().return_const(42u64);
        let counter: &dyn Counter = &fake;
        assert_eq!(counter.value(), 42);
    }

    #[test]
    fn test_unwrap_rejects_mock() {
        let fake = MockFakeCounter::new();
        let counter: &dyn Counter = &fake;
        let result = unwrap::<NativeCounter, dyn Counter>(Some(counter));
        assert!(matches!(
            result,
            Err(InteropError::UnsupportedImplementation { .. })
        ));
    }
}
