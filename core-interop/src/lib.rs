//! # Core Interop
//!
//! Infrastructure shared by every platform adapter in the workspace.
//!
//! ## Overview
//!
//! Application code talks to interface traits (see `bridge-traits`) so it can
//! be tested against substitutes. The adapters behind those traits are thin
//! views over a single platform object, built from three pieces:
//!
//! - [`Wrapper`](wrapper::Wrapper) - holds one native object, compares by its
//!   identity, and knows whether it owns it
//! - [`wrap`](convert::wrap) / [`unwrap`](convert::unwrap) and their sequence
//!   variants - convert between native values and adapters
//! - [`CallbackBridge`](bridge::CallbackBridge) - remembers which synthesized
//!   native callback belongs to which caller callback so that detaching works
//!
//! [`MulticastEvent`](multicast::MulticastEvent) gives native types an event
//! surface with multicast-delegate semantics.
//!
//! ## Writing an adapter
//!
//! ```
//! use core_interop::{
//!     Adapter, Callback, FromNative, MulticastEvent, Result, Wrapper,
//! };
//! use std::any::Any;
//! use std::sync::Arc;
//!
//! #[derive(Default)]
//! pub struct NativeTimer {
//!     pub elapsed: MulticastEvent<u64>,
//! }
//!
//! pub struct Timer {
//!     inner: Wrapper<NativeTimer>,
//! }
//!
//! impl FromNative<NativeTimer> for Timer {
//!     fn from_native(native: Arc<NativeTimer>) -> Self {
//!         let inner = Wrapper::borrowed(native);
//!         let timer = Arc::clone(inner.raw_native());
//!         inner
//!             .callbacks()
//!             .register_member::<String, u64, _>("elapsed", move |cb| {
//!                 timer.elapsed.remove(cb);
//!             });
//!         Self { inner }
//!     }
//! }
//!
//! impl Adapter for Timer {
//!     fn raw_native_any(&self) -> Option<&(dyn Any + Send + Sync)> {
//!         Some(self.inner.as_native_any())
//!     }
//! }
//!
//! impl Timer {
//!     pub fn on_elapsed(&self, callback: Callback<String>) -> Result<()> {
//!         let elapsed = &self.inner.raw_native().elapsed;
//!         self.inner.callbacks().attach(
//!             "elapsed",
//!             callback,
//!             |ms: &u64| format!("{ms}ms"),
//!             |native| elapsed.add(Arc::clone(native)),
//!         )?;
//!         Ok(())
//!     }
//!
//!     pub fn off_elapsed(&self, callback: &Callback<String>) {
//!         if let Some(native) = self
//!             .inner
//!             .callbacks()
//!             .try_detach::<String, u64>("elapsed", callback)
//!         {
//!             self.inner.raw_native().elapsed.remove(&native);
//!         }
//!     }
//! }
//!
//! let native = Arc::new(NativeTimer::default());
//! let timer = Timer::from_native(Arc::clone(&native));
//! let callback: Callback<String> = Arc::new(|label: &String| println!("{label}"));
//! timer.on_elapsed(Arc::clone(&callback)).unwrap();
//! assert_eq!(native.elapsed.raise(&5), 1);
//! timer.off_elapsed(&callback);
//! assert_eq!(native.elapsed.raise(&5), 0);
//! ```
//!
//! ## Thread Safety
//!
//! Wrappers are `Send + Sync`. Conversion functions hold no state. Each
//! callback bridge serializes its own operations behind one mutex.

pub mod bridge;
pub mod convert;
pub mod error;
pub mod multicast;
pub mod wrapper;

pub use bridge::{same_callback, Callback, CallbackBridge, NativeCallback};
pub use convert::{
    unwrap, unwrap_all, unwrap_all_required, wrap, wrap_all, wrap_all_required, Adapter,
    FromNative,
};
pub use error::{InteropError, Result};
pub use multicast::MulticastEvent;
pub use wrapper::{NativeResource, Ownership, Wrapper};
