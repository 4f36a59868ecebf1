//! Workspace facade crate.
//!
//! Re-exports the interop core, the bridge traits and the runtime so host
//! applications depend on a single crate. The `desktop-shims` feature (on by
//! default) adds the desktop adapters and lets `InteropConfig` fall back to
//! them for capabilities that were not injected.

pub use bridge_traits;
pub use core_interop;
pub use core_runtime;

#[cfg(feature = "desktop-shims")]
pub use bridge_desktop;

pub use core_interop::{
    unwrap, unwrap_all, unwrap_all_required, wrap, wrap_all, wrap_all_required, Adapter, Callback,
    CallbackBridge, FromNative, InteropError, MulticastEvent, NativeResource, Ownership, Wrapper,
};
pub use core_runtime::config::InteropConfig;
