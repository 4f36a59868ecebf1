//! Network Availability Abstraction
//!
//! Reports whether the host can reach the network and raises an event when
//! that changes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core_interop::{Adapter, Callback, Result};

/// Payload of the availability-changed event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityChanged {
    pub is_available: bool,
    pub observed_at: DateTime<Utc>,
}

/// Network change notifications
///
/// Callbacks follow multicast rules: the same callback may be attached more
/// than once and each [`off_availability_changed`](NetworkChange::off_availability_changed)
/// removes one attachment. Detaching a callback that was never attached
/// does nothing.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::network::{AvailabilityChanged, NetworkChange};
/// use std::sync::Arc;
///
/// fn watch(network: &dyn NetworkChange) -> Callback<AvailabilityChanged> {
///     let callback: Callback<AvailabilityChanged> = Arc::new(|event| {
///         tracing::info!(available = event.is_available, "Network changed");
///     });
///     network.on_availability_changed(Arc::clone(&callback))?;
///     callback
/// }
/// ```
#[async_trait]
pub trait NetworkChange: Adapter {
    /// Last observed availability
    fn is_available(&self) -> bool;

    fn on_availability_changed(&self, callback: Callback<AvailabilityChanged>) -> Result<()>;

    /// Returns `true` when an attachment of `callback` was removed.
    fn off_availability_changed(&self, callback: &Callback<AvailabilityChanged>) -> bool;

    /// Probe the network once, raising the event if availability changed.
    async fn poll(&self) -> Result<bool>;

    /// Detach every callback attached through this adapter.
    fn dispose(&self) -> Result<()>;
}
