//! Network Availability Adapter

use async_trait::async_trait;
use bridge_traits::network::{AvailabilityChanged, NetworkChange};
use chrono::{DateTime, Utc};
use core_interop::{Adapter, Callback, FromNative, MulticastEvent, Result, Wrapper};
use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tracing::debug;

const AVAILABILITY_CHANGED: &str = "availability_changed";

/// Default endpoint probed to decide whether the network is reachable
pub const DEFAULT_PROBE_ADDR: &str = "8.8.8.8:53";

/// Default timeout for a single probe
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Native event arguments raised by [`NetworkStatusSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeAvailabilityArgs {
    pub is_available: bool,
    pub observed_at: SystemTime,
}

/// Native network status object.
///
/// Connectivity is checked by opening a TCP connection to a well-known
/// endpoint. Platform APIs (netlink, SystemConfiguration, Network List
/// Manager) would report changes directly but need extra dependencies.
pub struct NetworkStatusSource {
    probe_addr: String,
    timeout: Duration,
    available: AtomicBool,
    pub availability_changed: MulticastEvent<NativeAvailabilityArgs>,
}

impl NetworkStatusSource {
    pub fn new(probe_addr: impl Into<String>, timeout: Duration) -> Self {
        Self {
            probe_addr: probe_addr.into(),
            timeout,
            available: AtomicBool::new(false),
            availability_changed: MulticastEvent::new(),
        }
    }

    pub fn probe_addr(&self) -> &str {
        &self.probe_addr
    }

    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::Acquire)
    }

    /// Check connectivity once without recording the result
    pub async fn probe(&self) -> bool {
        matches!(
            tokio::time::timeout(
                self.timeout,
                tokio::net::TcpStream::connect(self.probe_addr.as_str()),
            )
            .await,
            Ok(Ok(_))
        )
    }

    /// Probe and record the result. Returns the new availability.
    pub async fn refresh(&self) -> bool {
        let available = self.probe().await;
        self.record(available);
        available
    }

    /// Record an observation, raising `availability_changed` when it differs
    /// from the previous one. Returns whether it changed.
    pub fn record(&self, available: bool) -> bool {
        let previous = self.available.swap(available, Ordering::AcqRel);
        if previous == available {
            return false;
        }

        let handlers = self.availability_changed.raise(&NativeAvailabilityArgs {
            is_available: available,
            observed_at: SystemTime::now(),
        });
        debug!(available, handlers, "Network availability changed");
        true
    }
}

impl Default for NetworkStatusSource {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_ADDR, DEFAULT_PROBE_TIMEOUT)
    }
}

/// Desktop adapter over [`NetworkStatusSource`]
///
/// Callbacks attached through this adapter are tracked in its own callback
/// bridge, so disposing (or dropping) the adapter detaches exactly the
/// handlers it registered and leaves other subscribers of the same source
/// untouched.
pub struct DesktopNetworkChange {
    inner: Wrapper<NetworkStatusSource>,
}

impl DesktopNetworkChange {
    /// Create an adapter over a default probing source
    pub fn new() -> Self {
        Self::from_native(Arc::new(NetworkStatusSource::default()))
    }

    /// Create an adapter probing `probe_addr` with the given timeout
    pub fn with_probe(probe_addr: impl Into<String>, timeout: Duration) -> Self {
        Self::from_native(Arc::new(NetworkStatusSource::new(probe_addr, timeout)))
    }

    pub fn source(&self) -> &Arc<NetworkStatusSource> {
        self.inner.raw_native()
    }

    fn convert(args: &NativeAvailabilityArgs) -> AvailabilityChanged {
        AvailabilityChanged {
            is_available: args.is_available,
            observed_at: DateTime::<Utc>::from(args.observed_at),
        }
    }
}

impl Default for DesktopNetworkChange {
    fn default() -> Self {
        Self::new()
    }
}

impl FromNative<NetworkStatusSource> for DesktopNetworkChange {
    fn from_native(native: Arc<NetworkStatusSource>) -> Self {
        let inner = Wrapper::borrowed(native);
        let source = Arc::clone(inner.raw_native());
        inner
            .callbacks()
            .register_member::<AvailabilityChanged, NativeAvailabilityArgs, _>(
                AVAILABILITY_CHANGED,
                move |handler| {
                    source.availability_changed.remove(handler);
                },
            );
        Self { inner }
    }
}

impl Adapter for DesktopNetworkChange {
    fn raw_native_any(&self) -> Option<&(dyn Any + Send + Sync)> {
        Some(self.inner.as_native_any())
    }
}

#[async_trait]
impl NetworkChange for DesktopNetworkChange {
    fn is_available(&self) -> bool {
        self.source().is_available()
    }

    fn on_availability_changed(&self, callback: Callback<AvailabilityChanged>) -> Result<()> {
        self.inner.ensure_live()?;
        let source = self.source();
        self.inner.callbacks().attach(
            AVAILABILITY_CHANGED,
            callback,
            Self::convert,
            |handler| source.availability_changed.add(Arc::clone(handler)),
        )?;
        Ok(())
    }

    fn off_availability_changed(&self, callback: &Callback<AvailabilityChanged>) -> bool {
        match self
            .inner
            .callbacks()
            .try_detach::<AvailabilityChanged, NativeAvailabilityArgs>(AVAILABILITY_CHANGED, callback)
        {
            Some(handler) => self.source().availability_changed.remove(&handler),
            None => false,
        }
    }

    async fn poll(&self) -> Result<bool> {
        self.inner.ensure_live()?;
        Ok(self.source().refresh().await)
    }

    fn dispose(&self) -> Result<()> {
        self.inner.dispose()
    }
}
