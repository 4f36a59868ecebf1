//! # Interop Configuration
//!
//! Collects the bridge implementations application code runs against.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct an
//! `InteropConfig` holding every injected bridge. It enforces fail-fast
//! validation so a missing capability is reported at startup rather than on
//! first use.
//!
//! ## Capabilities
//!
//! - `FileSystem` - File I/O (desktop default: tokio fs)
//! - `HttpClient` - HTTP operations (desktop default: reqwest)
//! - `NetworkChange` - Connectivity notifications (required only when
//!   network awareness is enabled; desktop default: TCP probe)
//!
//! When the `desktop-shims` feature is enabled, desktop adapters are
//! injected for any capability that was not provided. Without it, a missing
//! capability fails with [`Error::CapabilityMissing`].
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::InteropConfig;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let config = InteropConfig::builder()
//!     .file_system(Arc::new(MyFileSystem))
//!     .http_client(Arc::new(MyHttpClient))
//!     .request_timeout(Duration::from_secs(10))
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use bridge_traits::{FileSystem, HttpClient, NetworkChange};
use std::sync::Arc;
use std::time::Duration;

/// Default timeout applied to HTTP requests made by the desktop client
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for a single network availability probe
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

const MAX_TIMEOUT: Duration = Duration::from_secs(300);

/// Injected bridges and settings.
///
/// Use [`InteropConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct InteropConfig {
    /// File system access
    pub file_system: Arc<dyn FileSystem>,

    /// HTTP client
    pub http_client: Arc<dyn HttpClient>,

    /// Network availability notifications (optional)
    pub network_change: Option<Arc<dyn NetworkChange>>,

    /// Timeout applied to HTTP requests by the default client
    pub request_timeout: Duration,

    /// Timeout for a single availability probe by the default monitor
    pub probe_timeout: Duration,

    /// Feature flags
    pub features: FeatureFlags,
}

impl std::fmt::Debug for InteropConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteropConfig")
            .field("file_system", &"FileSystem { ... }")
            .field("http_client", &"HttpClient { ... }")
            .field(
                "network_change",
                &self
                    .network_change
                    .as_ref()
                    .map(|_| "NetworkChange { ... }"),
            )
            .field("request_timeout", &self.request_timeout)
            .field("probe_timeout", &self.probe_timeout)
            .field("features", &self.features)
            .finish()
    }
}

/// Feature flags control optional functionality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeatureFlags {
    /// Enable network-aware operations (requires NetworkChange)
    pub enable_network_awareness: bool,
}

impl InteropConfig {
    /// Creates a new builder for constructing an `InteropConfig`.
    pub fn builder() -> InteropConfigBuilder {
        InteropConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Timeouts are non-zero and at most five minutes
    /// - Feature flags are consistent with available bridges
    pub fn validate(&self) -> Result<()> {
        validate_timeout("Request timeout", self.request_timeout)?;
        validate_timeout("Probe timeout", self.probe_timeout)?;

        if self.features.enable_network_awareness && self.network_change.is_none() {
            return Err(Error::Config(
                "Network awareness enabled but no NetworkChange provided. \
                 Disable the feature or inject a NetworkChange implementation."
                    .to_string(),
            ));
        }

        Ok(())
    }
}

fn validate_timeout(name: &str, timeout: Duration) -> Result<()> {
    if timeout.is_zero() {
        return Err(Error::Config(format!("{} must be greater than 0", name)));
    }

    if timeout > MAX_TIMEOUT {
        return Err(Error::Config(format!(
            "{} exceeds maximum of {} seconds",
            name,
            MAX_TIMEOUT.as_secs()
        )));
    }

    Ok(())
}

#[cfg(feature = "desktop-shims")]
fn provide_default_file_system() -> Result<Arc<dyn FileSystem>> {
    use bridge_desktop::TokioFileSystem;

    let fs: Arc<dyn FileSystem> = Arc::new(TokioFileSystem::new());
    Ok(fs)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_file_system() -> Result<Arc<dyn FileSystem>> {
    Err(Error::CapabilityMissing {
        capability: "FileSystem".to_string(),
        message: "FileSystem implementation is required for file I/O. \
                 Desktop: enable the 'desktop-shims' feature to use the default TokioFileSystem. \
                 Other hosts: inject an adapter over the platform file API."
            .to_string(),
    })
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client(timeout: Duration) -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::with_timeout(timeout)?);
    Ok(client)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client(_timeout: Duration) -> Result<Arc<dyn HttpClient>> {
    Err(Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "HttpClient implementation is required for network requests. \
                 Desktop: enable the 'desktop-shims' feature to use the default ReqwestHttpClient. \
                 Other hosts: inject an adapter over the platform HTTP stack."
            .to_string(),
    })
}

#[cfg(feature = "desktop-shims")]
fn provide_default_network_change(probe_timeout: Duration) -> Result<Arc<dyn NetworkChange>> {
    use bridge_desktop::{DesktopNetworkChange, DEFAULT_PROBE_ADDR};

    let network: Arc<dyn NetworkChange> = Arc::new(DesktopNetworkChange::with_probe(
        DEFAULT_PROBE_ADDR,
        probe_timeout,
    ));
    Ok(network)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_network_change(_probe_timeout: Duration) -> Result<Arc<dyn NetworkChange>> {
    Err(Error::CapabilityMissing {
        capability: "NetworkChange".to_string(),
        message: "Network awareness requires a NetworkChange implementation. \
                 Desktop: enable the 'desktop-shims' feature to use the default DesktopNetworkChange. \
                 Other hosts: inject an adapter over the platform connectivity API, \
                 or disable network awareness."
            .to_string(),
    })
}

/// Builder for constructing [`InteropConfig`] instances.
#[derive(Default)]
pub struct InteropConfigBuilder {
    file_system: Option<Arc<dyn FileSystem>>,
    http_client: Option<Arc<dyn HttpClient>>,
    network_change: Option<Arc<dyn NetworkChange>>,
    request_timeout: Option<Duration>,
    probe_timeout: Option<Duration>,
    features: FeatureFlags,
}

impl InteropConfigBuilder {
    /// Sets the file system implementation.
    ///
    /// If not provided, the desktop default (tokio fs-based) is used when the
    /// `desktop-shims` feature is enabled.
    pub fn file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.file_system = Some(fs);
        self
    }

    /// Sets the HTTP client implementation.
    ///
    /// If not provided, the desktop default (reqwest-based) is used when the
    /// `desktop-shims` feature is enabled.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the network availability implementation (optional).
    pub fn network_change(mut self, network: Arc<dyn NetworkChange>) -> Self {
        self.network_change = Some(network);
        self
    }

    /// Sets the HTTP request timeout used by the default client.
    ///
    /// Default: 30 seconds
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the probe timeout used by the default network monitor.
    ///
    /// Default: 5 seconds
    pub fn probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = Some(timeout);
        self
    }

    /// Enables or disables network awareness.
    ///
    /// Requires a `NetworkChange` to be provided, or the `desktop-shims`
    /// feature to supply the default one.
    pub fn enable_network_awareness(mut self, enabled: bool) -> Self {
        self.features.enable_network_awareness = enabled;
        self
    }

    /// Sets all feature flags at once.
    pub fn features(mut self, features: FeatureFlags) -> Self {
        self.features = features;
        self
    }

    /// Builds the final `InteropConfig` instance.
    ///
    /// Returns an error if:
    /// - A required bridge is missing and no desktop default is available
    /// - A timeout is out of range
    /// - Feature flags are inconsistent with available bridges
    pub fn build(self) -> Result<InteropConfig> {
        let request_timeout = self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);
        let probe_timeout = self.probe_timeout.unwrap_or(DEFAULT_PROBE_TIMEOUT);
        validate_timeout("Request timeout", request_timeout)?;
        validate_timeout("Probe timeout", probe_timeout)?;

        let file_system = match self.file_system {
            Some(fs) => fs,
            None => provide_default_file_system()?,
        };

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client(request_timeout)?,
        };

        let network_change = match self.network_change {
            Some(network) => Some(network),
            None if self.features.enable_network_awareness => {
                Some(provide_default_network_change(probe_timeout)?)
            }
            None => None,
        };

        let config = InteropConfig {
            file_system,
            http_client,
            network_change,
            request_timeout,
            probe_timeout,
            features: self.features,
        };

        config.validate()?;

        Ok(config)
    }
}
