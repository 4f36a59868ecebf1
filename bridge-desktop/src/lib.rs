//! # Desktop Bridge Implementations
//!
//! Wrapper-backed adapters implementing the bridge traits on desktop
//! platforms (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! Each adapter holds its native object in a [`core_interop::Wrapper`]:
//! - `FileSystem` over `tokio::fs`, handing out owned [`TokioFileStream`]s
//!   and borrowed [`TokioFileEntry`]s
//! - `HttpClient` over a shared `reqwest::Client`
//! - `NetworkChange` over a probing [`NetworkStatusSource`], with callbacks
//!   routed through the wrapper's callback bridge
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{DesktopNetworkChange, TokioFileSystem};
//! use bridge_traits::{FileSystem, NetworkChange};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> core_interop::Result<()> {
//!     let fs = TokioFileSystem::new();
//!     let config = fs.read_file("settings.json".as_ref()).await?;
//!
//!     let network = DesktopNetworkChange::new();
//!     network.on_availability_changed(Arc::new(|event| {
//!         println!("online: {}", event.is_available);
//!     }))?;
//!     network.poll().await?;
//!     Ok(())
//! }
//! ```

mod filesystem;
mod http;
mod network;

pub use filesystem::{FileHandle, TokioFileEntry, TokioFileStream, TokioFileSystem};
pub use http::ReqwestHttpClient;
pub use network::{
    DesktopNetworkChange, NativeAvailabilityArgs, NetworkStatusSource, DEFAULT_PROBE_ADDR,
    DEFAULT_PROBE_TIMEOUT,
};
