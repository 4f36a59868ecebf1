//! # Host Bridge Traits
//!
//! Interfaces over platform primitives that application code depends on
//! instead of the platform types themselves.
//!
//! ## Overview
//!
//! Each trait here is implemented by a thin adapter that wraps exactly one
//! native object (see `core-interop`). Application code receives
//! `Arc<dyn Trait>` values and can be unit-tested against substitutes.
//!
//! ## Traits
//!
//! ### Files
//! - [`FileSystem`](storage::FileSystem) - Open, create, list and delete files
//! - [`FileStream`](storage::FileStream) - An open file handle (owned by its adapter)
//! - [`FileEntry`](storage::FileEntry) - A directory listing entry
//!
//! ### Networking
//! - [`HttpClient`](http::HttpClient) - Async HTTP requests
//! - [`NetworkChange`](network::NetworkChange) - Availability with change notifications
//!
//! ### Host integration
//! - [`LoggerSink`](logging::LoggerSink) - Forward structured logs to host logging
//!
//! ## Substitutes and `unwrap`
//!
//! Every trait extends [`Adapter`](core_interop::Adapter). Test doubles
//! implement it with the default method, which makes
//! [`core_interop::unwrap`] reject them with `UnsupportedImplementation`:
//! only library adapters can hand out their native object.
//!
//! ```ignore
//! use bridge_traits::HttpClient;
//! use core_interop::unwrap;
//!
//! fn raw_client(client: &dyn HttpClient) -> core_interop::Result<Option<Arc<reqwest::Client>>> {
//!     unwrap::<reqwest::Client, dyn HttpClient>(Some(client))
//! }
//! ```
//!
//! ## Thread Safety
//!
//! All traits require `Send + Sync` through `Adapter`.

pub mod http;
pub mod logging;
pub mod network;
pub mod storage;

pub use core_interop::{Adapter, Callback, InteropError, Result};

// Re-export commonly used types
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use network::{AvailabilityChanged, NetworkChange};
pub use storage::{FileEntry, FileStream, FileSystem};
