//! # Core Runtime Module
//!
//! Ambient runtime for the interop workspace:
//! - Logging and tracing infrastructure
//! - Redaction of fields forwarded to the host logger
//! - Configuration of injected bridge implementations
//!
//! ## Overview
//!
//! Application code receives its platform services as bridge trait objects.
//! [`config::InteropConfig`] collects them, filling in desktop adapters when
//! the `desktop-shims` feature is enabled, and fails fast with
//! [`Error::CapabilityMissing`] otherwise. [`logging::init_logging`] installs
//! the `tracing` subscriber the adapters log through.

pub mod config;
pub mod error;
pub mod logging;
pub mod redact;

pub use error::{Error, Result};
