//! File System Abstractions
//!
//! Interfaces over file handles, directory entries and the file system
//! itself. Desktop implementations wrap `tokio::fs` types.

use async_trait::async_trait;
use bytes::Bytes;
use core_interop::{Adapter, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// An open file.
///
/// Streams are owned by their adapter: [`dispose`](FileStream::dispose)
/// closes the underlying handle, after which every operation fails with
/// `InteropError::ObjectDisposed`.
#[async_trait]
pub trait FileStream: Adapter {
    /// Read from the current position to the end of the file
    async fn read_to_end(&self) -> Result<Bytes>;

    /// Write all bytes at the current position
    async fn write_all(&self, data: Bytes) -> Result<()>;

    /// Flush buffered writes to the operating system
    async fn flush(&self) -> Result<()>;

    /// Current length of the file in bytes
    async fn len(&self) -> Result<u64>;

    /// Close the file. Once a close has succeeded further calls are no-ops;
    /// a close that failed (file busy) is attempted again.
    fn dispose(&self) -> Result<()>;
}

/// An entry produced while listing a directory.
#[async_trait]
pub trait FileEntry: Adapter {
    fn path(&self) -> PathBuf;

    fn file_name(&self) -> String;

    async fn len(&self) -> Result<u64>;

    async fn is_directory(&self) -> Result<bool>;
}

/// File system access
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::FileSystem;
///
/// async fn total_size(fs: &dyn FileSystem, dir: &Path) -> Result<u64> {
///     let mut total = 0;
///     for entry in fs.list_directory(dir).await? {
///         if !entry.is_directory().await? {
///             total += entry.len().await?;
///         }
///     }
///     Ok(total)
/// }
/// ```
#[async_trait]
pub trait FileSystem: Adapter {
    /// Open an existing file for reading
    async fn open_read(&self, path: &Path) -> Result<Box<dyn FileStream>>;

    /// Create (or truncate) a file for writing, creating parent directories
    async fn create(&self, path: &Path) -> Result<Box<dyn FileStream>>;

    async fn exists(&self, path: &Path) -> Result<bool>;

    /// List the entries of a directory in the order the platform returns them
    async fn list_directory(&self, path: &Path) -> Result<Vec<Arc<dyn FileEntry>>>;

    async fn delete_file(&self, path: &Path) -> Result<()>;

    /// Read a whole file
    async fn read_file(&self, path: &Path) -> Result<Bytes> {
        let stream = self.open_read(path).await?;
        let data = stream.read_to_end().await;
        stream.dispose()?;
        data
    }

    /// Replace the contents of a file
    async fn write_file(&self, path: &Path, data: Bytes) -> Result<()> {
        let stream = self.create(path).await?;
        let written = async {
            stream.write_all(data).await?;
            stream.flush().await
        }
        .await;
        stream.dispose()?;
        written
    }
}
