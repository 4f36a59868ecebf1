//! File System Adapters using Tokio

use async_trait::async_trait;
use bridge_traits::storage::{FileEntry, FileStream, FileSystem};
use bytes::Bytes;
use core_interop::{
    wrap_all_required, Adapter, FromNative, InteropError, NativeResource, Result, Wrapper,
};
use std::any::Any;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::debug;

/// Native file handle.
///
/// Tokio files need exclusive access for I/O, so the handle keeps the file
/// behind an async mutex. Closing takes the file out of the slot.
pub struct FileHandle {
    path: PathBuf,
    file: Mutex<Option<fs::File>>,
}

impl FileHandle {
    pub fn new(path: impl Into<PathBuf>, file: fs::File) -> Self {
        Self {
            path: path.into(),
            file: Mutex::new(Some(file)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Access to the tokio file; `None` once the handle is closed.
    pub fn file(&self) -> &Mutex<Option<fs::File>> {
        &self.file
    }
}

impl NativeResource for FileHandle {
    fn close(&self) -> Result<()> {
        let mut slot = self.file.try_lock().map_err(|_| {
            InteropError::OperationFailed(format!(
                "File is busy and cannot be closed: {}",
                self.path.display()
            ))
        })?;
        if slot.take().is_some() {
            debug!(path = ?self.path, "Closed file");
        }
        Ok(())
    }
}

/// Owned adapter over a [`FileHandle`].
pub struct TokioFileStream {
    inner: Wrapper<FileHandle>,
}

impl TokioFileStream {
    pub fn new(handle: Arc<FileHandle>) -> Self {
        Self {
            inner: Wrapper::owned(handle),
        }
    }

    /// Open an existing file for reading
    pub async fn open(path: &Path) -> Result<Self> {
        let file = fs::File::open(path).await?;
        debug!(path = ?path, "Opened file for reading");
        Ok(Self::new(Arc::new(FileHandle::new(path, file))))
    }

    /// Create or truncate a file, creating missing parent directories
    pub async fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let file = fs::File::create(path).await?;
        debug!(path = ?path, "Created file");
        Ok(Self::new(Arc::new(FileHandle::new(path, file))))
    }

    pub fn handle(&self) -> &Arc<FileHandle> {
        self.inner.raw_native()
    }

    fn closed(&self) -> InteropError {
        InteropError::ObjectDisposed {
            type_name: "TokioFileStream",
        }
    }
}

impl Adapter for TokioFileStream {
    fn raw_native_any(&self) -> Option<&(dyn Any + Send + Sync)> {
        Some(self.inner.as_native_any())
    }
}

#[async_trait]
impl FileStream for TokioFileStream {
    async fn read_to_end(&self) -> Result<Bytes> {
        self.inner.ensure_live()?;
        let mut slot = self.handle().file().lock().await;
        let file = slot.as_mut().ok_or_else(|| self.closed())?;

        let mut data = Vec::new();
        file.read_to_end(&mut data).await?;
        debug!(path = ?self.handle().path(), size = data.len(), "Read file");
        Ok(Bytes::from(data))
    }

    async fn write_all(&self, data: Bytes) -> Result<()> {
        self.inner.ensure_live()?;
        let mut slot = self.handle().file().lock().await;
        let file = slot.as_mut().ok_or_else(|| self.closed())?;

        file.write_all(data.as_ref()).await?;
        debug!(path = ?self.handle().path(), size = data.len(), "Wrote file");
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        self.inner.ensure_live()?;
        let mut slot = self.handle().file().lock().await;
        let file = slot.as_mut().ok_or_else(|| self.closed())?;
        file.flush().await?;
        Ok(())
    }

    async fn len(&self) -> Result<u64> {
        self.inner.ensure_live()?;
        let slot = self.handle().file().lock().await;
        let file = slot.as_ref().ok_or_else(|| self.closed())?;
        Ok(file.metadata().await?.len())
    }

    fn dispose(&self) -> Result<()> {
        self.inner.dispose()
    }
}

/// Borrowed adapter over a `tokio::fs::DirEntry`.
pub struct TokioFileEntry {
    inner: Wrapper<fs::DirEntry>,
}

impl FromNative<fs::DirEntry> for TokioFileEntry {
    fn from_native(native: Arc<fs::DirEntry>) -> Self {
        Self {
            inner: Wrapper::borrowed(native),
        }
    }
}

impl Adapter for TokioFileEntry {
    fn raw_native_any(&self) -> Option<&(dyn Any + Send + Sync)> {
        Some(self.inner.as_native_any())
    }
}

#[async_trait]
impl FileEntry for TokioFileEntry {
    fn path(&self) -> PathBuf {
        self.inner.raw_native().path()
    }

    fn file_name(&self) -> String {
        self.inner
            .raw_native()
            .file_name()
            .to_string_lossy()
            .into_owned()
    }

    async fn len(&self) -> Result<u64> {
        Ok(self.inner.raw_native().metadata().await?.len())
    }

    async fn is_directory(&self) -> Result<bool> {
        Ok(self.inner.raw_native().file_type().await?.is_dir())
    }
}

/// Tokio-based file system.
///
/// Forwards to free functions in `tokio::fs`, so there is no native object to
/// unwrap; `core_interop::unwrap` rejects it like any hand-written
/// implementation.
#[derive(Debug, Default, Clone)]
pub struct TokioFileSystem;

impl TokioFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Adapter for TokioFileSystem {}

#[async_trait]
impl FileSystem for TokioFileSystem {
    async fn open_read(&self, path: &Path) -> Result<Box<dyn FileStream>> {
        Ok(Box::new(TokioFileStream::open(path).await?))
    }

    async fn create(&self, path: &Path) -> Result<Box<dyn FileStream>> {
        Ok(Box::new(TokioFileStream::create(path).await?))
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        Ok(fs::try_exists(path).await?)
    }

    async fn list_directory(&self, path: &Path) -> Result<Vec<Arc<dyn FileEntry>>> {
        let mut read_dir = fs::read_dir(path).await?;
        let mut natives = Vec::new();
        while let Some(entry) = read_dir.next_entry().await? {
            natives.push(Some(Arc::new(entry)));
        }

        let entries: Vec<TokioFileEntry> = wrap_all_required(natives)?;
        debug!(path = ?path, count = entries.len(), "Listed directory");

        Ok(entries
            .into_iter()
            .map(|entry| Arc::new(entry) as Arc<dyn FileEntry>)
            .collect())
    }

    async fn delete_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).await?;
        debug!(path = ?path, "Deleted file");
        Ok(())
    }
}
