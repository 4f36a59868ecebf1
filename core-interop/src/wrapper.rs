//! Wrapper Base
//!
//! Holds exactly one native object for its whole lifetime and gives it an
//! identity, an ownership mode and a per-instance callback table.

use std::any::{type_name, Any};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, warn};

use crate::{
    bridge::CallbackBridge,
    convert::{Adapter, FromNative},
    error::{InteropError, Result},
};

/// A platform type whose resource can be released explicitly.
///
/// Only required for owned wrappers; borrowed wrappers accept any
/// `Send + Sync + 'static` type.
pub trait NativeResource: Send + Sync + 'static {
    /// Release the platform resource held by this object.
    fn close(&self) -> Result<()>;
}

/// Whether a wrapper is responsible for closing its native object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ownership {
    /// The native object is only referenced; disposal never closes it.
    #[default]
    Borrowed,
    /// The wrapper closes the native object when disposed.
    Owned,
}

type Closer<T> = fn(&T) -> Result<()>;

/// Reference to a single native object plus the wrapper-scoped state built on
/// top of it.
///
/// Equality and hashing follow the identity of the native object, not of the
/// wrapper, so two wrappers created independently over the same native value
/// are interchangeable in sets and maps.
///
/// # Example
///
/// ```
/// use core_interop::Wrapper;
/// use std::sync::{Arc, Mutex, PoisonError};
///
/// struct Socket;
///
/// let socket = Arc::new(Socket);
/// let a = Wrapper::borrowed(Arc::clone(&socket));
/// let b = Wrapper::borrowed(Arc::clone(&socket));
/// assert_eq!(a, b);
/// assert!(Arc::ptr_eq(a.raw_native(), &socket));
/// ```
pub struct Wrapper<T: Send + Sync + 'static> {
    native: Arc<T>,
    closer: Option<Closer<T>>,
    callbacks: CallbackBridge,
    disposed: AtomicBool,
    closed: Mutex<bool>,
}

impl<T: Send + Sync + 'static> Wrapper<T> {
    /// Create a borrowed wrapper, failing fast when no native object is
    /// supplied.
    pub fn new(native: Option<Arc<T>>) -> Result<Self> {
        let native = native.ok_or(InteropError::MissingRequiredValue { name: "native" })?;
        Ok(Self::borrowed(native))
    }

    /// Create an owned wrapper, failing fast when no native object is
    /// supplied.
    pub fn new_owned(native: Option<Arc<T>>) -> Result<Self>
    where
        T: NativeResource,
    {
        let native = native.ok_or(InteropError::MissingRequiredValue { name: "native" })?;
        Ok(Self::owned(native))
    }

    /// Wrap a native object without taking responsibility for closing it.
    pub fn borrowed(native: Arc<T>) -> Self {
        Self::with_closer(native, None)
    }

    /// Wrap a native object that is closed when the wrapper is disposed.
    pub fn owned(native: Arc<T>) -> Self
    where
        T: NativeResource,
    {
        Self::with_closer(native, Some(<T as NativeResource>::close as Closer<T>))
    }

    fn with_closer(native: Arc<T>, closer: Option<Closer<T>>) -> Self {
        Self {
            native,
            closer,
            callbacks: CallbackBridge::new(),
            disposed: AtomicBool::new(false),
            closed: Mutex::new(false),
        }
    }

    /// Escape hatch returning the held native object.
    ///
    /// Meant for the conversion layer and deliberate interop with code that
    /// needs the platform type itself.
    pub fn raw_native(&self) -> &Arc<T> {
        &self.native
    }

    /// Type-erased form of [`raw_native`](Self::raw_native), used by
    /// [`unwrap`](crate::convert::unwrap).
    pub fn as_native_any(&self) -> &(dyn Any + Send + Sync) {
        &self.native
    }

    pub fn ownership(&self) -> Ownership {
        match self.closer {
            Some(_) => Ownership::Owned,
            None => Ownership::Borrowed,
        }
    }

    /// Callback registrations created through this wrapper instance.
    pub fn callbacks(&self) -> &CallbackBridge {
        &self.callbacks
    }

    /// Address of the native object; stable for the lifetime of the wrapper.
    pub fn native_addr(&self) -> usize {
        Arc::as_ptr(&self.native) as *const () as usize
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Fail with [`InteropError::ObjectDisposed`] once the wrapper is disposed.
    pub fn ensure_live(&self) -> Result<()> {
        if self.is_disposed() {
            return Err(InteropError::ObjectDisposed {
                type_name: type_name::<T>(),
            });
        }
        Ok(())
    }

    /// Release every callback registered through this wrapper and, when the
    /// native object is owned, close it.
    ///
    /// Callbacks are released by the first call. A close that failed is
    /// attempted again by later calls and on drop; once it succeeds further
    /// calls do nothing.
    pub fn dispose(&self) -> Result<()> {
        if !self.disposed.swap(true, Ordering::AcqRel) {
            let released = self.callbacks.release_all();
            debug!(
                native = type_name::<T>(),
                ownership = ?self.ownership(),
                released,
                "Disposed wrapper"
            );
        }

        self.close_native()
    }

    fn close_native(&self) -> Result<()> {
        let Some(close) = self.closer else {
            return Ok(());
        };

        let mut closed = self.closed.lock().unwrap_or_else(PoisonError::into_inner);
        if *closed {
            return Ok(());
        }
        close(&self.native)?;
        *closed = true;
        Ok(())
    }
}

impl<T: Send + Sync + 'static> Drop for Wrapper<T> {
    fn drop(&mut self) {
        if let Err(err) = self.dispose() {
            warn!(native = type_name::<T>(), error = %err, "Failed to close native object on drop");
        }
    }
}

impl<T: Send + Sync + 'static> PartialEq for Wrapper<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.native, &other.native)
    }
}

impl<T: Send + Sync + 'static> Eq for Wrapper<T> {}

impl<T: Send + Sync + 'static> Hash for Wrapper<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.native_addr().hash(state);
    }
}

impl<T: Send + Sync + 'static> fmt::Debug for Wrapper<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wrapper")
            .field("native", &type_name::<T>())
            .field("addr", &format_args!("{:#x}", self.native_addr()))
            .field("ownership", &self.ownership())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

impl<T: Send + Sync + 'static> Adapter for Wrapper<T> {
    fn raw_native_any(&self) -> Option<&(dyn Any + Send + Sync)> {
        Some(self.as_native_any())
    }
}

impl<T: Send + Sync + 'static> FromNative<T> for Wrapper<T> {
    fn from_native(native: Arc<T>) -> Self {
        Self::borrowed(native)
    }
}
