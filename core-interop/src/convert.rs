//! # Conversion Functions
//!
//! Map between native objects and their interface-typed wrappers.
//!
//! - [`wrap`] always builds a new wrapper; nothing is cached, so only the
//!   native identity survives a round trip: `unwrap(wrap(x))` is `x`.
//! - [`unwrap`] only accepts values whose [`Adapter::raw_native_any`] exposes
//!   the expected native type. Hand-written implementations of an interface
//!   (mocks, fakes) are rejected with
//!   [`InteropError::UnsupportedImplementation`].
//! - The `_all` variants preserve order and length. Nullable variants map
//!   `None` to `None`; `_required` variants report the first `None` as
//!   [`InteropError::NullElementInNonNullableSequence`].
//!
//! None of these functions perform I/O; they only move references around.

use std::any::{type_name, Any};
use std::sync::Arc;

use crate::error::{InteropError, Result};

/// Raw-accessor contract shared by every interface in the workspace.
///
/// Wrapper-backed adapters override [`raw_native_any`](Self::raw_native_any)
/// to return the held `Arc<Native>`. Any other implementation keeps the
/// default and cannot be unwrapped.
pub trait Adapter: Send + Sync {
    fn raw_native_any(&self) -> Option<&(dyn Any + Send + Sync)> {
        None
    }
}

/// Construct an adapter around a native value returned by a native call.
pub trait FromNative<N>: Sized {
    fn from_native(native: Arc<N>) -> Self;
}

/// Wrap a native value. `None` maps to `None`.
pub fn wrap<N, W>(native: Option<Arc<N>>) -> Option<W>
where
    W: FromNative<N>,
{
    native.map(W::from_native)
}

/// Recover the native object behind an interface value. `None` maps to
/// `Ok(None)`.
pub fn unwrap<N, I>(iface: Option<&I>) -> Result<Option<Arc<N>>>
where
    N: Send + Sync + 'static,
    I: Adapter + ?Sized,
{
    iface.map(raw_native_of::<N, I>).transpose()
}

fn raw_native_of<N, I>(iface: &I) -> Result<Arc<N>>
where
    N: Send + Sync + 'static,
    I: Adapter + ?Sized,
{
    iface
        .raw_native_any()
        .and_then(|raw| raw.downcast_ref::<Arc<N>>())
        .cloned()
        .ok_or(InteropError::UnsupportedImplementation {
            native: type_name::<N>(),
        })
}

/// Wrap each element of a sequence whose elements may be absent.
pub fn wrap_all<N, W, S>(natives: S) -> Vec<Option<W>>
where
    W: FromNative<N>,
    S: IntoIterator<Item = Option<Arc<N>>>,
{
    natives.into_iter().map(wrap::<N, W>).collect()
}

/// Wrap each element of a sequence whose elements must all be present.
pub fn wrap_all_required<N, W, S>(natives: S) -> Result<Vec<W>>
where
    W: FromNative<N>,
    S: IntoIterator<Item = Option<Arc<N>>>,
{
    natives
        .into_iter()
        .enumerate()
        .map(|(index, native)| {
            native
                .map(W::from_native)
                .ok_or(InteropError::NullElementInNonNullableSequence { index })
        })
        .collect()
}

/// Unwrap each element of a sequence whose elements may be absent.
pub fn unwrap_all<'a, N, I, S>(ifaces: S) -> Result<Vec<Option<Arc<N>>>>
where
    N: Send + Sync + 'static,
    I: Adapter + ?Sized + 'a,
    S: IntoIterator<Item = Option<&'a I>>,
{
    ifaces.into_iter().map(unwrap::<N, I>).collect()
}

/// Unwrap each element of a sequence whose elements must all be present.
pub fn unwrap_all_required<'a, N, I, S>(ifaces: S) -> Result<Vec<Arc<N>>>
where
    N: Send + Sync + 'static,
    I: Adapter + ?Sized + 'a,
    S: IntoIterator<Item = Option<&'a I>>,
{
    ifaces
        .into_iter()
        .enumerate()
        .map(|(index, iface)| match iface {
            Some(iface) => raw_native_of::<N, I>(iface),
            None => Err(InteropError::NullElementInNonNullableSequence { index }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wrapper::Wrapper;

    #[derive(Debug)]
    struct Stream(u32);

    #[derive(Debug)]
    struct Other;

    struct HandWritten;
    impl Adapter for HandWritten {}

    #[test]
    fn test_wrap_none_is_none() {
        assert!(wrap::<Stream, Wrapper<Stream>>(None).is_none());
    }

    #[test]
    fn test_unwrap_none_is_none() {
        let result = unwrap::<Stream, Wrapper<Stream>>(None).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_round_trip_preserves_identity() {
        let native = Arc::new(Stream(1));
        let wrapper: Wrapper<Stream> = wrap(Some(Arc::clone(&native))).unwrap();
        let back = unwrap::<Stream, _>(Some(&wrapper)).unwrap().unwrap();
        assert!(Arc::ptr_eq(&back, &native));
        assert_eq!(back.0, 1);
    }

    #[test]
    fn test_wrap_allocates_each_time() {
        let native = Arc::new(Stream(1));
        let a: Wrapper<Stream> = wrap(Some(Arc::clone(&native))).unwrap();
        let b: Wrapper<Stream> = wrap(Some(Arc::clone(&native))).unwrap();
        assert!(!std::ptr::eq(&a, &b));
        assert_eq!(a, b);
    }

    #[test]
    fn test_unwrap_rejects_hand_written_impl() {
        let err = unwrap::<Stream, _>(Some(&HandWritten)).unwrap_err();
        assert!(matches!(err, InteropError::UnsupportedImplementation { .. }));
    }

    #[test]
    fn test_unwrap_rejects_wrong_native_type() {
        let wrapper = Wrapper::borrowed(Arc::new(Other));
        let err = unwrap::<Stream, _>(Some(&wrapper)).unwrap_err();
        assert!(matches!(err, InteropError::UnsupportedImplementation { .. }));
    }

    #[test]
    fn test_unwrap_through_trait_object() {
        let native = Arc::new(Stream(9));
        let adapter: Box<dyn Adapter> = Box::new(Wrapper::borrowed(Arc::clone(&native)));
        let back = unwrap::<Stream, dyn Adapter>(Some(adapter.as_ref()))
            .unwrap()
            .unwrap();
        assert!(Arc::ptr_eq(&back, &native));
    }

    #[test]
    fn test_wrap_all_keeps_nulls_in_place() {
        let a = Arc::new(Stream(1));
        let b = Arc::new(Stream(2));
        let wrapped: Vec<Option<Wrapper<Stream>>> =
            wrap_all(vec![Some(Arc::clone(&a)), None, Some(Arc::clone(&b))]);

        assert_eq!(wrapped.len(), 3);
        assert!(Arc::ptr_eq(wrapped[0].as_ref().unwrap().raw_native(), &a));
        assert!(wrapped[1].is_none());
        assert!(Arc::ptr_eq(wrapped[2].as_ref().unwrap().raw_native(), &b));
    }

    #[test]
    fn test_wrap_all_required_rejects_null() {
        let result: Result<Vec<Wrapper<Stream>>> = wrap_all_required(vec![
            Some(Arc::new(Stream(1))),
            None,
            Some(Arc::new(Stream(2))),
        ]);
        assert!(matches!(
            result,
            Err(InteropError::NullElementInNonNullableSequence { index: 1 })
        ));
    }

    #[test]
    fn test_wrap_all_required_preserves_order() {
        let wrapped: Vec<Wrapper<Stream>> = wrap_all_required(
            (0..4).map(|n| Some(Arc::new(Stream(n)))),
        )
        .unwrap();
        let values: Vec<u32> = wrapped.iter().map(|w| w.raw_native().0).collect();
        assert_eq!(values, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_unwrap_all_nullable() {
        let a = Wrapper::borrowed(Arc::new(Stream(1)));
        let natives = unwrap_all::<Stream, _, _>(vec![Some(&a), None]).unwrap();
        assert_eq!(natives.len(), 2);
        assert!(Arc::ptr_eq(natives[0].as_ref().unwrap(), a.raw_native()));
        assert!(natives[1].is_none());
    }

    #[test]
    fn test_unwrap_all_required() {
        let a = Wrapper::borrowed(Arc::new(Stream(1)));
        let b = Wrapper::borrowed(Arc::new(Stream(2)));

        let natives = unwrap_all_required::<Stream, _, _>(vec![Some(&a), Some(&b)]).unwrap();
        assert_eq!(natives.iter().map(|n| n.0).collect::<Vec<_>>(), vec![1, 2]);

        let err = unwrap_all_required::<Stream, _, _>(vec![Some(&a), None]).unwrap_err();
        assert!(matches!(
            err,
            InteropError::NullElementInNonNullableSequence { index: 1 }
        ));
    }

    #[test]
    fn test_unwrap_all_propagates_unsupported() {
        let hand_written: Vec<Option<&dyn Adapter>> = vec![None, Some(&HandWritten as &dyn Adapter)];
        let err = unwrap_all::<Stream, dyn Adapter, _>(hand_written).unwrap_err();
        assert!(matches!(err, InteropError::UnsupportedImplementation { .. }));
    }
}
