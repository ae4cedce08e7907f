//! Lifecycle operations over ranges of slots.
//!
//! Two strategies are selected at compile time:
//!
//! -   Trivial: `Copy` elements are copied in bulk, and types without drop glue are never visited on destruction.
//! -   General: `Clone` elements are cloned one at a time, in ascending order, and dropped in ascending order.
//!
//! Relocation is always a bulk copy: in Rust, any value may be moved by copying its bytes, after which the source is
//! logically uninitialized.
//!
//! Construction is panic-safe: should the construction of an element panic, the elements already constructed by the
//! call are dropped before unwinding further, leaving the destination range uninitialized.

use core::{mem, ptr};

/// Returns whether elements of type `T` may be destroyed without running any code.
#[inline(always)]
pub const fn is_trivially_destructible<T>() -> bool {
    !mem::needs_drop::<T>()
}

/// Drops the `len` elements starting at `dst`, in ascending order.
///
/// #   Safety
///
/// -   Initialized: `dst` must point to `len` initialized elements, which are uninitialized afterwards.
/// -   Exclusive: no other reference to these elements may be live.
#[inline]
pub unsafe fn destroy_range<T>(dst: *mut T, len: usize) {
    if is_trivially_destructible::<T>() {
        return;
    }

    //  Safety:
    //  -   `dst` points to `len` initialized elements, as per Initialized pre-condition.
    //  -   No other reference exists, as per Exclusive pre-condition.
    unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(dst, len)) }
}

/// Relocates the `len` elements starting at `src` to the slots starting at `dst`.
///
/// #   Safety
///
/// -   Initialized: `src` must point to `len` initialized elements, which are logically uninitialized afterwards.
/// -   Writeable: `dst` must be valid for writes of `len` elements, and must not overlap with `src`.
#[inline]
pub unsafe fn relocate_range<T>(src: *const T, dst: *mut T, len: usize) {
    //  Safety:
    //  -   `src` is valid for reads of `len` elements, as per Initialized pre-condition.
    //  -   `dst` is valid for writes of `len` elements, and non-overlapping, as per Writeable pre-condition.
    unsafe { ptr::copy_nonoverlapping(src, dst, len) }
}

/// Shifts the `len` elements starting at `src` to the slots starting at `dst`, which may overlap.
///
/// #   Safety
///
/// -   Initialized: `src` must point to `len` initialized elements.
/// -   Writeable: `dst` must be valid for writes of `len` elements.
///
/// The slots of `src` which are not also slots of `dst` are logically uninitialized afterwards.
#[inline]
pub unsafe fn shift_range<T>(src: *const T, dst: *mut T, len: usize) {
    //  Safety:
    //  -   `src` is valid for reads of `len` elements, as per Initialized pre-condition.
    //  -   `dst` is valid for writes of `len` elements, as per Writeable pre-condition.
    unsafe { ptr::copy(src, dst, len) }
}

/// Copies the elements of `src` to the slots starting at `dst`, in bulk.
///
/// #   Safety
///
/// -   Writeable: `dst` must be valid for writes of `src.len()` elements, and must not overlap with `src`.
#[inline]
pub unsafe fn copy_range<T>(src: &[T], dst: *mut T)
where
    T: Copy,
{
    //  Safety:
    //  -   `dst` is valid for writes of `src.len()` elements, and non-overlapping, as per Writeable pre-condition.
    unsafe { relocate_range(src.as_ptr(), dst, src.len()) }
}

/// Clones the elements of `src` to the slots starting at `dst`, one at a time.
///
/// #   Safety
///
/// -   Writeable: `dst` must be valid for writes of `src.len()` elements, and must not overlap with `src`.
#[inline]
pub unsafe fn clone_range<T>(src: &[T], dst: *mut T)
where
    T: Clone,
{
    let mut iter = src.iter();

    let next = || {
        //  Safety:
        //  -   `construct_range_with` calls `next` exactly `src.len()` times.
        let element = unsafe { iter.next().unwrap_unchecked() };

        element.clone()
    };

    //  Safety:
    //  -   `dst` is valid for writes of `src.len()` elements, as per Writeable pre-condition.
    unsafe { construct_range_with(dst, src.len(), next) }
}

/// Constructs `len` clones of `value` in the slots starting at `dst`.
///
/// #   Safety
///
/// -   Writeable: `dst` must be valid for writes of `len` elements, and must not overlap with `value`.
#[inline]
pub unsafe fn fill_range<T>(dst: *mut T, len: usize, value: &T)
where
    T: Clone,
{
    //  Safety:
    //  -   `dst` is valid for writes of `len` elements, as per Writeable pre-condition.
    unsafe { construct_range_with(dst, len, || value.clone()) }
}

/// Constructs `len` elements produced by `f` in the slots starting at `dst`, in ascending order.
///
/// Should `f` panic, the elements constructed so far are dropped.
///
/// #   Safety
///
/// -   Writeable: `dst` must be valid for writes of `len` elements.
pub unsafe fn construct_range_with<T, F>(dst: *mut T, len: usize, mut f: F)
where
    F: FnMut() -> T,
{
    let mut guard = ConstructGuard { dst, len: 0 };

    while guard.len < len {
        let value = f();

        //  Safety:
        //  -   `guard.len < len`, hence in bounds, as per Writeable pre-condition.
        unsafe { dst.add(guard.len).write(value) };

        guard.len += 1;
    }

    mem::forget(guard);
}

//  Drops the elements constructed so far, should a construction panic.
struct ConstructGuard<T> {
    dst: *mut T,
    len: usize,
}

impl<T> Drop for ConstructGuard<T> {
    fn drop(&mut self) {
        //  Safety:
        //  -   Initialized: the first `self.len` elements have been constructed.
        //  -   Exclusive: they were constructed by this call, and are not yet handed over.
        unsafe { destroy_range(self.dst, self.len) }
    }
}

// mod tests
