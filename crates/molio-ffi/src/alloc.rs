//! Handle allocation.
//!
//! Handles given to C callers are boxed values. Allocation goes through
//! [`new_handle`], which tests can make fail on demand with
//! [`fail_next_allocation`] to exercise the out-of-memory path of every
//! constructor.

use molio::Error;
use std::cell::Cell;

thread_local! {
    static FAIL_NEXT_ALLOCATION: Cell<bool> = const { Cell::new(false) };
}

/// Makes the next handle allocation on the calling thread fail with a memory
/// error.
#[doc(hidden)]
pub fn fail_next_allocation() {
    FAIL_NEXT_ALLOCATION.with(|fail| fail.set(true));
}

/// Builds a value and moves it to the heap, returning the owning pointer.
///
/// Nothing is built when the allocation is set to fail.
pub(crate) fn new_handle<T, F>(build: F) -> molio::Result<*mut T>
where
    F: FnOnce() -> molio::Result<T>,
{
    if FAIL_NEXT_ALLOCATION.with(|fail| fail.replace(false)) {
        return Err(Error::Memory(format!(
            "could not allocate a {}",
            short_type_name::<T>()
        )));
    }
    let value = build()?;
    Ok(Box::into_raw(Box::new(value)))
}

/// Releases a handle created by [`new_handle`]. NULL is ignored.
///
/// # Safety
///
/// `ptr` must be NULL or come from [`new_handle`] with the same `T`, and must
/// not be used afterwards.
pub(crate) unsafe fn free_handle<T>(ptr: *mut T) {
    if !ptr.is_null() {
        drop(unsafe { Box::from_raw(ptr) });
    }
}

fn short_type_name<T>() -> &'static str {
    let name = std::any::type_name::<T>();
    name.rsplit("::").next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn injected_failure_is_one_shot() {
        fail_next_allocation();
        let error = new_handle(|| Ok(42u32)).unwrap_err();
        assert!(matches!(error, Error::Memory(_)));
        assert!(error.to_string().contains("u32"));

        let ptr = new_handle(|| Ok(42u32)).unwrap();
        assert_eq!(unsafe { *ptr }, 42);
        unsafe { free_handle(ptr) };
    }

    #[test]
    fn build_is_skipped_on_injected_failure() {
        fail_next_allocation();
        let mut built = false;
        let result = new_handle(|| {
            built = true;
            Ok(())
        });
        assert!(result.is_err());
        assert!(!built);
    }

    #[test]
    fn build_errors_propagate() {
        let result: molio::Result<*mut u8> =
            new_handle(|| Err(Error::InvalidArgument("nope".into())));
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn freeing_null_is_a_no_op() {
        unsafe { free_handle(std::ptr::null_mut::<u8>()) };
    }
}
