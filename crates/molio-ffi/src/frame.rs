//! Frame entry points.
//!
//! Only the cell-related parts of a frame are exposed here. Frame handles
//! follow the same ownership rules as cell handles.

use crate::alloc::{free_handle, new_handle};
use crate::cell::molio_cell_t;
use crate::status::{catch, check_not_null, molio_status_t};
use molio::{CellProvider, Frame};
use std::ptr;

/// Opaque handle to a frame.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Default)]
pub struct molio_frame_t {
    pub(crate) inner: Frame,
}

/// Creates an empty frame with an infinite cell. Returns NULL on failure.
#[unsafe(no_mangle)]
pub extern "C" fn molio_frame() -> *mut molio_frame_t {
    let mut frame = ptr::null_mut();
    catch(|| {
        frame = new_handle(|| Ok(molio_frame_t::default()))?;
        Ok(())
    });
    frame
}

/// Releases a frame handle. NULL is ignored.
///
/// # Safety
///
/// `frame` must be NULL or a live frame handle, and must not be used
/// afterwards. Releasing the same handle twice is undefined behavior.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn molio_frame_free(frame: *mut molio_frame_t) {
    unsafe { free_handle(frame) };
}

/// Replaces the cell of `frame` with a copy of `cell`.
///
/// # Safety
///
/// `frame` and `cell` must be NULL or live handles.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn molio_frame_set_cell(
    frame: *mut molio_frame_t,
    cell: *const molio_cell_t,
) -> molio_status_t {
    catch(|| {
        check_not_null(frame, "frame")?;
        check_not_null(cell, "cell")?;
        let cell = unsafe { &*cell }.inner.clone();
        unsafe { (*frame).inner.set_cell(cell) };
        Ok(())
    })
}

/// Writes the simulation step of `frame` in `step`.
///
/// # Safety
///
/// `frame` must be NULL or a live frame handle, `step` must be NULL or point
/// to a writable `u64`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn molio_frame_step(
    frame: *const molio_frame_t,
    step: *mut u64,
) -> molio_status_t {
    catch(|| {
        check_not_null(frame, "frame")?;
        check_not_null(step, "step")?;
        unsafe { *step = (*frame).inner.step() as u64 };
        Ok(())
    })
}

/// Sets the simulation step of `frame`.
///
/// # Safety
///
/// `frame` must be NULL or a live frame handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn molio_frame_set_step(
    frame: *mut molio_frame_t,
    step: u64,
) -> molio_status_t {
    catch(|| {
        check_not_null(frame, "frame")?;
        let step = usize::try_from(step).map_err(|_| {
            molio::Error::InvalidArgument(format!("step {step} is too large for this platform"))
        })?;
        unsafe { (*frame).inner.set_step(step) };
        Ok(())
    })
}
