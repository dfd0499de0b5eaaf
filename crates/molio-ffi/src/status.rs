//! Status codes and the failure-catching boundary.
//!
//! Every entry point runs its body through [`catch`]. Errors coming out of the
//! core crate and panics are both turned into a [`molio_status_t`]; the
//! message is stored as the last error of the calling thread and sent to the
//! global logger at the error level.
//!
//! The last error is thread-local: [`molio_last_error`] returns the message of
//! the most recent failure on the thread calling it.
//!
//! While an entry point runs, `tracing` events of the calling thread go to the
//! molio logger through [`logging::dispatcher`]. No global subscriber is ever
//! installed, so a Rust host linking this crate keeps its own.

use molio::logging::{self, LogLevel};
use molio::{Error, ErrorKind};
use phf::phf_map;
use std::any::Any;
use std::cell::RefCell;
use std::ffi::{CStr, CString, c_char, c_int};
use std::panic::{self, AssertUnwindSafe};

/// Status code returned by every fallible entry point.
#[repr(C)]
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum molio_status_t {
    MOLIO_SUCCESS = 0,
    MOLIO_MEMORY_ERROR = 1,
    MOLIO_FILE_ERROR = 2,
    MOLIO_FORMAT_ERROR = 3,
    MOLIO_SELECTION_ERROR = 4,
    MOLIO_GENERIC_ERROR = 5,
    MOLIO_INTERNAL_ERROR = 6,
}

static STATUS_MESSAGES: phf::Map<i32, &'static CStr> = phf_map! {
    0i32 => c"operation was successful",
    1i32 => c"memory allocation error",
    2i32 => c"system error while reading or writing a file",
    3i32 => c"error while parsing a file",
    4i32 => c"error in selection parsing or evaluation",
    5i32 => c"unknown error from molio",
    6i32 => c"internal error in the molio runtime",
};

impl From<ErrorKind> for molio_status_t {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Memory => molio_status_t::MOLIO_MEMORY_ERROR,
            ErrorKind::File => molio_status_t::MOLIO_FILE_ERROR,
            ErrorKind::Format => molio_status_t::MOLIO_FORMAT_ERROR,
            ErrorKind::Selection => molio_status_t::MOLIO_SELECTION_ERROR,
            ErrorKind::InvalidOperation | ErrorKind::Generic => molio_status_t::MOLIO_GENERIC_ERROR,
        }
    }
}

thread_local! {
    static LAST_ERROR: RefCell<CString> = RefCell::new(CString::default());
}

pub(crate) fn set_last_error(message: &str) {
    let message = CString::new(message.replace('\0', "\\0")).unwrap_or_default();
    LAST_ERROR.with(|last| *last.borrow_mut() = message);
}

/// The last error message of the calling thread, empty if there is none.
pub fn last_error() -> String {
    LAST_ERROR.with(|last| last.borrow().to_string_lossy().into_owned())
}

pub(crate) fn clear_last_error() {
    LAST_ERROR.with(|last| *last.borrow_mut() = CString::default());
}

/// Runs `operation`, converting any failure into a status code.
///
/// On success the last error is left untouched.
pub(crate) fn catch<F>(operation: F) -> molio_status_t
where
    F: FnOnce() -> molio::Result<()>,
{
    tracing::dispatcher::with_default(logging::dispatcher(), || catch_scoped(operation))
}

fn catch_scoped<F>(operation: F) -> molio_status_t
where
    F: FnOnce() -> molio::Result<()>,
{
    match panic::catch_unwind(AssertUnwindSafe(operation)) {
        Ok(Ok(())) => molio_status_t::MOLIO_SUCCESS,
        Ok(Err(error)) => report(error.kind().into(), &error.to_string()),
        Err(payload) => {
            let message = format!("internal error: {}", panic_message(payload.as_ref()));
            let status = report(molio_status_t::MOLIO_INTERNAL_ERROR, &message);
            let dropped = panic::catch_unwind(AssertUnwindSafe(move || drop(payload)));
            if dropped.is_err() {
                molio_status_t::MOLIO_GENERIC_ERROR
            } else {
                status
            }
        }
    }
}

/// Records a failure. A panic while recording is reported as a generic error.
fn report(status: molio_status_t, message: &str) -> molio_status_t {
    let recorded = panic::catch_unwind(|| {
        set_last_error(message);
        logging::log(LogLevel::Error, message);
    });
    match recorded {
        Ok(()) => status,
        Err(payload) => {
            std::mem::forget(payload);
            molio_status_t::MOLIO_GENERIC_ERROR
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic payload"
    }
}

/// Fails with a generic error when `ptr` is NULL.
pub(crate) fn check_not_null<T>(ptr: *const T, name: &str) -> molio::Result<()> {
    if ptr.is_null() {
        Err(Error::InvalidArgument(format!(
            "parameter '{name}' can not be NULL"
        )))
    } else {
        Ok(())
    }
}

/// Returns a static description of a status code.
///
/// Unknown codes get an empty string. The returned string must not be freed.
#[unsafe(no_mangle)]
pub extern "C" fn molio_strerror(status: c_int) -> *const c_char {
    STATUS_MESSAGES
        .get(&status)
        .copied()
        .unwrap_or(c"")
        .as_ptr()
}

/// Returns the message of the last failure on the calling thread.
///
/// The pointer stays valid until the next failure or [`molio_clear_errors`] on
/// this thread. It must not be freed.
#[unsafe(no_mangle)]
pub extern "C" fn molio_last_error() -> *const c_char {
    LAST_ERROR.with(|last| last.borrow().as_ptr())
}

/// Clears the last error message of the calling thread.
#[unsafe(no_mangle)]
pub extern "C" fn molio_clear_errors() -> molio_status_t {
    catch(|| {
        clear_last_error();
        Ok(())
    })
}
