//! # molio C API
//!
//! `extern "C"` entry points over the [`molio`] core crate. Every function
//! follows the same rules:
//!
//! 1. **Return a [`molio_status_t`]**, or a pointer for constructors. Failed
//!    constructors return NULL.
//! 2. **Run inside [`status`]'s boundary**, so neither errors nor panics escape
//!    as anything but a status code. The failure message is kept as the last
//!    error of the calling thread, see [`molio_last_error`].
//! 3. **Validate pointer arguments** before dereferencing them.
//!
//! Handles returned by constructors belong to the caller, who must release
//! each of them exactly once with the matching `_free` function.
//!
//! Calling into this crate never installs a global `tracing` subscriber.
//! Events emitted during a call are routed to the molio logger for the
//! duration of that call only.

mod alloc;
pub mod cell;
pub mod frame;
pub mod logging;
pub mod status;

pub use alloc::fail_next_allocation;
pub use cell::*;
pub use frame::*;
pub use logging::*;
pub use status::{molio_clear_errors, molio_last_error, molio_status_t, molio_strerror};

use std::ffi::{CStr, c_char};

const VERSION: &CStr = match CStr::from_bytes_with_nul(
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes(),
) {
    Ok(version) => version,
    Err(_) => panic!("the package version contains a NUL byte"),
};

/// Returns the version of the molio library. The string must not be freed.
#[unsafe(no_mangle)]
pub extern "C" fn molio_version() -> *const c_char {
    VERSION.as_ptr()
}
