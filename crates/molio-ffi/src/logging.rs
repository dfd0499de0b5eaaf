//! Logging entry points.
//!
//! These functions configure the process-wide logger shared by every thread.
//! Errors reported by the other entry points go through it at the
//! `MOLIO_LOG_ERROR` level.

use crate::status::{catch, check_not_null, molio_status_t};
use molio::logging::{self, LogLevel, LoggingConfig};
use molio::Error;
use std::ffi::{CStr, CString, c_char};
use std::path::PathBuf;
use tracing::debug;

#[repr(C)]
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum molio_log_level_t {
    MOLIO_LOG_ERROR = 0,
    MOLIO_LOG_WARNING = 1,
    MOLIO_LOG_INFO = 2,
    MOLIO_LOG_DEBUG = 3,
    MOLIO_LOG_TRACE = 4,
}

impl From<LogLevel> for molio_log_level_t {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => molio_log_level_t::MOLIO_LOG_ERROR,
            LogLevel::Warning => molio_log_level_t::MOLIO_LOG_WARNING,
            LogLevel::Info => molio_log_level_t::MOLIO_LOG_INFO,
            LogLevel::Debug => molio_log_level_t::MOLIO_LOG_DEBUG,
            LogLevel::Trace => molio_log_level_t::MOLIO_LOG_TRACE,
        }
    }
}

impl From<molio_log_level_t> for LogLevel {
    fn from(level: molio_log_level_t) -> Self {
        match level {
            molio_log_level_t::MOLIO_LOG_ERROR => LogLevel::Error,
            molio_log_level_t::MOLIO_LOG_WARNING => LogLevel::Warning,
            molio_log_level_t::MOLIO_LOG_INFO => LogLevel::Info,
            molio_log_level_t::MOLIO_LOG_DEBUG => LogLevel::Debug,
            molio_log_level_t::MOLIO_LOG_TRACE => LogLevel::Trace,
        }
    }
}

/// Callback receiving log messages. The message is only valid during the call.
///
/// The callback must not call back into molio.
#[allow(non_camel_case_types)]
pub type molio_logging_cb = Option<unsafe extern "C" fn(molio_log_level_t, *const c_char)>;

unsafe fn path_from_c(path: *const c_char) -> molio::Result<PathBuf> {
    check_not_null(path, "path")?;
    let path = unsafe { CStr::from_ptr(path) };
    let path = path.to_str().map_err(|e| {
        Error::InvalidArgument(format!("path is not valid UTF-8: {e}"))
    })?;
    Ok(PathBuf::from(path))
}

/// Writes the current log level in `level`.
///
/// # Safety
///
/// `level` must be NULL or point to a writable `molio_log_level_t`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn molio_loglevel(level: *mut molio_log_level_t) -> molio_status_t {
    catch(|| {
        check_not_null(level, "level")?;
        unsafe { *level = logging::level().into() };
        Ok(())
    })
}

/// Sets the log level. Messages less important than `level` are discarded.
#[unsafe(no_mangle)]
pub extern "C" fn molio_set_loglevel(level: molio_log_level_t) -> molio_status_t {
    catch(|| {
        logging::set_level(level.into());
        Ok(())
    })
}

/// Appends log messages to the file at `path`, creating it if needed.
///
/// Fails with `MOLIO_FILE_ERROR` if the file can not be opened, in which case
/// the previous destination stays active.
///
/// # Safety
///
/// `path` must be NULL or a NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn molio_logfile(path: *const c_char) -> molio_status_t {
    catch(|| {
        let path = unsafe { path_from_c(path) }?;
        logging::to_file(&path)?;
        debug!("Logging to file {}", path.display());
        Ok(())
    })
}

/// Sends log messages to the standard output.
#[unsafe(no_mangle)]
pub extern "C" fn molio_log_stdout() -> molio_status_t {
    catch(|| {
        logging::to_stdout();
        Ok(())
    })
}

/// Sends log messages to the standard error. This is the default.
#[unsafe(no_mangle)]
pub extern "C" fn molio_log_stderr() -> molio_status_t {
    catch(|| {
        logging::to_stderr();
        Ok(())
    })
}

/// Discards all log messages.
#[unsafe(no_mangle)]
pub extern "C" fn molio_log_silent() -> molio_status_t {
    catch(|| {
        logging::silent();
        Ok(())
    })
}

/// Sends log messages to `callback`.
#[unsafe(no_mangle)]
pub extern "C" fn molio_log_callback(callback: molio_logging_cb) -> molio_status_t {
    catch(|| {
        let callback = callback.ok_or_else(|| {
            Error::InvalidArgument("parameter 'callback' can not be NULL".into())
        })?;
        logging::to_callback(move |level, message| {
            let message = CString::new(message.replace('\0', "\\0")).unwrap_or_default();
            unsafe { callback(level.into(), message.as_ptr()) };
        });
        Ok(())
    })
}

/// Configures the logger from the TOML file at `path`.
///
/// Fails with `MOLIO_FILE_ERROR` if the file can not be read, and with
/// `MOLIO_FORMAT_ERROR` if it is not a valid configuration.
///
/// # Safety
///
/// `path` must be NULL or a NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn molio_log_config(path: *const c_char) -> molio_status_t {
    catch(|| {
        let path = unsafe { path_from_c(path) }?;
        LoggingConfig::from_path(&path)?.apply()
    })
}
