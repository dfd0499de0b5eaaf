use molio_ffi::molio_log_level_t::*;
use molio_ffi::molio_status_t::*;
use molio_ffi::*;
use serial_test::serial;
use std::ffi::{CStr, CString, c_char};
use std::sync::Mutex;

static RECEIVED: Mutex<Vec<(molio_log_level_t, String)>> = Mutex::new(Vec::new());

unsafe extern "C" fn record(level: molio_log_level_t, message: *const c_char) {
    let message = unsafe { CStr::from_ptr(message) }
        .to_string_lossy()
        .into_owned();
    RECEIVED
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .push((level, message));
}

fn take_received() -> Vec<(molio_log_level_t, String)> {
    std::mem::take(&mut *RECEIVED.lock().unwrap_or_else(|e| e.into_inner()))
}

fn reset() {
    assert_eq!(molio_set_loglevel(MOLIO_LOG_WARNING), MOLIO_SUCCESS);
    assert_eq!(molio_log_stderr(), MOLIO_SUCCESS);
    take_received();
}

fn c_path(path: &std::path::Path) -> CString {
    CString::new(path.to_str().unwrap()).unwrap()
}

#[test]
#[serial]
fn level_round_trips() {
    reset();
    let mut level = MOLIO_LOG_ERROR;
    unsafe {
        assert_eq!(molio_loglevel(&mut level), MOLIO_SUCCESS);
    }
    assert_eq!(level, MOLIO_LOG_WARNING);

    assert_eq!(molio_set_loglevel(MOLIO_LOG_DEBUG), MOLIO_SUCCESS);
    unsafe {
        assert_eq!(molio_loglevel(&mut level), MOLIO_SUCCESS);
    }
    assert_eq!(level, MOLIO_LOG_DEBUG);
    reset();
}

#[test]
#[serial]
fn failures_are_sent_to_the_callback() {
    reset();
    assert_eq!(molio_log_callback(Some(record)), MOLIO_SUCCESS);

    unsafe {
        let cell = molio_cell(&[2.0, 3.0, 4.0]);
        assert_eq!(
            molio_cell_set_angles(cell, &[80.0, 80.0, 80.0]),
            MOLIO_GENERIC_ERROR
        );
        molio_cell_free(cell);
    }

    let received = take_received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].0, MOLIO_LOG_ERROR);
    assert!(received[0].1.contains("make it triclinic first"));
    reset();
}

#[test]
#[serial]
fn null_callback_is_rejected() {
    reset();
    assert_eq!(molio_log_callback(None), MOLIO_GENERIC_ERROR);
    reset();
}

#[test]
#[serial]
fn silent_sink_receives_nothing() {
    reset();
    assert_eq!(molio_log_callback(Some(record)), MOLIO_SUCCESS);
    assert_eq!(molio_log_silent(), MOLIO_SUCCESS);
    unsafe {
        assert!(molio_cell(std::ptr::null()).is_null());
    }
    assert!(take_received().is_empty());
    reset();
}

#[test]
#[serial]
fn log_file_receives_errors() {
    reset();
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("molio.log");
    let c_path = c_path(&path);

    unsafe {
        assert_eq!(molio_logfile(c_path.as_ptr()), MOLIO_SUCCESS);
        assert!(molio_cell(&[-1.0, 0.0, 0.0]).is_null());
    }
    assert_eq!(molio_log_stdout(), MOLIO_SUCCESS);

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 1);
    assert!(content.contains("ERROR"));
    assert!(content.contains("Invalid argument: unit cell lengths"));
    reset();
}

#[test]
#[serial]
fn unopenable_log_file_is_a_file_error() {
    reset();
    let temp_dir = tempfile::tempdir().unwrap();
    let path = c_path(&temp_dir.path().join("missing").join("molio.log"));
    unsafe {
        assert_eq!(molio_logfile(path.as_ptr()), MOLIO_FILE_ERROR);
        assert_eq!(molio_logfile(std::ptr::null()), MOLIO_GENERIC_ERROR);
    }
    let message = unsafe { CStr::from_ptr(molio_last_error()) };
    assert!(message.to_string_lossy().contains("'path'"));
    reset();
}

#[test]
#[serial]
fn configuration_file_sets_level_and_target() {
    reset();
    let temp_dir = tempfile::tempdir().unwrap();
    let config = temp_dir.path().join("molio.toml");
    std::fs::write(&config, "level = \"trace\"\ntarget = \"silent\"\n").unwrap();

    unsafe {
        assert_eq!(molio_log_config(c_path(&config).as_ptr()), MOLIO_SUCCESS);
        let mut level = MOLIO_LOG_ERROR;
        assert_eq!(molio_loglevel(&mut level), MOLIO_SUCCESS);
        assert_eq!(level, MOLIO_LOG_TRACE);

        std::fs::write(&config, "level = [").unwrap();
        assert_eq!(
            molio_log_config(c_path(&config).as_ptr()),
            MOLIO_FORMAT_ERROR
        );
        let missing = temp_dir.path().join("nothing.toml");
        assert_eq!(molio_log_config(c_path(&missing).as_ptr()), MOLIO_FILE_ERROR);
    }
    reset();
}
