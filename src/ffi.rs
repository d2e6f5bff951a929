//! FFI bindings for Region Flux
//!
//! This module provides C-compatible functions for calling Flux from other languages.
//! All functions use C strings (null-terminated) and return allocated memory that
//! must be freed by the caller using `rflux_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::config::{AnalyzerConfig, DEFAULT_GAP_THRESHOLD_SECS};
use crate::pipeline::{analyze_readings, RegionAnalyzer};

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Set the last error message
fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Clear the last error message
fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

// ============================================================================
// Stateless API
// ============================================================================

/// Analyze a JSON array of readings and return the report JSON.
///
/// # Safety
/// - `readings_json` must be a valid null-terminated C string.
/// - `aliases_json` must be a valid null-terminated C string or NULL (no aliases).
/// - Returns a newly allocated string that must be freed with `rflux_free_string`.
/// - Returns NULL on error; call `rflux_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn rflux_analyze(
    readings_json: *const c_char,
    aliases_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let readings = match cstr_to_string(readings_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid readings string pointer");
            return ptr::null_mut();
        }
    };

    let aliases = if aliases_json.is_null() {
        None
    } else {
        match cstr_to_string(aliases_json) {
            Some(s) => Some(s),
            None => {
                set_last_error("Invalid aliases string pointer");
                return ptr::null_mut();
            }
        }
    };

    match analyze_readings(readings, aliases) {
        Ok(report) => string_to_cstr(&report),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Stateful Analyzer API
// ============================================================================

/// Opaque handle to a RegionAnalyzer
pub struct RegionAnalyzerHandle {
    analyzer: RegionAnalyzer,
}

/// Create a new RegionAnalyzer with the given gap threshold in seconds.
///
/// # Safety
/// - Returns a pointer to a newly allocated RegionAnalyzer.
/// - Must be freed with `rflux_analyzer_free`.
/// - A negative threshold selects the default of 300 seconds.
#[no_mangle]
pub unsafe extern "C" fn rflux_analyzer_new(gap_threshold_secs: i64) -> *mut RegionAnalyzerHandle {
    clear_last_error();

    let gap_secs = if gap_threshold_secs < 0 {
        DEFAULT_GAP_THRESHOLD_SECS
    } else {
        gap_threshold_secs
    };

    match RegionAnalyzer::with_config(AnalyzerConfig::with_gap_secs(gap_secs)) {
        Ok(analyzer) => Box::into_raw(Box::new(RegionAnalyzerHandle { analyzer })),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Free a RegionAnalyzer.
///
/// # Safety
/// - `analyzer` must be a valid pointer returned by `rflux_analyzer_new`.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn rflux_analyzer_free(analyzer: *mut RegionAnalyzerHandle) {
    if !analyzer.is_null() {
        drop(Box::from_raw(analyzer));
    }
}

/// Analyze a JSON array of readings with a stateful analyzer.
///
/// # Safety
/// - `analyzer` must be a valid pointer returned by `rflux_analyzer_new`.
/// - `readings_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `rflux_free_string`.
/// - Returns NULL on error; call `rflux_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn rflux_analyzer_process(
    analyzer: *mut RegionAnalyzerHandle,
    readings_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if analyzer.is_null() {
        set_last_error("Null analyzer pointer");
        return ptr::null_mut();
    }

    let handle = &*analyzer;

    let readings = match cstr_to_string(readings_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid readings string pointer");
            return ptr::null_mut();
        }
    };

    match handle.analyzer.process(&readings) {
        Ok(report) => string_to_cstr(&report),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Set the display timezone of a stateful analyzer (`UTC`, `+05:30`, ...).
///
/// # Safety
/// - `analyzer` must be a valid pointer returned by `rflux_analyzer_new`.
/// - `timezone` must be a valid null-terminated C string.
/// - Returns 0 on success, non-zero on error.
#[no_mangle]
pub unsafe extern "C" fn rflux_analyzer_set_timezone(
    analyzer: *mut RegionAnalyzerHandle,
    timezone: *const c_char,
) -> i32 {
    clear_last_error();

    if analyzer.is_null() {
        set_last_error("Null analyzer pointer");
        return -1;
    }

    let handle = &mut *analyzer;

    let tz_str = match cstr_to_string(timezone) {
        Some(s) => s,
        None => {
            set_last_error("Invalid timezone string pointer");
            return -1;
        }
    };

    match handle.analyzer.set_timezone(&tz_str) {
        Ok(()) => 0,
        Err(e) => {
            set_last_error(&e.to_string());
            -1
        }
    }
}

/// Save the analyzer's alias table to JSON.
///
/// # Safety
/// - `analyzer` must be a valid pointer returned by `rflux_analyzer_new`.
/// - Returns a newly allocated string that must be freed with `rflux_free_string`.
/// - Returns NULL on error; call `rflux_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn rflux_analyzer_save_aliases(
    analyzer: *mut RegionAnalyzerHandle,
) -> *mut c_char {
    clear_last_error();

    if analyzer.is_null() {
        set_last_error("Null analyzer pointer");
        return ptr::null_mut();
    }

    let handle = &*analyzer;

    match handle.analyzer.save_aliases() {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Replace the analyzer's alias table from JSON.
///
/// # Safety
/// - `analyzer` must be a valid pointer returned by `rflux_analyzer_new`.
/// - `json` must be a valid null-terminated C string.
/// - Returns 0 on success, non-zero on error.
/// - On error, call `rflux_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn rflux_analyzer_load_aliases(
    analyzer: *mut RegionAnalyzerHandle,
    json: *const c_char,
) -> i32 {
    clear_last_error();

    if analyzer.is_null() {
        set_last_error("Null analyzer pointer");
        return -1;
    }

    let handle = &mut *analyzer;

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return -1;
        }
    };

    match handle.analyzer.load_aliases(&json_str) {
        Ok(()) => 0,
        Err(e) => {
            set_last_error(&e.to_string());
            -1
        }
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by Flux functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a Flux function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn rflux_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next Flux function call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn rflux_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the Flux library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn rflux_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    fn sample_readings_json() -> CString {
        CString::new(
            r#"[
            {"timestamp": "2024-11-23T10:00:00Z", "location": "Jersey City, NJ", "accuracy": 10},
            {"timestamp": "2024-11-23T10:01:00Z", "location": "Jersey City, NJ", "accuracy": 12},
            {"timestamp": "2024-11-23T10:02:00Z", "location": "New York - NY/USA", "accuracy": 15}
        ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_ffi_analyze() {
        let json = sample_readings_json();
        let aliases = CString::new(r#"{"NY": ["NEW YORK", "USA"]}"#).unwrap();

        unsafe {
            let result = rflux_analyze(json.as_ptr(), aliases.as_ptr());
            assert!(!result.is_null());

            let result_str = CStr::from_ptr(result).to_str().unwrap();
            let payload: serde_json::Value = serde_json::from_str(result_str).unwrap();
            assert_eq!(payload["analysis"][1]["region"], "NY");

            rflux_free_string(result);
        }
    }

    #[test]
    fn test_ffi_analyze_without_aliases() {
        let json = sample_readings_json();

        unsafe {
            let result = rflux_analyze(json.as_ptr(), ptr::null());
            assert!(!result.is_null());

            let result_str = CStr::from_ptr(result).to_str().unwrap();
            assert!(result_str.contains("\"USA\""));

            rflux_free_string(result);
        }
    }

    #[test]
    fn test_ffi_analyzer_lifecycle() {
        unsafe {
            let analyzer = rflux_analyzer_new(600);
            assert!(!analyzer.is_null());

            let aliases = CString::new(r#"{"NY": ["USA"]}"#).unwrap();
            assert_eq!(rflux_analyzer_load_aliases(analyzer, aliases.as_ptr()), 0);

            let tz = CString::new("-05:00").unwrap();
            assert_eq!(rflux_analyzer_set_timezone(analyzer, tz.as_ptr()), 0);

            let json = sample_readings_json();
            let result = rflux_analyzer_process(analyzer, json.as_ptr());
            assert!(!result.is_null());
            let result_str = CStr::from_ptr(result).to_str().unwrap();
            assert!(result_str.contains("2024-11-23T05:00:00-05:00"));
            rflux_free_string(result);

            let saved = rflux_analyzer_save_aliases(analyzer);
            assert!(!saved.is_null());

            let analyzer2 = rflux_analyzer_new(-1);
            assert_eq!(rflux_analyzer_load_aliases(analyzer2, saved), 0);

            rflux_free_string(saved);
            rflux_analyzer_free(analyzer);
            rflux_analyzer_free(analyzer2);
        }
    }

    #[test]
    fn test_ffi_error_handling() {
        unsafe {
            let invalid_json = CString::new("not json").unwrap();

            let result = rflux_analyze(invalid_json.as_ptr(), ptr::null());
            assert!(result.is_null());

            let error = rflux_last_error();
            assert!(!error.is_null());

            let error_str = CStr::from_ptr(error).to_str().unwrap();
            assert!(!error_str.is_empty());

            let bad_tz = CString::new("Mars/Olympus").unwrap();
            let analyzer = rflux_analyzer_new(300);
            assert_eq!(rflux_analyzer_set_timezone(analyzer, bad_tz.as_ptr()), -1);
            rflux_analyzer_free(analyzer);

            assert!(rflux_analyzer_process(ptr::null_mut(), invalid_json.as_ptr()).is_null());
        }
    }

    #[test]
    fn test_ffi_version() {
        unsafe {
            let version = rflux_version();
            assert!(!version.is_null());

            let version_str = CStr::from_ptr(version).to_str().unwrap();
            assert!(!version_str.is_empty());
        }
    }
}
