//! FFI layer for embedding the engine in a native UI.
//!
//! The host owns a [`DrawHandle`] (pool, drawer and command buffer) and
//! drives it from its own timer: call `namedraw_step`, apply the returned
//! surface commands, wait `delayMs`, repeat.
//!
//! # Memory Management
//!
//! - Strings returned by `namedraw_*` functions are allocated by Rust
//! - Caller must free them with `namedraw_string_free`
//! - Handles must be freed with `namedraw_session_free`
//!
//! # Error Handling
//!
//! Functions return JSON with either:
//! - `{"ok": <result>}` on success
//! - `{"error": "<message>"}` on failure

use crate::{
    AnyDrawer, CommandBuffer, DrawCommand, DrawConfig, Drawer, NameRecord, NameStore, Step,
    Strategy,
};
use serde::Serialize;
use std::ffi::{c_char, CStr, CString};
use std::ptr;

/// Everything one embedded draw needs.
#[derive(Debug)]
pub struct DrawHandle {
    store: NameStore,
    drawer: AnyDrawer,
    surface: CommandBuffer,
}

impl DrawHandle {
    pub fn new(
        records: Vec<NameRecord>,
        config: DrawConfig,
        strategy: Strategy,
    ) -> crate::error::Result<Self> {
        Ok(Self {
            store: NameStore::from_records(records)?,
            drawer: AnyDrawer::new(strategy, config)?,
            surface: CommandBuffer::default(),
        })
    }
}

/// One step plus the surface commands it produced.
#[derive(Serialize)]
struct StepReport {
    step: Step,
    commands: Vec<DrawCommand>,
}

/// Result wrapper for FFI responses.
#[derive(Serialize)]
#[serde(untagged)]
enum FfiResult<T: Serialize> {
    Ok { ok: T },
    Err { error: String },
}

impl<T: Serialize> FfiResult<T> {
    fn ok(value: T) -> Self {
        FfiResult::Ok { ok: value }
    }

    fn err(message: impl Into<String>) -> Self {
        FfiResult::Err {
            error: message.into(),
        }
    }

    fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|e| format!(r#"{{"error":"serialization failed: {}"}}"#, e))
    }
}

fn respond<T: Serialize>(result: FfiResult<T>) -> *mut c_char {
    to_c_string(result.to_json())
}

fn fail(message: impl Into<String>) -> *mut c_char {
    respond(FfiResult::<()>::err(message))
}

/// Convert a Rust string to a C string pointer.
/// Caller must free with `namedraw_string_free`.
fn to_c_string(s: String) -> *mut c_char {
    match CString::new(s) {
        Ok(cs) => cs.into_raw(),
        Err(_) => {
            // Interior NUL; the literal below has none
            CString::new(r#"{"error":"string contained null bytes"}"#)
                .map(CString::into_raw)
                .unwrap_or(ptr::null_mut())
        }
    }
}

/// Convert a C string pointer to a Rust string.
/// Returns None if pointer is null or invalid UTF-8.
unsafe fn from_c_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

// ============================================================================
// Session Lifecycle
// ============================================================================

/// Create a draw handle.
///
/// # Arguments
/// - `records_json`: JSON array of NameRecord
/// - `config_json`: JSON DrawConfig, or null for defaults
/// - `strategy`: `"slot"` or `"carousel"`, or null for slot
///
/// # Returns
/// Pointer to DrawHandle, or null on failure.
///
/// # Safety
/// - All string arguments must be valid null-terminated C strings or null
/// - Caller must free the returned pointer with `namedraw_session_free`
#[no_mangle]
pub unsafe extern "C" fn namedraw_session_new(
    records_json: *const c_char,
    config_json: *const c_char,
    strategy: *const c_char,
) -> *mut DrawHandle {
    let Some(records_str) = from_c_string(records_json) else {
        return ptr::null_mut();
    };
    let records: Vec<NameRecord> = match serde_json::from_str(&records_str) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(error = %e, "rejected records JSON");
            return ptr::null_mut();
        }
    };

    let config = match from_c_string(config_json) {
        Some(s) => match serde_json::from_str::<DrawConfig>(&s) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(error = %e, "rejected config JSON");
                return ptr::null_mut();
            }
        },
        None => DrawConfig::default(),
    };

    let strategy = match from_c_string(strategy) {
        Some(s) => match s.parse::<Strategy>() {
            Ok(st) => st,
            Err(_) => return ptr::null_mut(),
        },
        None => Strategy::default(),
    };

    match DrawHandle::new(records, config, strategy) {
        Ok(handle) => Box::into_raw(Box::new(handle)),
        Err(e) => {
            tracing::warn!(error = %e, "could not create draw handle");
            ptr::null_mut()
        }
    }
}

/// Free a draw handle.
///
/// # Safety
/// - `handle` must be a valid pointer from `namedraw_session_new`
/// - Must not be called twice on the same pointer
#[no_mangle]
pub unsafe extern "C" fn namedraw_session_free(handle: *mut DrawHandle) {
    if !handle.is_null() {
        drop(Box::from_raw(handle));
    }
}

/// Free a string allocated by the engine.
///
/// # Safety
/// - `s` must be a valid pointer from a `namedraw_*` function
/// - Must not be called twice on the same pointer
#[no_mangle]
pub unsafe extern "C" fn namedraw_string_free(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

// ============================================================================
// Drawing
// ============================================================================

/// Report the viewport size. Call before `namedraw_start` and on every resize.
///
/// # Returns
/// JSON string: `{"ok": [DrawCommand, ...]}` or `{"error": "message"}`
///
/// # Safety
/// - `handle` must be a valid pointer from `namedraw_session_new` or null
/// - Caller must free the returned string with `namedraw_string_free`
#[no_mangle]
pub unsafe extern "C" fn namedraw_resize(
    handle: *mut DrawHandle,
    width: f64,
    height: f64,
) -> *mut c_char {
    let Some(h) = handle.as_mut() else {
        return fail("null handle pointer");
    };
    h.surface.resize(width, height);
    match h.drawer.resize(&mut h.surface) {
        Ok(_) => respond(FfiResult::ok(h.surface.drain())),
        Err(e) => fail(e.to_string()),
    }
}

/// Start a draw.
///
/// # Returns
/// JSON string: `{"ok": {"started": bool, "reason": Rejection | null, "commands": [...]}}`
///
/// # Safety
/// - `handle` must be a valid pointer from `namedraw_session_new` or null
/// - Caller must free the returned string with `namedraw_string_free`
#[no_mangle]
pub unsafe extern "C" fn namedraw_start(handle: *mut DrawHandle) -> *mut c_char {
    let Some(h) = handle.as_mut() else {
        return fail("null handle pointer");
    };
    match h.drawer.start(&h.store, &mut h.surface) {
        Ok(started) => {
            let reason = if started { None } else { h.drawer.reason() };
            respond(FfiResult::ok(serde_json::json!({
                "started": started,
                "reason": reason,
                "commands": h.surface.drain(),
            })))
        }
        Err(e) => fail(e.to_string()),
    }
}

/// Request a stop. Returns 1 if a running session accepted it, 0 otherwise.
///
/// # Safety
/// - `handle` must be a valid pointer from `namedraw_session_new` or null
#[no_mangle]
pub unsafe extern "C" fn namedraw_stop(handle: *mut DrawHandle) -> i32 {
    match handle.as_mut() {
        Some(h) => i32::from(h.drawer.stop()),
        None => 0,
    }
}

/// Advance the running draw by one tick.
///
/// # Returns
/// JSON string: `{"ok": {"step": Step, "commands": [...]}}` or `{"error": "message"}`
///
/// # Safety
/// - `handle` must be a valid pointer from `namedraw_session_new` or null
/// - Caller must free the returned string with `namedraw_string_free`
#[no_mangle]
pub unsafe extern "C" fn namedraw_step(handle: *mut DrawHandle) -> *mut c_char {
    let Some(h) = handle.as_mut() else {
        return fail("null handle pointer");
    };
    match h.drawer.step(&mut h.store, &mut h.surface) {
        Ok(step) => respond(FfiResult::ok(StepReport {
            step,
            commands: h.surface.drain(),
        })),
        Err(e) => fail(e.to_string()),
    }
}

// ============================================================================
// Pointer Input
// ============================================================================

/// Pointer pressed at `x`. Only the carousel reacts.
///
/// # Safety
/// - `handle` must be a valid pointer from `namedraw_session_new` or null
#[no_mangle]
pub unsafe extern "C" fn namedraw_press(handle: *mut DrawHandle, x: f64) {
    if let Some(h) = handle.as_mut() {
        h.drawer.press(x);
    }
}

/// Pointer moved to `x`.
///
/// # Returns
/// JSON string: `{"ok": [DrawCommand, ...]}` or `{"error": "message"}`
///
/// # Safety
/// - `handle` must be a valid pointer from `namedraw_session_new` or null
/// - Caller must free the returned string with `namedraw_string_free`
#[no_mangle]
pub unsafe extern "C" fn namedraw_motion(handle: *mut DrawHandle, x: f64) -> *mut c_char {
    let Some(h) = handle.as_mut() else {
        return fail("null handle pointer");
    };
    match h.drawer.motion(x, &mut h.surface) {
        Ok(_) => respond(FfiResult::ok(h.surface.drain())),
        Err(e) => fail(e.to_string()),
    }
}

/// Pointer released.
///
/// # Safety
/// - `handle` must be a valid pointer from `namedraw_session_new` or null
#[no_mangle]
pub unsafe extern "C" fn namedraw_release(handle: *mut DrawHandle) {
    if let Some(h) = handle.as_mut() {
        h.drawer.release();
    }
}

// ============================================================================
// Pool
// ============================================================================

/// Current pool, in load order.
///
/// # Returns
/// JSON string: `{"ok": [NameRecord, ...]}` or `{"error": "message"}`
///
/// # Safety
/// - `handle` must be a valid pointer from `namedraw_session_new` or null
/// - Caller must free the returned string with `namedraw_string_free`
#[no_mangle]
pub unsafe extern "C" fn namedraw_records(handle: *const DrawHandle) -> *mut c_char {
    let Some(h) = handle.as_ref() else {
        return fail("null handle pointer");
    };
    respond(FfiResult::ok(h.store.query().all()))
}

/// Put every drawn record back in the pool.
///
/// # Returns
/// JSON string: `{"ok": <number reset>}` or `{"error": "message"}`
///
/// # Safety
/// - `handle` must be a valid pointer from `namedraw_session_new` or null
/// - Caller must free the returned string with `namedraw_string_free`
#[no_mangle]
pub unsafe extern "C" fn namedraw_reset(handle: *mut DrawHandle) -> *mut c_char {
    let Some(h) = handle.as_mut() else {
        return fail("null handle pointer");
    };
    let count = h.store.reset();
    match h.drawer.refresh(&h.store, &mut h.surface) {
        Ok(_) => respond(FfiResult::ok(count)),
        Err(e) => fail(e.to_string()),
    }
}

// ============================================================================
// Utility Functions
// ============================================================================

/// Get the engine version.
///
/// # Returns
/// Static string (do not free).
#[no_mangle]
pub extern "C" fn namedraw_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
