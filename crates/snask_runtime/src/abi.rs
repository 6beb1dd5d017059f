//! C entry points for compiled code.
//!
//! Every value crosses the boundary as a [`RawValue`] header. Native
//! operations follow the `(out, arg1, ..., argN)` convention: arguments are
//! read through pointers and the result is written into `out`. Strings
//! handed out are allocated through the tracking allocator and belong to the
//! process. Object handles keep their object alive until exit.

use std::ffi::{CStr, c_char, c_void};
use std::ptr;

use snask_core::{ObjectRef, Value, loose_eq, strict_eq, track};

use crate::dispatch::Callback;
use crate::runtime::Runtime;

pub const TAG_NIL: f64 = 0.0;
pub const TAG_NUM: f64 = 1.0;
pub const TAG_BOOL: f64 = 2.0;
pub const TAG_STR: f64 = 3.0;
pub const TAG_OBJ: f64 = 4.0;

#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct RawValue {
    pub tag: f64,
    pub num: f64,
    pub ptr: *mut c_void,
}

impl RawValue {
    pub const NIL: RawValue = RawValue {
        tag: TAG_NIL,
        num: 0.0,
        ptr: ptr::null_mut(),
    };
}

impl Default for RawValue {
    fn default() -> Self {
        Self::NIL
    }
}

pub type RawCallback1 = unsafe extern "C" fn(*mut RawValue, *mut RawValue);
pub type RawCallback2 = unsafe extern "C" fn(*mut RawValue, *mut RawValue, *mut RawValue);
pub type RawCallback5 = unsafe extern "C" fn(
    *mut RawValue,
    *mut RawValue,
    *mut RawValue,
    *mut RawValue,
    *mut RawValue,
    *mut RawValue,
);

/// Encodes `v` for foreign code. String payloads are copied into tracked
/// memory; objects leak one handle reference.
pub fn to_raw(v: &Value) -> RawValue {
    match v {
        Value::Nil => RawValue::NIL,
        Value::Number(n) => RawValue {
            tag: TAG_NUM,
            num: *n,
            ptr: ptr::null_mut(),
        },
        Value::Boolean(b) => RawValue {
            tag: TAG_BOOL,
            num: if *b { 1.0 } else { 0.0 },
            ptr: ptr::null_mut(),
        },
        Value::String(s) => {
            let p = track::dup(s);
            if p.is_null() {
                return RawValue::NIL;
            }
            RawValue {
                tag: TAG_STR,
                num: 0.0,
                ptr: p as *mut c_void,
            }
        }
        Value::Object(o) => RawValue {
            tag: TAG_OBJ,
            num: 0.0,
            ptr: o.clone().into_raw() as *mut c_void,
        },
    }
}

/// Decodes a header. Null pointers, unknown tags and missing payloads read
/// as `Nil`.
///
/// # Safety
/// `raw` must be null or point to a valid header whose string payload is
/// NUL-terminated and whose object payload came from [`to_raw`].
pub unsafe fn from_raw(raw: *const RawValue) -> Value {
    let Some(raw) = (unsafe { raw.as_ref() }) else {
        return Value::Nil;
    };
    if raw.tag == TAG_NUM {
        Value::Number(raw.num)
    } else if raw.tag == TAG_BOOL {
        Value::Boolean(raw.num != 0.0)
    } else if raw.tag == TAG_STR && !raw.ptr.is_null() {
        let s = unsafe { CStr::from_ptr(raw.ptr as *const c_char) };
        Value::String(s.to_string_lossy().into_owned())
    } else if raw.tag == TAG_OBJ && !raw.ptr.is_null() {
        Value::Object(unsafe { ObjectRef::clone_from_raw(raw.ptr) })
    } else {
        Value::Nil
    }
}

unsafe fn write_out(out: *mut RawValue, v: &Value) {
    if let Some(slot) = unsafe { out.as_mut() } {
        *slot = to_raw(v);
    }
}

unsafe fn name_arg(name: *const c_char) -> Option<String> {
    if name.is_null() {
        return None;
    }
    Some(unsafe { CStr::from_ptr(name) }.to_string_lossy().into_owned())
}

unsafe fn forward(out: *mut RawValue, builtin: &str, args: &[*const RawValue]) {
    let args: Vec<Value> = args.iter().map(|&a| unsafe { from_raw(a) }).collect();
    let v = Runtime::global().call_builtin(builtin, &args);
    unsafe { write_out(out, &v) };
}

unsafe fn register(name: *const c_char, callback: Callback) -> bool {
    let Some(name) = (unsafe { name_arg(name) }) else {
        return false;
    };
    match Runtime::global().register_callback(&name, callback) {
        Ok(()) => true,
        Err(e) => {
            log::error!("{e}");
            false
        }
    }
}

/// Installs the exit hook that releases tracked allocations.
#[unsafe(no_mangle)]
pub extern "C" fn snask_runtime_install() -> bool {
    track::install()
}

/// # Safety
/// `name` must be null or NUL-terminated; `f` must follow the 1-argument
/// convention.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn snask_register_callback1(
    name: *const c_char,
    f: Option<RawCallback1>,
) -> bool {
    let Some(f) = f else { return false };
    let callback = Callback::single(move |a| {
        let mut out = RawValue::NIL;
        let mut a = to_raw(a);
        unsafe {
            f(&mut out, &mut a);
            from_raw(&out)
        }
    });
    unsafe { register(name, callback) }
}

/// # Safety
/// As [`snask_register_callback1`], for the 2-argument convention.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn snask_register_callback2(
    name: *const c_char,
    f: Option<RawCallback2>,
) -> bool {
    let Some(f) = f else { return false };
    let callback = Callback::context(move |a, b| {
        let mut out = RawValue::NIL;
        let (mut a, mut b) = (to_raw(a), to_raw(b));
        unsafe {
            f(&mut out, &mut a, &mut b);
            from_raw(&out)
        }
    });
    unsafe { register(name, callback) }
}

/// # Safety
/// As [`snask_register_callback1`], for the 5-argument HTTP convention.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn snask_register_callback5(
    name: *const c_char,
    f: Option<RawCallback5>,
) -> bool {
    let Some(f) = f else { return false };
    let callback = Callback::http(move |a, b, c, d, e| {
        let mut out = RawValue::NIL;
        let mut args = [to_raw(a), to_raw(b), to_raw(c), to_raw(d), to_raw(e)];
        let [a, b, c, d, e] = &mut args;
        unsafe {
            f(&mut out, a, b, c, d, e);
            from_raw(&out)
        }
    });
    unsafe { register(name, callback) }
}

/// Calls the builtin `name` with `argc` headers starting at `argv`.
///
/// # Safety
/// `name` must be NUL-terminated; `argv` must point to `argc` headers.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn snask_call_builtin(
    out: *mut RawValue,
    name: *const c_char,
    argv: *const RawValue,
    argc: usize,
) {
    let Some(name) = (unsafe { name_arg(name) }) else {
        unsafe { write_out(out, &Value::Nil) };
        return;
    };
    let args: Vec<Value> = if argv.is_null() {
        Vec::new()
    } else {
        (0..argc).map(|i| unsafe { from_raw(argv.add(i)) }).collect()
    };
    let v = Runtime::global().call_builtin(&name, &args);
    unsafe { write_out(out, &v) };
}

/// # Safety
/// All pointers must be null or valid headers.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn snask_call1(out: *mut RawValue, name: *const RawValue, a: *const RawValue) {
    let name = unsafe { from_raw(name) };
    let v = match name.as_str() {
        Some(n) => Runtime::global().dispatcher().call1(n, &unsafe { from_raw(a) }),
        None => Value::Nil,
    };
    unsafe { write_out(out, &v) };
}

/// # Safety
/// All pointers must be null or valid headers.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn snask_call2(
    out: *mut RawValue,
    name: *const RawValue,
    a: *const RawValue,
    b: *const RawValue,
) {
    let name = unsafe { from_raw(name) };
    let v = match name.as_str() {
        Some(n) => {
            let (a, b) = unsafe { (from_raw(a), from_raw(b)) };
            Runtime::global().dispatcher().call2(n, &a, &b)
        }
        None => Value::Nil,
    };
    unsafe { write_out(out, &v) };
}

macro_rules! forward_fn {
    ($(#[$doc:meta])* $export:ident => $builtin:literal ($($arg:ident),*)) => {
        $(#[$doc])*
        ///
        /// # Safety
        /// All pointers must be null or valid headers.
        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn $export(out: *mut RawValue, $($arg: *const RawValue),*) {
            unsafe { forward(out, $builtin, &[$($arg),*]) }
        }
    };
}

forward_fn!(snask_json_parse => "json_parse"(src));
forward_fn!(snask_json_parse_ex => "json_parse_ex"(src));
forward_fn!(snask_json_stringify => "json_stringify"(v));
forward_fn!(snask_json_stringify_pretty => "json_stringify_pretty"(v));
forward_fn!(snask_get_member => "s_get_member"(obj, name));
forward_fn!(snask_set_member => "s_set_member"(obj, name, v));
forward_fn!(snask_path_get => "sjson_path_get"(root, path));
forward_fn!(snask_qs_get => "blaze_qs_get"(qs, key));
forward_fn!(snask_cookie_get => "blaze_cookie_get"(header, key));
forward_fn!(
    /// Runs the HTTP service; `out` receives `false` if it could not start.
    snask_blaze_run => "blaze_run"(port, routes)
);

/// Allocates an object with `count` member names, all `Nil`.
///
/// # Safety
/// `names` must point to `count` NUL-terminated strings.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn snask_alloc_obj(out: *mut RawValue, count: usize, names: *const *const c_char) {
    let names: Vec<Value> = if names.is_null() {
        Vec::new()
    } else {
        (0..count)
            .filter_map(|i| unsafe { name_arg(*names.add(i)) })
            .map(Value::String)
            .collect()
    };
    let v = Runtime::global().call_builtin("s_alloc_obj", &names);
    unsafe { write_out(out, &v) };
}

/// # Safety
/// All pointers must be null or valid headers.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn snask_loose_eq(out: *mut RawValue, a: *const RawValue, b: *const RawValue) {
    let (a, b) = unsafe { (from_raw(a), from_raw(b)) };
    unsafe { write_out(out, &Value::Boolean(loose_eq(&a, &b))) };
}

/// # Safety
/// All pointers must be null or valid headers.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn snask_strict_eq(out: *mut RawValue, a: *const RawValue, b: *const RawValue) {
    let (a, b) = unsafe { (from_raw(a), from_raw(b)) };
    unsafe { write_out(out, &Value::Boolean(strict_eq(&a, &b))) };
}
