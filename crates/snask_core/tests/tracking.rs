use std::ffi::CStr;

use snask_core::Tracker;

#[test]
fn every_allocation_is_registered_once() {
    let t = Tracker::new();
    let a = t.alloc(16);
    let b = t.alloc(32);
    assert!(!a.is_null() && !b.is_null());
    assert!(t.is_tracked(a));
    assert!(t.is_tracked(b));
    assert_eq!(t.live_count(), 2);
    assert_eq!(t.release_all(), 2);
    assert_eq!(t.live_count(), 0);
}

#[test]
fn realloc_chain_keeps_a_single_entry() {
    let t = Tracker::new();
    let mut p = t.alloc(8);
    unsafe { *p = 42 };
    for size in [64, 4096, 1 << 20, 24] {
        p = unsafe { t.realloc(p, size) };
        assert!(!p.is_null());
        assert!(t.is_tracked(p));
        assert_eq!(t.live_count(), 1);
    }
    assert_eq!(unsafe { *p }, 42);
    assert_eq!(t.release_all(), 1);
}

#[test]
fn realloc_of_null_allocates() {
    let t = Tracker::new();
    let p = unsafe { t.realloc(std::ptr::null_mut(), 10) };
    assert!(t.is_tracked(p));
    assert_eq!(t.live_count(), 1);
}

#[test]
fn dup_copies_and_terminates() {
    let t = Tracker::new();
    let s = t.dup("hello");
    assert_eq!(unsafe { CStr::from_ptr(s) }.to_str().unwrap(), "hello");

    let n = t.dupn(b"hello world", 5);
    assert_eq!(unsafe { CStr::from_ptr(n) }.to_str().unwrap(), "hello");

    let stop = t.dupn(b"ab\0cd", 5);
    assert_eq!(unsafe { CStr::from_ptr(stop) }.to_bytes(), b"ab");

    let long = t.dupn(b"abc", 100);
    assert_eq!(unsafe { CStr::from_ptr(long) }.to_bytes(), b"abc");

    assert_eq!(t.live_count(), 4);
}

#[test]
fn release_is_idempotent() {
    let t = Tracker::new();
    t.alloc(1);
    assert_eq!(t.release_all(), 1);
    assert_eq!(t.release_all(), 0);
}

#[test]
fn global_tracker_and_exit_hook() {
    assert!(snask_core::track::install());
    assert!(snask_core::track::install());
    let p = snask_core::track::dup("process-owned");
    assert!(Tracker::global().is_tracked(p as *const u8));
}
