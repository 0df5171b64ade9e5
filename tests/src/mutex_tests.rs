//! Mutex locking semantics, guard RAII, and the try-lock contention
//! end-to-end scenario.

use rtos_abi::KernelError;
use rtos_sync::{Mutex, MutexKind};
use rtos_lib::{fail, pass, test_suite};
use rtos_lib::testing::TestResult;

fn test_lock_then_deref_and_mutate() -> TestResult {
    let m = Mutex::new(MutexKind::Plain, 41);
    {
        let mut guard = m.lock().unwrap();
        *guard += 1;
    }
    let guard = m.lock().unwrap();
    if *guard != 42 {
        return fail!("value was {} after a mutation under the lock, expected 42", *guard);
    }
    pass!()
}

fn test_guard_drop_releases_the_lock() -> TestResult {
    let m = Mutex::new(MutexKind::Plain, 0);
    {
        let _guard = m.lock().unwrap();
    }
    if m.try_lock().is_err() {
        return fail!("try_lock failed after the prior guard was dropped");
    }
    pass!()
}

fn test_recursive_and_timed_kinds_are_not_supported() -> TestResult {
    let recursive = Mutex::new(MutexKind::Recursive, 0);
    let timed = Mutex::new(MutexKind::Timed, 0);
    match (recursive.lock(), timed.lock()) {
        (Err(KernelError::NotSupported), Err(KernelError::NotSupported)) => pass!(),
        (a, b) => fail!("expected NotSupported from both non-Plain kinds, got ({}, {})", a.is_ok(), b.is_ok()),
    }
}

fn test_timed_lock_always_rejects() -> TestResult {
    let m = Mutex::new(MutexKind::Plain, 0);
    match m.timed_lock(1000) {
        Err(KernelError::NotSupported) => pass!(),
        other => fail!("timed_lock on a Plain mutex should always be NotSupported, got {:?}", other.is_ok()),
    }
}

/// Try-lock contention: task A locks the mutex; task B's `try_lock` finds
/// it busy; once A unlocks, B's next `try_lock` succeeds.
fn test_try_lock_contention() -> TestResult {
    let m = Mutex::new(MutexKind::Plain, 0);
    let guard_a = m.lock().unwrap();
    match m.try_lock() {
        Err(KernelError::Again) => {}
        other => return fail!("expected Again while A holds the lock, got {:?}", other.is_ok()),
    }
    drop(guard_a);
    match m.try_lock() {
        Ok(_) => pass!(),
        Err(e) => fail!("try_lock failed after A released the mutex: {:?}", e),
    }
}

test_suite!(
    mutex_suite,
    [
        test_lock_then_deref_and_mutate,
        test_guard_drop_releases_the_lock,
        test_recursive_and_timed_kinds_are_not_supported,
        test_timed_lock_always_rejects,
        test_try_lock_contention,
    ]
);
