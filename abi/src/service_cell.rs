//! Generic single-registration cell for cross-crate service tables.
//!
//! Lives in the zero-dependency ABI crate so every other crate — including
//! ones that must not depend on each other directly, like `rtos-arch` and
//! `rtos-sched` — can register and look up `'static` trait objects without
//! a circular `Cargo.toml` dependency.

use core::sync::atomic::{AtomicPtr, Ordering};

pub struct ServiceCell<T> {
    ptr: AtomicPtr<T>,
    name: &'static str,
}

// SAFETY: only ever stores a pointer to a 'static T; AtomicPtr gives the
// synchronization needed to publish it across contexts.
unsafe impl<T> Sync for ServiceCell<T> {}

impl<T> ServiceCell<T> {
    #[inline]
    pub const fn new(name: &'static str) -> Self {
        Self {
            ptr: AtomicPtr::new(core::ptr::null_mut()),
            name,
        }
    }

    /// Register the service. Panics if something already registered here.
    #[inline]
    pub fn register(&self, service: &'static T) {
        let prev = self.ptr.swap(service as *const T as *mut T, Ordering::Release);
        assert!(prev.is_null(), "{} already registered", self.name);
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        !self.ptr.load(Ordering::Acquire).is_null()
    }

    /// Panics if nothing has registered yet.
    #[inline]
    pub fn get(&self) -> &'static T {
        let ptr = self.ptr.load(Ordering::Acquire);
        assert!(!ptr.is_null(), "{} not initialized", self.name);
        // SAFETY: only valid &'static T pointers are ever stored.
        unsafe { &*ptr }
    }

    #[inline]
    pub fn try_get(&self) -> Option<&'static T> {
        let ptr = self.ptr.load(Ordering::Acquire);
        if ptr.is_null() {
            None
        } else {
            // SAFETY: only valid &'static T pointers are ever stored.
            Some(unsafe { &*ptr })
        }
    }
}
