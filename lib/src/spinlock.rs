//! Interrupt-safe locks.
//!
//! This target is single-core, so there is never a second CPU actually
//! spinning on these locks — the only contention is between mainline code
//! and an ISR. Both lock types work by disabling interrupts for their
//! critical section and restoring the prior GIE state on drop; the `locked`
//! flag exists purely to catch accidental recursive locking, which would
//! otherwise deadlock silently since nothing preempts to break it.

use core::cell::UnsafeCell;
use core::ops::{Deref, DerefMut};
use core::sync::atomic::{AtomicBool, Ordering};

use rtos_arch::{InterruptState, get_interrupt_state, set_interrupt_state};

/// Interrupt-disabling mutex around a data value.
pub struct IrqMutex<T> {
    locked: AtomicBool,
    data: UnsafeCell<T>,
}

// SAFETY: access to `data` is only ever granted through `IrqMutexGuard`,
// which exists only while interrupts are disabled and `locked` is held.
unsafe impl<T: Send> Send for IrqMutex<T> {}
unsafe impl<T: Send> Sync for IrqMutex<T> {}

pub struct IrqMutexGuard<'a, T> {
    mutex: &'a IrqMutex<T>,
    saved: InterruptState,
}

impl<T> IrqMutex<T> {
    #[inline]
    pub const fn new(data: T) -> Self {
        Self {
            locked: AtomicBool::new(false),
            data: UnsafeCell::new(data),
        }
    }

    #[inline]
    pub fn lock(&self) -> IrqMutexGuard<'_, T> {
        let saved = get_interrupt_state();
        rtos_arch::disable_interrupts();
        let already_locked = self.locked.swap(true, Ordering::Acquire);
        debug_assert!(!already_locked, "IrqMutex locked recursively, would deadlock");
        IrqMutexGuard { mutex: self, saved }
    }

    #[inline]
    pub fn try_lock(&self) -> Option<IrqMutexGuard<'_, T>> {
        let saved = get_interrupt_state();
        rtos_arch::disable_interrupts();
        if self.locked.swap(true, Ordering::Acquire) {
            set_interrupt_state(saved);
            None
        } else {
            Some(IrqMutexGuard { mutex: self, saved })
        }
    }
}

impl<T> Deref for IrqMutexGuard<'_, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        // SAFETY: holding the guard means we hold the lock exclusively.
        unsafe { &*self.mutex.data.get() }
    }
}

impl<T> DerefMut for IrqMutexGuard<'_, T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: holding the guard means we hold the lock exclusively.
        unsafe { &mut *self.mutex.data.get() }
    }
}

impl<T> Drop for IrqMutexGuard<'_, T> {
    #[inline]
    fn drop(&mut self) {
        self.mutex.locked.store(false, Ordering::Release);
        set_interrupt_state(self.saved);
    }
}

/// Bare interrupt-disabling lock with no payload, for protecting a region
/// of code rather than a specific value (matches call sites that already
/// hold their state behind a raw pointer, e.g. scheduler internals reached
/// from both mainline code and ISRs).
pub struct Spinlock {
    locked: AtomicBool,
}

pub struct SpinlockGuard<'a> {
    lock: &'a Spinlock,
    saved: InterruptState,
}

impl Spinlock {
    #[inline]
    pub const fn new() -> Self {
        Self { locked: AtomicBool::new(false) }
    }

    #[inline]
    pub fn lock(&self) -> SpinlockGuard<'_> {
        let saved = get_interrupt_state();
        rtos_arch::disable_interrupts();
        let already_locked = self.locked.swap(true, Ordering::Acquire);
        debug_assert!(!already_locked, "Spinlock locked recursively, would deadlock");
        SpinlockGuard { lock: self, saved }
    }

    /// Run `f` with the lock held. `f` can return early without leaking the
    /// lock since the guard's drop runs regardless.
    #[inline]
    pub fn with<R>(&self, f: impl FnOnce() -> R) -> R {
        let _guard = self.lock();
        f()
    }
}

impl Default for Spinlock {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SpinlockGuard<'_> {
    #[inline]
    fn drop(&mut self) {
        self.lock.locked.store(false, Ordering::Release);
        set_interrupt_state(self.saved);
    }
}
