//! A mutex is a binary semaphore initialized to held-available, plus a type
//! tag. Grounded on `examples/original_source/threads.c`'s `mtx_*` family,
//! which wraps `bsem_*` directly; unlike the original, the type tag is not
//! silently ignored (`mtx_init`'s `// TODO: type parameter currently is
//! ignored`) — only `Plain` is implemented, and `Recursive`/`Timed` reject
//! the operations they can't actually provide instead of quietly behaving
//! like `Plain`.

use core::cell::UnsafeCell;
use core::ops::{Deref, DerefMut};

use rtos_abi::{KernelError, KernelResult};

use crate::semaphore::BinarySemaphore;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MutexKind {
    Plain,
    Recursive,
    Timed,
}

pub struct Mutex<T> {
    kind: MutexKind,
    sem: BinarySemaphore,
    data: UnsafeCell<T>,
}

unsafe impl<T: Send> Send for Mutex<T> {}
unsafe impl<T: Send> Sync for Mutex<T> {}

impl<T> Mutex<T> {
    pub const fn new(kind: MutexKind, data: T) -> Self {
        Self { kind, sem: BinarySemaphore::new(true), data: UnsafeCell::new(data) }
    }

    pub fn lock(&self) -> KernelResult<MutexGuard<'_, T>> {
        if self.kind != MutexKind::Plain {
            return Err(KernelError::NotSupported);
        }
        self.sem.wait();
        Ok(MutexGuard { mutex: self })
    }

    pub fn try_lock(&self) -> KernelResult<MutexGuard<'_, T>> {
        if self.kind != MutexKind::Plain {
            return Err(KernelError::NotSupported);
        }
        self.sem.try_wait()?;
        Ok(MutexGuard { mutex: self })
    }

    /// Timed semantics are not implemented in this core — deadline-aware
    /// locking would need a scheduler-visible wait-with-timeout primitive
    /// neither `Semaphore` nor `SchedulerExecution` expose yet.
    pub fn timed_lock(&self, _deadline_ticks: u32) -> KernelResult<MutexGuard<'_, T>> {
        Err(KernelError::NotSupported)
    }

    /// Bypasses the held/free check entirely — for `CondVar::wait`, which
    /// must unlock a mutex it does not otherwise own a guard for across the
    /// wait, then relock it on resume via [`Mutex::lock`].
    pub(crate) fn force_unlock(&self) {
        let _ = self.sem.post();
    }
}

pub struct MutexGuard<'a, T> {
    mutex: &'a Mutex<T>,
}

impl<'a, T> MutexGuard<'a, T> {
    /// Used by `CondVar::wait`, which must release the mutex around its
    /// block and reacquire it on resume without going through `Drop`.
    pub(crate) fn mutex_ref(&self) -> &'a Mutex<T> {
        self.mutex
    }
}

impl<T> Deref for MutexGuard<'_, T> {
    type Target = T;
    fn deref(&self) -> &T {
        unsafe { &*self.mutex.data.get() }
    }
}

impl<T> DerefMut for MutexGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        unsafe { &mut *self.mutex.data.get() }
    }
}

impl<T> Drop for MutexGuard<'_, T> {
    fn drop(&mut self) {
        let _ = self.mutex.sem.post();
    }
}
