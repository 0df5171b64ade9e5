//! Mesa-style condition variable: a waiter count behind a private lock plus
//! a counting semaphore tasks block on, grounded on
//! `examples/original_source/threads.c`'s `cnd_*` family.
//!
//! `cnd_broadcast` there has an inverted sign check —
//! `if (sem_post(&cond->threads_to_wakeup) > 0) return thrd_error;` can
//! never trip (`sem_post` returns 0 or -1, never a positive value), so a
//! `threads_to_wakeup` post failure mid-broadcast goes unnoticed. This
//! implementation doesn't thread an error code through `post` at all for
//! that reason; it always succeeds (`wake_sem` is an uncapped counting
//! semaphore) so there is nothing to mis-check.

use rtos_lib::IrqMutex;

use crate::mutex::MutexGuard;
use crate::semaphore::Semaphore;

pub struct CondVar {
    waiters: IrqMutex<u32>,
    wake_sem: Semaphore,
}

impl CondVar {
    pub const fn new() -> Self {
        Self { waiters: IrqMutex::new(0), wake_sem: Semaphore::new(0) }
    }

    /// Three-step handoff: register as a waiter under the private lock,
    /// release the caller's mutex, block on the wake semaphore, reacquire
    /// the mutex before returning. The guard is consumed; `force_unlock`
    /// does the one post an ordinary `Drop` would have done, so the guard
    /// is forgotten rather than dropped to avoid posting twice.
    pub fn wait<'a, T>(&self, guard: MutexGuard<'a, T>) -> MutexGuard<'a, T> {
        let mutex = guard.mutex_ref();
        {
            let mut w = self.waiters.lock();
            *w += 1;
        }
        mutex.force_unlock();
        core::mem::forget(guard);

        self.wake_sem.wait();

        // The mutex is tagged `Plain` by construction (condvars are only
        // ever paired with one), so reacquiring it cannot fail.
        mutex.lock().expect("condvar-associated mutex must be Plain")
    }

    pub fn signal(&self) {
        let mut w = self.waiters.lock();
        if *w > 0 {
            *w -= 1;
            let _ = self.wake_sem.post();
        }
    }

    /// Wakes every current waiter. Correctly checks `num_waiters` with a
    /// `while`, not a sign-inverted `if`, so a broadcast with N waiters
    /// posts exactly N times.
    pub fn broadcast(&self) {
        let mut w = self.waiters.lock();
        while *w > 0 {
            *w -= 1;
            let _ = self.wake_sem.post();
        }
    }
}

impl Default for CondVar {
    fn default() -> Self {
        Self::new()
    }
}

/// `timed_wait` is not implemented for the same reason `Mutex::timed_lock`
/// isn't: there is no deadline-aware block primitive in this core yet.
impl CondVar {
    pub fn timed_wait<'a, T>(
        &self,
        guard: MutexGuard<'a, T>,
        _deadline_ticks: u32,
    ) -> Result<MutexGuard<'a, T>, MutexGuard<'a, T>> {
        Err(guard)
    }
}
