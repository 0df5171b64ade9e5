//! Counting and binary semaphores.
//!
//! `wait` spins, yielding the CPU between checks rather than blocking the
//! scheduler outright — grounded on `examples/original_source/semaphore.c`'s
//! `sem_wait`, which does the same disable-interrupt/test/re-enable/yield
//! loop. The value itself lives behind an `IrqMutex` rather than the raw
//! disable/enable pairs the original uses, so the check-then-decrement is
//! atomic without a separate critical-section call at each site.

use rtos_abi::{KernelError, KernelResult};
use rtos_lib::IrqMutex;

/// Ceiling checked at construction, matching `sem_init`'s `value >
/// SEM_VALUE_MAX` rejection. `post` does not re-check it past that point —
/// the original doesn't either, it increments unconditionally.
pub const SEM_VALUE_MAX: u32 = u16::MAX as u32;

pub struct Semaphore {
    value: IrqMutex<u32>,
}

impl Semaphore {
    pub const fn new(initial: u32) -> Self {
        Self { value: IrqMutex::new(initial) }
    }

    /// Blocks the calling task until the count is nonzero, then decrements
    /// it. "Blocks" here means cooperative spin-yield, not a scheduler
    /// block/unblock transition — matching the original's `thrd_yield` loop.
    pub fn wait(&self) {
        loop {
            {
                let mut v = self.value.lock();
                if *v > 0 {
                    *v -= 1;
                    return;
                }
            }
            rtos_abi::sched_bridge().yield_now();
        }
    }

    pub fn try_wait(&self) -> KernelResult<()> {
        let mut v = self.value.lock();
        if *v == 0 {
            return Err(KernelError::Again);
        }
        *v -= 1;
        Ok(())
    }

    pub fn post(&self) -> KernelResult<()> {
        *self.value.lock() += 1;
        Ok(())
    }

    pub fn get_value(&self) -> u32 {
        *self.value.lock()
    }
}

/// Value in `{0, 1}`. Unlike `Semaphore`, `post` sets the value to 1 rather
/// than incrementing it — matching `bsem_post`'s idempotent set, not
/// `sem_post`'s increment. Used standalone for task-join handshakes and as
/// the building block `Mutex` is defined in terms of.
pub struct BinarySemaphore {
    value: IrqMutex<bool>,
}

impl BinarySemaphore {
    pub const fn new(initial: bool) -> Self {
        Self { value: IrqMutex::new(initial) }
    }

    pub fn wait(&self) {
        loop {
            {
                let mut v = self.value.lock();
                if *v {
                    *v = false;
                    return;
                }
            }
            rtos_abi::sched_bridge().yield_now();
        }
    }

    pub fn try_wait(&self) -> KernelResult<()> {
        let mut v = self.value.lock();
        if !*v {
            return Err(KernelError::Again);
        }
        *v = false;
        Ok(())
    }

    pub fn post(&self) -> KernelResult<()> {
        *self.value.lock() = true;
        Ok(())
    }

    pub fn get_value(&self) -> bool {
        *self.value.lock()
    }
}
