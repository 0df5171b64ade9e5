//! Counting/binary semaphores, mutex, and condition variable.
//!
//! Calls back into the scheduler purely through `rtos_abi::sched_bridge()`
//! — this crate has no dependency on `rtos-sched` at all, so the layering
//! spec.md's component table implies (sync sits above scheduling) is a real
//! Cargo-graph property, not just a convention.

#![no_std]

pub mod condvar;
pub mod mutex;
pub mod semaphore;

pub use condvar::CondVar;
pub use mutex::{Mutex, MutexGuard, MutexKind};
pub use semaphore::{BinarySemaphore, SEM_VALUE_MAX, Semaphore};
