//! Task lifecycle, sleep queue, and pluggable scheduling policy.
//!
//! Depends on `rtos-arch` for stack images and timer control and on
//! `rtos-abi` for the trait interfaces it implements and registers through
//! `register_sched_bridge`. Nothing in this crate depends on `rtos-sync`;
//! task join/detach use the same block/unblock primitives `rtos-sync`'s
//! semaphores and mutexes build on, rather than a separate semaphore object,
//! since a reusable join semaphore would have to live below this crate and
//! `rtos-sync` sits above it.

#![no_std]

pub mod policy;
pub mod scheduler;
pub mod sleep_queue;
pub mod task;

pub use policy::{PolicyContext, RoundRobin, SchedPolicy};
pub use scheduler::Scheduler;
pub use sleep_queue::{SleepEntry, SleepQueue};
pub use task::{NO_TASK_ID, Task, TaskId, TaskState};

/// Registers a scheduler singleton as the process-wide `SchedBridge`. The
/// caller (`rtos-kernel`) owns the `'static` storage for both the scheduler
/// and the fat-pointer reference to it, the same two-step registration
/// `rtos-lib::klog::attach_sink` uses:
///
/// ```ignore
/// static SCHEDULER: rtos_sched::Scheduler<BoardConfig, 16> = rtos_sched::Scheduler::new();
/// static BRIDGE: &dyn rtos_abi::SchedBridge = &SCHEDULER;
/// rtos_sched::register(&BRIDGE);
/// ```
pub fn register(bridge: &'static &'static dyn rtos_abi::SchedBridge) {
    rtos_abi::register_sched_bridge(bridge);
}
