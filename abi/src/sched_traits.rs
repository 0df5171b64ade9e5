//! Scheduler trait interfaces.
//!
//! Defined here, in the crate with no dependencies of its own, so that
//! `rtos-sync` can call into the scheduler and `rtos-kernel` can wire the
//! concrete scheduler in without either crate depending on `rtos-sched`
//! directly. `rtos-sched` implements these traits and registers itself
//! through `rtos-lib::ServiceCell` at boot.

use core::ffi::c_void;

/// Opaque task handle for cross-crate use. Concrete type lives in
/// `rtos-sched`; nothing outside that crate dereferences it.
pub type TaskHandle = *mut c_void;

/// Sentinel returned by `SchedulerExecution::current_task` when called
/// before the scheduler has started, or from a context with no task.
pub const NO_TASK: TaskHandle = core::ptr::null_mut();

/// Timer/IRQ-facing half of the scheduler, called from `rtos-arch`'s tick
/// and wakeup interrupt handlers.
pub trait SchedulerTiming: Send + Sync {
    /// Called on every tick interrupt; advances time slices and the sleep
    /// queue's notion of "now".
    fn on_tick(&self);

    /// Called after an ISR has run, to perform any reschedule that the ISR
    /// deferred rather than doing inline (keeps ISR bodies short).
    fn handle_post_irq(&self);

    /// Mark that a reschedule is needed next time it's safe to run one.
    fn request_reschedule(&self);
}

/// Task execution control, called from `rtos-sync` primitives and from the
/// public task API.
pub trait SchedulerExecution: Send + Sync {
    /// Currently running task, or `NO_TASK` if the scheduler hasn't started.
    fn current_task(&self) -> TaskHandle;

    /// Voluntarily give up the CPU, keeping the caller ready.
    fn yield_now(&self);

    /// Give up the CPU, but only actually switch if a ready task is
    /// strictly higher priority than the caller (used internally; the
    /// default round-robin policy treats this the same as `yield_now`).
    fn yield_higher(&self);

    /// Move the calling task out of the ready set until `unblock` is
    /// called with its handle.
    fn block_current(&self);

    /// Move a blocked task back into the ready set.
    fn unblock(&self, task: TaskHandle) -> bool;

    /// True if the given task is currently blocked.
    fn is_blocked(&self, task: TaskHandle) -> bool;

    /// Tear down the calling task. Never returns. Reached either through
    /// an explicit exit call or through the stack-return trampoline a
    /// task falls into if its entry function returns normally.
    fn terminate_current(&self) -> !;
}

/// Scheduler state queries used for diagnostics and the idle task.
pub trait SchedulerState: Send + Sync {
    /// (total_tasks_created, currently_live, context_switches)
    fn task_stats(&self) -> (u32, u32, u64);

    /// (context_switches, yields, ready_count, schedule_calls)
    fn scheduler_stats(&self) -> (u64, u64, u32, u32);
}

/// Everything `rtos-arch`'s ISR glue and `rtos-sync`'s blocking primitives
/// need from the scheduler, combined into one object-safe trait so a single
/// `&'static dyn SchedBridge` can be registered at boot.
pub trait SchedBridge: SchedulerTiming + SchedulerExecution + SchedulerState {}
impl<T: SchedulerTiming + SchedulerExecution + SchedulerState> SchedBridge for T {}

static SCHED_BRIDGE: crate::ServiceCell<&'static dyn SchedBridge> = crate::ServiceCell::new("sched_bridge");

/// Called once at boot by `rtos-sched` after its scheduler singleton exists.
pub fn register_sched_bridge(bridge: &'static &'static dyn SchedBridge) {
    SCHED_BRIDGE.register(bridge);
}

/// Panics if the scheduler hasn't registered yet — only valid to call after
/// `os_init`.
pub fn sched_bridge() -> &'static dyn SchedBridge {
    *SCHED_BRIDGE.get()
}

pub fn try_sched_bridge() -> Option<&'static dyn SchedBridge> {
    SCHED_BRIDGE.try_get().copied()
}
