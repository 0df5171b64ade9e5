//! `os_init`/`os_run`/`panic` and the trait wiring that ties `rtos-sched`
//! and `rtos-sync` to a concrete board. This crate is an `rlib`, not a
//! binary — the teacher's `kernel` crate is the one member with a `[[bin]]`
//! target and a real `_start`, but that only makes sense once a vector
//! table and a linker script exist, and those are board support package
//! concerns this core doesn't own (spec.md §1's "per-board timer clock
//! setup" is explicitly someone else's problem).

#![no_std]

pub mod config;
mod panic;

use rtos_abi::{KernelResult, SchedulerExecution, SchedulerState, TaskHandle};

pub use config::KernelConfig;
pub use rtos_abi::{Config, KernelError, PanicCode};
pub use rtos_lib::{
    KlogLevel, LogSink, klog_attach_sink as attach_log_sink, klog_set_level as set_log_level,
};
pub use rtos_sync::{BinarySemaphore, CondVar, Mutex, MutexGuard, MutexKind, Semaphore};

/// Task table size this build was linked with. See
/// [`config::assert_config_consistent`] for why this isn't just
/// `KernelConfig::MAX_TASKS` used directly.
pub const TASK_SLOTS: usize = config::TASK_SLOTS;

pub type TheScheduler = rtos_sched::Scheduler<KernelConfig, TASK_SLOTS>;

static SCHEDULER: TheScheduler = TheScheduler::new();

/// Brings the core up: wires the panic hook and the scheduler bridge,
/// programs the tick timer, but does not start running tasks yet — call
/// [`task_create`] for every boot task first, then [`os_run`].
pub fn os_init() {
    config::assert_config_consistent();
    panic::install();

    static BRIDGE: &dyn rtos_abi::SchedBridge = &SCHEDULER;
    rtos_sched::register(&BRIDGE);

    rtos_arch::timer::setup_tick_timer::<KernelConfig>();
}

/// Hands control to the scheduler. Never returns.
pub fn os_run() -> ! {
    SCHEDULER.start()
}

/// Runs the rbtree/sleep-queue/scheduler/sync suites and reports whether
/// every one passed. Call before [`os_run`] — a board's boot sequence is
/// the only caller, gated behind the `builtin-tests` feature the same way
/// the teacher gates its in-target harness off a release build.
#[cfg(feature = "builtin-tests")]
pub fn run_builtin_tests() -> bool {
    rtos_tests::run_all_pass()
}

/// Raises a kernel panic through the registered hook.
pub fn panic(code: PanicCode) -> ! {
    rtos_abi::kernel_panic(code)
}

pub fn task_create(
    entry: extern "C" fn(u16),
    arg: u16,
    stack: &'static mut [u16],
) -> KernelResult<TaskHandle> {
    SCHEDULER.create(entry, arg, stack)
}

pub fn task_current() -> TaskHandle {
    SCHEDULER.current_task()
}

pub fn task_equal(a: TaskHandle, b: TaskHandle) -> bool {
    a == b
}

pub fn task_yield() {
    SCHEDULER.yield_now()
}

pub fn task_sleep_ms(ms: u32) {
    SCHEDULER.sleep_ms(ms)
}

pub fn task_exit(code: i32) -> ! {
    SCHEDULER.exit(code)
}

pub fn task_join(task: TaskHandle) -> i32 {
    SCHEDULER.join(task)
}

pub fn task_detach(task: TaskHandle) {
    SCHEDULER.detach(task)
}

/// `(total_tasks_created, currently_live, context_switches)`.
pub fn get_task_stats() -> (u32, u32, u64) {
    SCHEDULER.task_stats()
}

/// `(context_switches, yields, ready_count, schedule_calls)`.
pub fn get_scheduler_stats() -> (u64, u64, u32, u32) {
    SCHEDULER.scheduler_stats()
}
