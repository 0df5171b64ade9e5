//! Cross-crate panic dispatch.
//!
//! `rtos-sched`/`rtos-sync` detect invariant violations (double-exit,
//! corrupt sleep queue, stack overflow) and must call `panic(code)`, but the
//! actual panic policy (log, then halt or reset per `Config::DEBUG_MODE`)
//! lives in `rtos-kernel`, which depends on them rather than the other way
//! around. Registered once at boot the same way `sched_traits` registers
//! the scheduler bridge.

use crate::error::PanicCode;
use crate::service_cell::ServiceCell;

pub trait PanicHook: Send + Sync {
    fn on_panic(&self, code: PanicCode) -> !;
}

static PANIC_HOOK: ServiceCell<&'static dyn PanicHook> = ServiceCell::new("panic_hook");

/// Called once at boot by `rtos-kernel`.
pub fn register_panic_hook(hook: &'static &'static dyn PanicHook) {
    PANIC_HOOK.register(hook);
}

/// Raise a kernel panic. Falls back to an interrupt-disabled spin loop if
/// called before `rtos-kernel` has registered its hook (should not happen
/// past `os_init`).
pub fn kernel_panic(code: PanicCode) -> ! {
    if let Some(hook) = PANIC_HOOK.try_get() {
        hook.on_panic(code);
    }
    loop {}
}
