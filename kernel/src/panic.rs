//! Panic policy: log the code, then halt (debug builds) or attempt a reset
//! (release builds) per `Config::DEBUG_MODE`. Registered once at boot as the
//! `rtos-abi` `PanicHook`, the same indirection `rtos-sched`/`rtos-sync` use
//! to call back into the scheduler without depending on this crate.

use rtos_abi::{Config, PanicCode, PanicHook};
use rtos_lib::klog_error;

use crate::config::KernelConfig;

pub struct KernelPanicHook;

impl PanicHook for KernelPanicHook {
    fn on_panic(&self, code: PanicCode) -> ! {
        klog_error!("kernel panic: {:?}", code);
        if KernelConfig::DEBUG_MODE {
            halt()
        } else {
            // No board-agnostic reset sequence exists at this layer (it's a
            // watchdog-trigger or vector-reset jump, both board-specific);
            // halt is the safe fallback until a board support package wires
            // its own reset into this path.
            halt()
        }
    }
}

fn halt() -> ! {
    loop {
        rtos_arch::disable_interrupts();
    }
}

static PANIC_HOOK: KernelPanicHook = KernelPanicHook;

pub(crate) fn install() {
    static PANIC_HOOK_REF: &dyn PanicHook = &PANIC_HOOK;
    rtos_abi::register_panic_hook(&PANIC_HOOK_REF);
}
