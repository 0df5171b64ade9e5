//! CPU-variant stack frame synthesis, interrupt control, and context
//! switch primitives for both supported trap-frame widths.
//!
//! Exactly one of the `narrow-pc`/`wide-pc` Cargo features selects which
//! [`trapframe::TrapFrame`] layout the rest of this crate builds.

#![no_std]

pub mod context;
pub mod interrupt;
pub mod stack;
pub mod timer;
pub mod trapframe;

pub use context::{context_switch, idle, restore_and_reti, sched_start, time_now};
pub use interrupt::{
    CriticalSection, InterruptState, critical_section, disable_interrupts, enable_interrupts,
    get_interrupt_state, interrupts_enabled, set_interrupt_state,
};
pub use stack::{INIT_FRAME_WORDS, SAVED_REGISTER_COUNT, init_stack};
pub use trapframe::TrapFrame;

/// Address every synthesized task stack is seeded to return into if its
/// entry function ever falls off the end with a plain `ret`. Calls into
/// the scheduler's task-exit path the same way an explicit exit call
/// would, so "forgetting" to call exit is not a crash.
///
/// # Safety
/// Only valid as a return address target, never called directly.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn task_exit_trampoline() -> ! {
    if let Some(bridge) = rtos_abi::try_sched_bridge() {
        bridge.terminate_current();
    }
    loop {
        interrupt::disable_interrupts();
        crate::context::idle();
    }
}
