//! Context save/restore and the two interrupt service routines that drive
//! the scheduler: the periodic tick and the sleep-queue wakeup.
//!
//! Everything that must be assembly is collected here and nowhere else;
//! every `extern "C"` function assembly calls into is a thin shim that
//! immediately hands off to safe Rust (see `rtos_abi::sched_bridge`).

use core::arch::naked_asm;
use core::sync::atomic::{AtomicU32, Ordering};

use crate::interrupt;
use crate::timer;

static TICKS: AtomicU32 = AtomicU32::new(0);

/// Ticks elapsed since boot. Wraps at `u32::MAX`; callers compare with
/// wrapping arithmetic the way the sleep queue does.
pub fn time_now() -> u32 {
    TICKS.load(Ordering::Relaxed)
}

/// Save the twelve general-purpose registers of the calling task onto its
/// own stack, write the resulting stack pointer to `*save_sp_to`, then
/// switch to `load_sp_from` and restore that task's twelve registers.
///
/// Used for voluntary yields: both the outgoing and incoming task were
/// suspended the same way, so this ends with a plain `ret` into whichever
/// code called `context_switch` on the way into the task being resumed.
///
/// # Safety
/// `load_sp_from` must be a stack pointer previously produced either by
/// this function or by [`rtos_arch::stack::init_stack`].
#[unsafe(naked)]
pub unsafe extern "C" fn context_switch(save_sp_to: *mut usize, load_sp_from: usize) {
    naked_asm!(
        "push r4", "push r5", "push r6", "push r7",
        "push r8", "push r9", "push r10", "push r11",
        "push r12", "push r13", "push r14", "push r15",
        "mov r1, 0(r12)",
        "mov r13, r1",
        "pop r15", "pop r14", "pop r13", "pop r12",
        "pop r11", "pop r10", "pop r9", "pop r8",
        "pop r7", "pop r6", "pop r5", "pop r4",
        "ret",
    )
}

/// Resume a task for the very first time, or after a preemption: pop its
/// twelve registers then `reti` into its trap frame. `init_stack` builds
/// exactly this layout — twelve registers followed by a synthesized
/// `{pc, sr}` frame — so a freshly created task and one resumed after a
/// tick both come back through here, never through [`context_switch`],
/// whose `ret` tail would restore the PC but drop the seeded SR and leave
/// SP two words short of where the frame actually ends.
///
/// # Safety
/// `sp` must point at a stack built by [`rtos_arch::stack::init_stack`] or
/// saved by the tick ISR below.
#[unsafe(naked)]
pub unsafe extern "C" fn restore_and_reti(sp: usize) -> ! {
    naked_asm!(
        "mov r12, r1",
        "pop r4", "pop r5", "pop r6", "pop r7",
        "pop r8", "pop r9", "pop r10", "pop r11",
        "pop r12", "pop r13", "pop r14", "pop r15",
        "reti",
    )
}

/// Boot-time entry into the scheduler. Dispatches into the first ready
/// task's synthesized trap frame and never returns.
///
/// # Safety
/// Must be called exactly once, with interrupts still disabled and at
/// least one task registered with the scheduler.
pub unsafe fn sched_start(first_task_sp: usize) -> ! {
    unsafe { restore_and_reti(first_task_sp) }
}

/// Enter the idle loop, low-power-waiting between ticks. Returns only if
/// `rtos_abi::sched_bridge().current_task()` becomes a live task again,
/// letting the scheduler's idle task implementation loop on this.
pub fn idle() {
    interrupt::enable_interrupts();
    unsafe {
        core::arch::asm!("bis #0x0010, r2", options(nomem, nostack));
    }
}

fn run_tick() {
    TICKS.fetch_add(1, Ordering::Relaxed);
    timer::ack_tick();
    if let Some(bridge) = rtos_abi::try_sched_bridge() {
        bridge.on_tick();
        bridge.handle_post_irq();
    }
}

fn run_wakeup() {
    match timer::wakeup_vector() {
        timer::WAKEUP_VECTOR => {
            if let Some(bridge) = rtos_abi::try_sched_bridge() {
                bridge.request_reschedule();
                bridge.handle_post_irq();
            }
        }
        timer::TICK_VECTOR => run_tick(),
        _ => rtos_abi::kernel_panic(rtos_abi::PanicCode::GeneralError),
    }
}

/// Tick ISR: fires at `Config::TICK_RATE_HZ`. Acks the timer, runs the
/// scheduler's timing hook, and reprograms the wakeup channel if tickless
/// idle moved the next deadline.
///
/// Hardware interrupt entry, so the `msp430-interrupt` ABI rather than `C`:
/// the CPU pushes `{pc, sr}` on entry and this must leave via `reti` to pop
/// both back and restore GIE, which only this ABI's generated epilogue does.
///
/// # Safety
/// Only valid as the vector target for the tick capture/compare channel.
#[unsafe(no_mangle)]
pub unsafe extern "msp430-interrupt" fn tick_isr() {
    run_tick();
}

/// Wakeup ISR: fires on the second capture/compare channel when the
/// tickless-idle deadline for the earliest sleeping task arrives. Also
/// catches the tick channel on boards that share a single vector between
/// both capture/compare units, dispatching on `timer::wakeup_vector()`.
///
/// # Safety
/// Only valid as the vector target for the wakeup capture/compare channel.
/// An unrecognized channel reading back from that register is a
/// hardware/programming error and traps to `panic`.
#[unsafe(no_mangle)]
pub unsafe extern "msp430-interrupt" fn wakeup_isr() {
    run_wakeup();
}
